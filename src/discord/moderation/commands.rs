// Administrative slash commands: bulk message cleanup and global command reset.

use crate::core::cleanup::{CleanupRequest, ScannedMessage};
use crate::discord::{Context, Data, Error};
use chrono::{DateTime, Utc};
use poise::serenity_prelude as serenity;

async fn reply_ephemeral(ctx: Context<'_>, content: impl Into<String>) -> Result<(), Error> {
    ctx.send(
        poise::CreateReply::default()
            .content(content)
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

/// Delete messages by user or user ID.
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_MESSAGES")]
pub async fn clean(
    ctx: Context<'_>,
    #[description = "User to delete messages from (mentionable, optional)"] user: Option<
        serenity::User,
    >,
    #[description = "User ID to delete messages from (used if user is not selected)"]
    user_id: Option<String>,
    #[description = "Number of messages to scan (default 100)"] amount: Option<u32>,
) -> Result<(), Error> {
    let request =
        match CleanupRequest::parse(user.as_ref().map(|u| u.id.get()), user_id.as_deref(), amount)
        {
            Ok(request) => request,
            Err(e) => return reply_ephemeral(ctx, format!("❌ {}", e)).await,
        };

    // Scanning and deleting can outlast the interaction's response window
    ctx.defer_ephemeral().await?;

    match purge(ctx, &request).await {
        Ok(deleted) => {
            tracing::info!(
                channel_id = ctx.channel_id().get(),
                target_id = request.target_id,
                invoked_by = ctx.author().id.get(),
                "Deleted {} messages",
                deleted
            );
            reply_ephemeral(
                ctx,
                format!(
                    "🧹 Deleted {} messages from user ID `{}`.",
                    deleted, request.target_id
                ),
            )
            .await
        }
        Err(e) => {
            tracing::error!(
                channel_id = ctx.channel_id().get(),
                target_id = request.target_id,
                "Failed to delete messages: {}",
                e
            );
            reply_ephemeral(ctx, format!("❌ Failed to delete messages: {}", e)).await
        }
    }
}

/// Scan recent history and delete the target's messages. Returns how many were deleted.
async fn purge(ctx: Context<'_>, request: &CleanupRequest) -> Result<usize, serenity::Error> {
    let channel_id = ctx.channel_id();

    let messages = channel_id
        .messages(
            ctx.http(),
            serenity::GetMessages::new().limit(request.amount as u8),
        )
        .await?;

    let scanned: Vec<ScannedMessage> = messages
        .iter()
        .map(|m| ScannedMessage {
            id: m.id.get(),
            author_id: m.author.id.get(),
            created_at: DateTime::<Utc>::from_timestamp(m.timestamp.unix_timestamp(), 0)
                .unwrap_or_default(),
        })
        .collect();

    let plan = request.plan(&scanned, Utc::now());
    if plan.is_empty() {
        return Ok(0);
    }

    if !plan.bulk.is_empty() {
        let ids: Vec<serenity::MessageId> =
            plan.bulk.iter().map(|id| serenity::MessageId::new(*id)).collect();
        channel_id.delete_messages(ctx.http(), ids).await?;
    }

    for id in &plan.single {
        channel_id
            .delete_message(ctx.http(), serenity::MessageId::new(*id))
            .await?;
    }

    Ok(plan.total())
}

/// Clear global slash commands.
#[poise::command(slash_command, guild_only, required_permissions = "ADMINISTRATOR")]
pub async fn clearslash(ctx: Context<'_>) -> Result<(), Error> {
    // An empty set replaces whatever was registered globally
    poise::builtins::register_globally(
        ctx.serenity_context(),
        &[] as &[poise::Command<Data, Error>],
    )
    .await?;

    tracing::info!(
        invoked_by = ctx.author().id.get(),
        "Global slash commands cleared"
    );
    reply_ephemeral(ctx, "🧹 Global slash commands cleared!").await
}

// This is the entry point of the mention guard bot.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic)
// - `infra/` = Process plumbing (configuration, liveness endpoint)
// - `discord/` = Discord-specific adapters (commands, events)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Set up the Discord framework
// 4. Register commands and event handlers

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

use crate::core::moderation::MentionGuardService;
use crate::discord::mention_guard::SerenityModerationActions;
use crate::discord::{events, presence, Data, Error};
use crate::infra::config::AppConfig;
use crate::infra::health;
use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

/// Event handler for non-command Discord events.
async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match events::to_inbound_event(ctx, event).await {
        Ok(Some(inbound)) => events::dispatch(ctx, data, inbound).await,
        Ok(None) => {}
        Err(e) => {
            // Skip this event, keep the stream going
            tracing::error!("Failed to read gateway event: {}", e);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Missing token is fatal before anything connects
    let config = AppConfig::from_env().context("Failed to load configuration")?;

    let policy = Arc::new(config.policy);
    let tickets = Arc::new(config.tickets);
    let guild_id = config.guild_id;

    tracing::info!(
        blocked_names = ?policy.blocked_names(),
        protected_role = policy.protected_role_name(),
        timeout_secs = policy.timeout().as_secs(),
        ticket_category = ?tickets.category_id,
        "Moderation policy loaded"
    );

    // Keep the hosting platform's health check happy
    let port = config.port;
    tokio::spawn(async move {
        if let Err(e) = health::serve(port).await {
            tracing::error!("Liveness server stopped: {}", e);
        }
    });

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================

    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT // Required to read message content
        | serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MEMBERS;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                discord::moderation_commands::clean(),
                discord::moderation_commands::clearslash(),
            ],
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                tracing::info!("🤖 Bot is starting up...");

                match guild_id {
                    Some(guild_id) => {
                        poise::builtins::register_in_guild(
                            ctx,
                            &framework.options().commands,
                            serenity::GuildId::new(guild_id),
                        )
                        .await?;
                    }
                    // Global registration can take up to an hour to propagate
                    None => {
                        poise::builtins::register_globally(ctx, &framework.options().commands)
                            .await?;
                    }
                }

                tracing::info!("✅ Slash commands synced.");
                tracing::info!("✅ Bot ready: {} ({})", ready.user.name, ready.user.id);
                presence::on_ready(ctx);

                // Services get the HTTP client here, once the client exists
                let actions = SerenityModerationActions::new(ctx.http.clone());
                Ok(Data {
                    guard: Arc::new(MentionGuardService::new(policy, actions)),
                    tickets,
                })
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(&config.token, intents)
        .framework(framework)
        .await
        .context("Error creating client")?;

    tracing::info!("🟡 Starting bot...");
    client.start().await.context("Error running bot")?;

    Ok(())
}

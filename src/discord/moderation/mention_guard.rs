// Discord-specific mention guard glue - converts serenity messages into core
// messages and carries out the core's moderation actions through the HTTP client.

use crate::core::moderation::{
    ActionError, Author, ChatMessage, MentionedRole, MentionedUser, ModerationActions,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use poise::serenity_prelude as serenity;
use std::collections::HashMap;
use std::sync::Arc;

/// `ModerationActions` backed by serenity's HTTP client.
pub struct SerenityModerationActions {
    http: Arc<serenity::Http>,
}

impl SerenityModerationActions {
    pub fn new(http: Arc<serenity::Http>) -> Self {
        Self { http }
    }
}

fn platform_error(e: serenity::Error) -> ActionError {
    ActionError::Platform(e.to_string())
}

#[async_trait]
impl ModerationActions for SerenityModerationActions {
    async fn timeout_member(
        &self,
        guild_id: u64,
        user_id: u64,
        until: DateTime<Utc>,
        reason: &str,
    ) -> Result<(), ActionError> {
        let timeout_until = serenity::Timestamp::from_unix_timestamp(until.timestamp())
            .map_err(|e| ActionError::InvalidTimeout(e.to_string()))?;

        serenity::GuildId::new(guild_id)
            .edit_member(
                &self.http,
                serenity::UserId::new(user_id),
                serenity::EditMember::new()
                    .disable_communication_until_datetime(timeout_until)
                    .audit_log_reason(reason),
            )
            .await
            .map(|_| ())
            .map_err(platform_error)
    }

    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<(), ActionError> {
        serenity::ChannelId::new(channel_id)
            .delete_message(&self.http, serenity::MessageId::new(message_id))
            .await
            .map_err(platform_error)
    }

    async fn send_message(&self, channel_id: u64, content: &str) -> Result<(), ActionError> {
        serenity::ChannelId::new(channel_id)
            .say(&self.http, content)
            .await
            .map(|_| ())
            .map_err(platform_error)
    }
}

/// Build the core view of a gateway message.
///
/// Role names come from the cache; if the guild isn't cached yet they are
/// fetched over HTTP.
pub async fn chat_message_from(
    ctx: &serenity::Context,
    msg: &serenity::Message,
) -> Result<ChatMessage, serenity::Error> {
    let (nick, author_role_ids) = match msg.member.as_deref() {
        Some(member) => (member.nick.as_deref(), member.roles.as_slice()),
        None => (None, &[][..]),
    };

    let role_names = match msg.guild_id {
        Some(guild_id) if !author_role_ids.is_empty() || !msg.mention_roles.is_empty() => {
            guild_role_names(ctx, guild_id).await?
        }
        _ => HashMap::new(),
    };

    Ok(to_chat_message(msg, nick, author_role_ids, &role_names))
}

/// Conversion once the guild's role names are known.
///
/// `nick` and `author_role_ids` come from the message's partial member.
/// Role ids missing from `role_names` are dropped.
fn to_chat_message(
    msg: &serenity::Message,
    nick: Option<&str>,
    author_role_ids: &[serenity::RoleId],
    role_names: &HashMap<serenity::RoleId, String>,
) -> ChatMessage {
    let author = Author {
        id: msg.author.id.get(),
        display_name: display_name(nick, &msg.author),
        bot: msg.author.bot,
        role_names: author_role_ids
            .iter()
            .filter_map(|id| role_names.get(id).cloned())
            .collect(),
    };

    ChatMessage {
        id: msg.id.get(),
        channel_id: msg.channel_id.get(),
        guild_id: msg.guild_id.map(|id| id.get()),
        author,
        content: msg.content.clone(),
        mentioned_users: msg
            .mentions
            .iter()
            .map(|user| MentionedUser {
                id: user.id.get(),
                name: user.name.clone(),
            })
            .collect(),
        mentioned_roles: msg
            .mention_roles
            .iter()
            .filter_map(|id| {
                role_names.get(id).map(|name| MentionedRole {
                    id: id.get(),
                    name: name.clone(),
                })
            })
            .collect(),
    }
}

/// Guild nickname, then global name, then username.
fn display_name(nick: Option<&str>, user: &serenity::User) -> String {
    nick.map(str::to_string)
        .or_else(|| user.global_name.clone())
        .unwrap_or_else(|| user.name.clone())
}

async fn guild_role_names(
    ctx: &serenity::Context,
    guild_id: serenity::GuildId,
) -> Result<HashMap<serenity::RoleId, String>, serenity::Error> {
    // Collect before any await: cache refs aren't Send
    let cached: Option<HashMap<serenity::RoleId, String>> = ctx.cache.guild(guild_id).map(|guild| {
        guild
            .roles
            .iter()
            .map(|(id, role)| (*id, role.name.clone()))
            .collect()
    });

    if let Some(names) = cached {
        return Ok(names);
    }

    tracing::debug!(guild_id = guild_id.get(), "Guild not cached, fetching roles");
    let roles = guild_id.roles(&ctx.http).await?;
    Ok(roles.into_iter().map(|(id, role)| (id, role.name)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: u64, name: &str, global_name: Option<&str>) -> serenity::User {
        let mut user = serenity::User::default();
        user.id = serenity::UserId::new(id);
        user.name = name.to_string();
        user.global_name = global_name.map(str::to_string);
        user
    }

    fn gateway_message(author: serenity::User) -> serenity::Message {
        let mut msg = serenity::Message::default();
        msg.id = serenity::MessageId::new(1000);
        msg.channel_id = serenity::ChannelId::new(2000);
        msg.guild_id = Some(serenity::GuildId::new(3000));
        msg.author = author;
        msg.content = "hey <@10>".to_string();
        msg
    }

    fn roles() -> HashMap<serenity::RoleId, String> {
        HashMap::from([
            (serenity::RoleId::new(1), "Members".to_string()),
            (serenity::RoleId::new(2), "owner".to_string()),
        ])
    }

    #[test]
    fn test_nick_wins_over_global_and_username() {
        let msg = gateway_message(user(42, "cathy_99", Some("Cathy")));

        let converted = to_chat_message(&msg, Some("Chatty Cathy"), &[], &roles());

        assert_eq!(converted.author.display_name, "Chatty Cathy");
        assert_eq!(converted.id, 1000);
        assert_eq!(converted.channel_id, 2000);
        assert_eq!(converted.guild_id, Some(3000));
        assert_eq!(converted.author.id, 42);
        assert_eq!(converted.content, "hey <@10>");
    }

    #[test]
    fn test_global_name_without_nick() {
        let msg = gateway_message(user(42, "cathy_99", Some("Cathy")));

        let converted = to_chat_message(&msg, None, &[], &roles());

        assert_eq!(converted.author.display_name, "Cathy");
    }

    #[test]
    fn test_username_when_nothing_else_is_set() {
        let msg = gateway_message(user(42, "cathy_99", None));

        let converted = to_chat_message(&msg, None, &[], &roles());

        assert_eq!(converted.author.display_name, "cathy_99");
    }

    #[test]
    fn test_roles_and_mentions_resolved_by_name() {
        let mut msg = gateway_message(user(42, "cathy_99", None));
        msg.author.bot = true;
        msg.mentions = vec![user(10, "Tripex", None)];
        msg.mention_roles = vec![serenity::RoleId::new(2), serenity::RoleId::new(99)];

        let converted = to_chat_message(
            &msg,
            None,
            &[serenity::RoleId::new(1), serenity::RoleId::new(77)],
            &roles(),
        );

        assert!(converted.author.bot);
        // Unknown ids are dropped on both sides
        assert_eq!(converted.author.role_names, vec!["Members".to_string()]);
        assert_eq!(
            converted.mentioned_roles,
            vec![MentionedRole {
                id: 2,
                name: "owner".to_string()
            }]
        );
        assert_eq!(
            converted.mentioned_users,
            vec![MentionedUser {
                id: 10,
                name: "Tripex".to_string()
            }]
        );
    }

    #[test]
    fn test_direct_message_has_no_guild() {
        let mut msg = gateway_message(user(42, "cathy_99", None));
        msg.guild_id = None;

        let converted = to_chat_message(&msg, None, &[], &HashMap::new());

        assert_eq!(converted.guild_id, None);
        assert!(converted.author.role_names.is_empty());
    }
}

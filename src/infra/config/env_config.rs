// Process configuration read from the environment (and `.env` if present).

use crate::core::moderation::ModerationPolicy;
use crate::core::tickets::{TicketGreeting, DEFAULT_TICKET_GREETING};
use std::time::Duration;
use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_BLOCKED_NAMES: &str = "tripex,ma1eja,owner";
const DEFAULT_PROTECTED_ROLE: &str = "Members";
const DEFAULT_TIMEOUT_SECS: u64 = 1800;
/// Discord refuses timeouts longer than 28 days.
const MAX_TIMEOUT_SECS: u64 = 28 * 24 * 60 * 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("No bot token found! Set the DISCORD_BOT_TOKEN environment variable.")]
    MissingToken,

    #[error("Invalid value for {key}: `{value}`")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub token: String,
    /// Port of the liveness endpoint.
    pub port: u16,
    /// Guild to register slash commands in. Global registration when unset.
    pub guild_id: Option<u64>,
    pub policy: ModerationPolicy,
    pub tickets: TicketGreeting,
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` to resolve variables, so tests don't touch the real env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let token = get("DISCORD_BOT_TOKEN")
            .map(|t| t.trim().to_string())
            .ok_or(ConfigError::MissingToken)?;

        let port = parse_or("PORT", get("PORT"), DEFAULT_PORT)?;
        let guild_id = parse_opt("GUILD_ID", get("GUILD_ID"))?;
        let ticket_category_id = parse_opt("TICKET_CATEGORY_ID", get("TICKET_CATEGORY_ID"))?;
        let timeout_secs = parse_or("TIMEOUT_SECONDS", get("TIMEOUT_SECONDS"), DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::Invalid {
                key: "TIMEOUT_SECONDS",
                value: timeout_secs.to_string(),
            });
        }

        let blocked_names = get("BLOCKED_NAMES").unwrap_or_else(|| DEFAULT_BLOCKED_NAMES.to_string());
        let protected_role =
            get("PROTECTED_ROLE_NAME").unwrap_or_else(|| DEFAULT_PROTECTED_ROLE.to_string());
        let greeting = get("TICKET_GREETING").unwrap_or_else(|| DEFAULT_TICKET_GREETING.to_string());

        Ok(Self {
            token,
            port,
            guild_id,
            policy: ModerationPolicy::new(
                blocked_names.split(','),
                protected_role.trim(),
                Duration::from_secs(timeout_secs),
            ),
            tickets: TicketGreeting::new(ticket_category_id, greeting),
        })
    }
}

fn parse_opt<T: std::str::FromStr>(
    key: &'static str,
    raw: Option<String>,
) -> Result<Option<T>, ConfigError> {
    raw.map(|value| {
        value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value })
    })
    .transpose()
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    Ok(parse_opt(key, raw)?.unwrap_or(default))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("DISCORD_BOT_TOKEN", "abc")]).unwrap();

        assert_eq!(config.token, "abc");
        assert_eq!(config.port, 3000);
        assert_eq!(config.guild_id, None);
        assert_eq!(config.tickets.category_id, None);
        assert_eq!(config.tickets.message, DEFAULT_TICKET_GREETING);
        assert_eq!(config.policy.blocked_names(), vec!["ma1eja", "owner", "tripex"]);
        assert_eq!(config.policy.protected_role_name(), "Members");
        assert_eq!(config.policy.timeout(), Duration::from_secs(1800));
    }

    #[test]
    fn test_missing_or_blank_token_is_fatal() {
        assert_eq!(load(&[]).unwrap_err(), ConfigError::MissingToken);
        assert_eq!(
            load(&[("DISCORD_BOT_TOKEN", "  ")]).unwrap_err(),
            ConfigError::MissingToken
        );
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("DISCORD_BOT_TOKEN", "abc"),
            ("PORT", "8080"),
            ("GUILD_ID", "688729972109475843"),
            ("TICKET_CATEGORY_ID", "1337877093735731291"),
            ("BLOCKED_NAMES", "Alice, BOB ,,"),
            ("PROTECTED_ROLE_NAME", "Regulars"),
            ("TIMEOUT_SECONDS", "600"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.guild_id, Some(688729972109475843));
        assert_eq!(config.tickets.category_id, Some(1337877093735731291));
        assert_eq!(config.policy.blocked_names(), vec!["alice", "bob"]);
        assert_eq!(config.policy.protected_role_name(), "Regulars");
        assert_eq!(config.policy.timeout(), Duration::from_secs(600));
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        assert_eq!(
            load(&[("DISCORD_BOT_TOKEN", "abc"), ("PORT", "http")]).unwrap_err(),
            ConfigError::Invalid {
                key: "PORT",
                value: "http".to_string()
            }
        );
        assert!(matches!(
            load(&[("DISCORD_BOT_TOKEN", "abc"), ("GUILD_ID", "-1")]),
            Err(ConfigError::Invalid { key: "GUILD_ID", .. })
        ));
    }

    #[test]
    fn test_timeout_capped_at_28_days() {
        let config = load(&[("DISCORD_BOT_TOKEN", "abc"), ("TIMEOUT_SECONDS", "2419200")]).unwrap();
        assert_eq!(config.policy.timeout(), Duration::from_secs(2_419_200));

        assert_eq!(
            load(&[("DISCORD_BOT_TOKEN", "abc"), ("TIMEOUT_SECONDS", "2419201")]).unwrap_err(),
            ConfigError::Invalid {
                key: "TIMEOUT_SECONDS",
                value: "2419201".to_string()
            }
        );
    }
}

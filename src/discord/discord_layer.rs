// Discord layer - event adapters and slash commands.

#[path = "events/dispatcher.rs"]
pub mod events;

#[path = "moderation/mention_guard.rs"]
pub mod mention_guard;

#[path = "moderation/commands.rs"]
pub mod moderation_commands;

#[path = "tickets/ticket_events.rs"]
pub mod tickets;

#[path = "commands/presence.rs"]
pub mod presence;

use crate::core::moderation::MentionGuardService;
use crate::core::tickets::TicketGreeting;
use mention_guard::SerenityModerationActions;
use std::sync::Arc;

/// Shared state handed to every command and event.
pub struct Data {
    pub guard: Arc<MentionGuardService<SerenityModerationActions>>,
    pub tickets: Arc<TicketGreeting>,
}

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

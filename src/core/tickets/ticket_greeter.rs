// Ticket greeter - decides whether a new channel is a support ticket.

use crate::core::events::{ChannelCreated, ChannelKind};
use std::time::Duration;

pub const DEFAULT_TICKET_GREETING: &str =
    "Hello! Please tell us your problem here. Tripex will reply as soon as he can.";

/// Give the ticket tool a moment to finish setting up the channel.
pub const DEFAULT_GREETING_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct TicketGreeting {
    /// Category new tickets are created under. `None` disables greeting.
    pub category_id: Option<u64>,
    pub delay: Duration,
    pub message: String,
}

impl TicketGreeting {
    pub fn new(category_id: Option<u64>, message: impl Into<String>) -> Self {
        Self {
            category_id,
            delay: DEFAULT_GREETING_DELAY,
            message: message.into(),
        }
    }

    /// The greeting to post in `channel`, if it is a ticket.
    pub fn greeting_for(&self, channel: &ChannelCreated) -> Option<&str> {
        let category_id = self.category_id?;

        if channel.kind == ChannelKind::Text && channel.parent_id == Some(category_id) {
            Some(self.message.as_str())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICKETS: u64 = 1337877093735731291;

    fn channel(kind: ChannelKind, parent_id: Option<u64>) -> ChannelCreated {
        ChannelCreated {
            channel_id: 1,
            name: "ticket-0042".to_string(),
            kind,
            parent_id,
        }
    }

    #[test]
    fn test_greets_text_channel_in_ticket_category() {
        let greeter = TicketGreeting::new(Some(TICKETS), DEFAULT_TICKET_GREETING);

        assert_eq!(
            greeter.greeting_for(&channel(ChannelKind::Text, Some(TICKETS))),
            Some(DEFAULT_TICKET_GREETING)
        );
        assert_eq!(greeter.delay, Duration::from_secs(2));
    }

    #[test]
    fn test_skips_other_categories_and_kinds() {
        let greeter = TicketGreeting::new(Some(TICKETS), DEFAULT_TICKET_GREETING);

        assert_eq!(greeter.greeting_for(&channel(ChannelKind::Text, Some(7))), None);
        assert_eq!(greeter.greeting_for(&channel(ChannelKind::Text, None)), None);
        assert_eq!(
            greeter.greeting_for(&channel(ChannelKind::Other, Some(TICKETS))),
            None
        );
    }

    #[test]
    fn test_disabled_without_category() {
        let greeter = TicketGreeting::new(None, "hi");

        assert_eq!(greeter.greeting_for(&channel(ChannelKind::Text, None)), None);
    }
}

// Ticket channel greeting - Discord side of the ticket greeter.

use crate::core::events::{ChannelCreated, ChannelKind};
use crate::core::tickets::TicketGreeting;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

pub fn channel_created_from(channel: &serenity::GuildChannel) -> ChannelCreated {
    ChannelCreated {
        channel_id: channel.id.get(),
        name: channel.name.clone(),
        kind: if channel.kind == serenity::ChannelType::Text {
            ChannelKind::Text
        } else {
            ChannelKind::Other
        },
        parent_id: channel.parent_id.map(|id| id.get()),
    }
}

/// Post the greeting in a new ticket channel after the configured delay.
///
/// The wait happens on its own task so the event handler returns immediately.
pub fn greet_ticket(http: Arc<serenity::Http>, greeting: &TicketGreeting, channel: ChannelCreated) {
    let Some(message) = greeting.greeting_for(&channel) else {
        return;
    };

    let message = message.to_string();
    let delay = greeting.delay;

    tokio::spawn(async move {
        tokio::time::sleep(delay).await;

        match serenity::ChannelId::new(channel.channel_id)
            .say(&http, message)
            .await
        {
            Ok(_) => tracing::info!(
                channel_id = channel.channel_id,
                "Sent ticket greeting in {}",
                channel.name
            ),
            Err(e) => tracing::error!(
                channel_id = channel.channel_id,
                "Failed to send ticket greeting: {}",
                e
            ),
        }
    });
}

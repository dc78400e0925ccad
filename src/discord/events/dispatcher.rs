// Gateway event dispatch.
//
// **The pattern:**
// 1. Convert the serenity event into a core `InboundEvent`
// 2. Hand it to the matching core service
// 3. Log anything that went wrong - never fail the event stream

use crate::core::events::InboundEvent;
use crate::discord::mention_guard::chat_message_from;
use crate::discord::tickets::{channel_created_from, greet_ticket};
use crate::discord::{Data, Error};
use poise::serenity_prelude as serenity;

/// Normalize a gateway event. `None` for events the bot doesn't handle.
pub async fn to_inbound_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
) -> Result<Option<InboundEvent>, Error> {
    let inbound = match event {
        serenity::FullEvent::Message { new_message } => {
            InboundEvent::MessagePosted(chat_message_from(ctx, new_message).await?)
        }
        serenity::FullEvent::ChannelCreate { channel } => {
            InboundEvent::ChannelCreated(channel_created_from(channel))
        }
        _ => return Ok(None),
    };

    Ok(Some(inbound))
}

pub async fn dispatch(ctx: &serenity::Context, data: &Data, event: InboundEvent) {
    match event {
        InboundEvent::MessagePosted(message) => {
            let report = data.guard.handle(&message).await;
            if !report.is_empty() && !report.all_succeeded() {
                tracing::warn!(
                    message_id = message.id,
                    failed = report.failures().count(),
                    "Mention guard finished with failed steps"
                );
            }
        }
        InboundEvent::ChannelCreated(channel) => {
            greet_ticket(ctx.http.clone(), &data.tickets, channel);
        }
    }
}

// Inbound events - the only two gateway events the bot cares about.
//
// The Discord layer converts serenity's `FullEvent` into one of these so the
// core never sees a serenity type.

use crate::core::moderation::ChatMessage;

/// Kind of a newly created guild channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Text,
    Other,
}

/// A channel that was just created in the guild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelCreated {
    pub channel_id: u64,
    pub name: String,
    pub kind: ChannelKind,
    /// Category the channel was created under, if any.
    pub parent_id: Option<u64>,
}

/// An event delivered by the chat gateway, already normalized.
#[derive(Debug, Clone)]
pub enum InboundEvent {
    MessagePosted(ChatMessage),
    ChannelCreated(ChannelCreated),
}

// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "events/inbound_event.rs"]
pub mod events;

#[path = "moderation/mod.rs"]
pub mod moderation;

#[path = "tickets/ticket_greeter.rs"]
pub mod tickets;

#[path = "cleanup/mod.rs"]
pub mod cleanup;

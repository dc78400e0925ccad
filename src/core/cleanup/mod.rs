pub mod cleanup_service;

pub use cleanup_service::{CleanupRequest, ScannedMessage};

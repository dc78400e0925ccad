// The infra module contains process-level plumbing the core doesn't know about.
// Each concern goes in its own submodule.

#[path = "config/env_config.rs"]
pub mod config;

#[path = "health/health_server.rs"]
pub mod health;

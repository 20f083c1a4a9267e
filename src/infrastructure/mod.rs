//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Catalog: Party Parrot catalog over HTTP
//! - Mattermost: REST API client
//! - Adapters: Slash command server, console

pub mod config;
pub mod catalog;
pub mod mattermost;
pub mod adapters;

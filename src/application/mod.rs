//! Application layer - Use cases and orchestration
//!
//! This layer contains:
//! - Services: Session management, the sync run, the slash command handler
//! - Errors: Domain-specific errors

pub mod errors;
pub mod services;

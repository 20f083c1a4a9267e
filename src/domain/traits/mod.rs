//! Domain traits - Abstractions for infrastructure implementations

pub mod catalog;
pub mod platform;
pub mod progress;

pub use catalog::Catalog;
pub use platform::{Authenticator, Platform};
pub use progress::{CommandHandler, Progress};

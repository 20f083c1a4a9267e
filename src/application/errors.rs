//! Application layer errors

use thiserror::Error;

/// Top-level errors surfaced by the CLI
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Server error: {0}")]
    Server(String),
}

/// Cannot establish or identify a platform session
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid site URL: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to get user id: {0}")]
    Status(u16),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Catalog list or asset retrieval failed
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Platform rejected an emoji creation
#[derive(Error, Debug)]
pub enum CreateError {
    #[error("Name conflicts with existing system emoji: {0}")]
    SystemNameConflict(String),

    #[error("Rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),
}

/// Any other failed platform call (lookups, posts, commands)
#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

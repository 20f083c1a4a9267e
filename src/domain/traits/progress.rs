use async_trait::async_trait;

use crate::domain::entities::Invocation;

/// Progress sink for a running sync
///
/// Updates are fire-and-forget: implementations log their own failures.
#[async_trait]
pub trait Progress: Send + Sync {
    async fn update(&self, message: &str);
}

/// Handles a slash command invocation
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn execute(&self, invocation: Invocation);
}

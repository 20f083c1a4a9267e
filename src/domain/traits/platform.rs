use std::sync::Arc;

use async_trait::async_trait;

use crate::application::errors::{AuthError, CreateError, PlatformError};
use crate::domain::entities::Invocation;

/// Platform trait - the chat server REST surface the sync relies on
#[async_trait]
pub trait Platform: Send + Sync {
    /// Look up the id of the authenticated user
    async fn resolve_identity(&self) -> Result<String, AuthError>;

    /// Check whether an emoji with this name exists (custom or system)
    async fn emoji_exists(&self, name: &str) -> Result<bool, PlatformError>;

    /// Upload a custom emoji
    async fn create_emoji(&self, image: &[u8], name: &str, creator_id: &str) -> Result<(), CreateError>;

    /// Send an ephemeral post to the invoking user, replacing `post_id` when given.
    /// Returns the id of the post.
    async fn send_ephemeral(
        &self,
        target: &Invocation,
        post_id: Option<&str>,
        message: &str,
    ) -> Result<String, PlatformError>;
}

/// Builds platform handles from stored configuration
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// `Ok(None)` when no credentials are configured
    async fn authenticate(&self) -> Result<Option<Arc<dyn Platform>>, AuthError>;
}

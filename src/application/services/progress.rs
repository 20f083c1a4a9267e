//! Progress reporting through a single ephemeral post

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::entities::Invocation;
use crate::domain::traits::{Platform, Progress};

/// Keeps one ephemeral post per run and rewrites it on every update
pub struct EphemeralProgress {
    platform: Arc<dyn Platform>,
    target: Invocation,
    post_id: Mutex<Option<String>>,
}

impl EphemeralProgress {
    pub fn new(platform: Arc<dyn Platform>, target: Invocation) -> Self {
        Self {
            platform,
            target,
            post_id: Mutex::new(None),
        }
    }
}

#[async_trait]
impl Progress for EphemeralProgress {
    async fn update(&self, message: &str) {
        let mut post_id = self.post_id.lock().await;
        match self
            .platform
            .send_ephemeral(&self.target, post_id.as_deref(), message)
            .await
        {
            Ok(id) => *post_id = Some(id),
            Err(e) => tracing::warn!(error = %e, "Failed to update progress message"),
        }
    }
}

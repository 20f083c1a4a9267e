//! Console adapter for one-off syncs from the command line

use async_trait::async_trait;
use crate::domain::traits::Progress;

/// Prints progress updates to stdout
#[derive(Debug, Default)]
pub struct ConsoleProgress;

#[async_trait]
impl Progress for ConsoleProgress {
    async fn update(&self, message: &str) {
        tracing::debug!("Progress: {}", message);
        println!("[SYNC] {}", message);
    }
}

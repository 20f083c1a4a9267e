use async_trait::async_trait;

use crate::application::services::progress::EphemeralProgress;
use crate::application::services::session::{Session, SessionManager};
use crate::application::services::sync_service::SyncService;
use crate::domain::entities::Invocation;
use crate::domain::traits::{Authenticator, Catalog, CommandHandler};

/// Handler behind the sync slash command
pub struct PartyParrots<A: Authenticator, C: Catalog> {
    sessions: SessionManager<A>,
    sync: SyncService<C>,
}

impl<A: Authenticator, C: Catalog> PartyParrots<A, C> {
    pub fn new(sessions: SessionManager<A>, sync: SyncService<C>) -> Self {
        Self { sessions, sync }
    }

    pub fn sessions(&self) -> &SessionManager<A> {
        &self.sessions
    }

    pub fn sync(&self) -> &SyncService<C> {
        &self.sync
    }

    /// Get a live session. Auth failures are logged; unconfigured is silent.
    pub async fn connect(&self) -> Option<Session> {
        match self.sessions.ensure_connected().await {
            Ok(session) => session,
            Err(e) => {
                tracing::error!(error = %e, "Could not connect to Mattermost");
                None
            }
        }
    }
}

#[async_trait]
impl<A: Authenticator, C: Catalog> CommandHandler for PartyParrots<A, C> {
    async fn execute(&self, invocation: Invocation) {
        tracing::info!(user_id = %invocation.user_id, "Slash command received.");
        let Some(session) = self.connect().await else {
            tracing::info!("No session available, skipping sync.");
            return;
        };

        let progress = EphemeralProgress::new(session.platform.clone(), invocation);
        let summary = self.sync.run(&session, &progress).await;
        if summary.unauthorized {
            tracing::warn!("Mattermost rejected the access token, dropping the session");
            self.sessions.reset().await;
        }
    }
}

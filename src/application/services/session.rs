//! Lazily initialized platform session

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::application::errors::AuthError;
use crate::domain::traits::{Authenticator, Platform};

/// An authenticated platform handle and the identity behind it
#[derive(Clone)]
pub struct Session {
    pub platform: Arc<dyn Platform>,
    pub user_id: String,
}

/// Owns the cached session and (re)creates it on demand
pub struct SessionManager<A: Authenticator> {
    authenticator: A,
    session: Mutex<Option<Session>>,
}

impl<A: Authenticator> SessionManager<A> {
    pub fn new(authenticator: A) -> Self {
        Self {
            authenticator,
            session: Mutex::new(None),
        }
    }

    /// Return the cached session, authenticating first if there is none.
    ///
    /// `Ok(None)` means credentials are not configured yet; nothing is cached
    /// so the next call tries again.
    pub async fn ensure_connected(&self) -> Result<Option<Session>, AuthError> {
        let mut cached = self.session.lock().await;
        if let Some(session) = cached.as_ref() {
            return Ok(Some(session.clone()));
        }

        tracing::debug!("Initializing client");
        let Some(platform) = self.authenticator.authenticate().await? else {
            tracing::info!("Not configured yet, skipping login.");
            return Ok(None);
        };

        let user_id = platform.resolve_identity().await?;
        if user_id.is_empty() {
            return Err(AuthError::Parse("empty user id".to_string()));
        }
        tracing::debug!(user_id = %user_id, "Got user id");

        let session = Session { platform, user_id };
        *cached = Some(session.clone());
        Ok(Some(session))
    }

    /// Drop the cached session; the next `ensure_connected` authenticates again
    pub async fn reset(&self) {
        self.session.lock().await.take();
    }

    pub async fn is_connected(&self) -> bool {
        self.session.lock().await.is_some()
    }
}

//! Slash command callback server
//!
//! Mattermost POSTs a URL-encoded form to the registered command URL and
//! gives up on the response after a few seconds, so the sync runs in a
//! spawned task and the request is answered right away. Syncs still
//! running when the server stops are aborted.

use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinSet;

use crate::application::errors::AppError;
use crate::domain::entities::{Invocation, SlashCommand};
use crate::domain::traits::CommandHandler;

/// Path the slash command callback is served on
pub const COMMAND_PATH: &str = "/command";

#[derive(Clone)]
pub struct WebhookState {
    handler: Arc<dyn CommandHandler>,
    command: SlashCommand,
    token: Arc<RwLock<Option<String>>>,
    tasks: Arc<Mutex<JoinSet<()>>>,
}

impl WebhookState {
    pub fn new(handler: Arc<dyn CommandHandler>, command: SlashCommand) -> Self {
        Self {
            handler,
            command,
            token: Arc::new(RwLock::new(None)),
            tasks: Arc::new(Mutex::new(JoinSet::new())),
        }
    }

    /// Require this verification token on every request
    pub async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token.filter(|t| !t.is_empty());
    }

    async fn spawn(&self, invocation: Invocation) {
        let handler = self.handler.clone();
        let mut tasks = self.tasks.lock().await;
        while tasks.try_join_next().is_some() {}
        tasks.spawn(async move {
            handler.execute(invocation).await;
        });
    }

    /// Abort syncs that are still running. Returns how many were cut short.
    pub async fn abort_pending(&self) -> usize {
        let mut tasks = self.tasks.lock().await;
        while tasks.try_join_next().is_some() {}
        let pending = tasks.len();
        if pending > 0 {
            tracing::warn!(pending, "Aborting in-flight syncs");
        }
        tasks.shutdown().await;
        pending
    }

    async fn authorized(&self, token: &str) -> bool {
        match self.token.read().await.as_deref() {
            Some(expected) => expected == token,
            None => true,
        }
    }
}

/// Slash command request as sent by Mattermost
#[derive(Debug, Default, Deserialize)]
pub struct CommandForm {
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub root_id: String,
    #[serde(default)]
    pub team_id: String,
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub token: String,
}

impl CommandForm {
    fn invocation(&self) -> Invocation {
        Invocation {
            user_id: self.user_id.clone(),
            channel_id: self.channel_id.clone(),
            root_id: Some(self.root_id.clone()).filter(|r| !r.is_empty()),
        }
    }
}

pub fn router(state: WebhookState) -> Router {
    Router::new()
        .route("/", get(hello))
        .route(COMMAND_PATH, post(handle_command))
        .with_state(state)
}

/// Serve until `shutdown` resolves
pub async fn serve(
    listener: TcpListener,
    state: WebhookState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), AppError> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(addr = %addr, path = COMMAND_PATH, "Slash command server listening");
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AppError::Server(e.to_string()))
}

async fn hello() -> &'static str {
    "Hello, world!"
}

async fn handle_command(State(state): State<WebhookState>, Form(form): Form<CommandForm>) -> Response {
    tracing::info!(team_id = %form.team_id, user_id = %form.user_id, "Slash command request");
    if !state.authorized(&form.token).await {
        tracing::warn!(user_id = %form.user_id, "Rejected slash command: invalid token");
        return StatusCode::UNAUTHORIZED.into_response();
    }

    if !form.command.is_empty() && !state.command.matches(&form.command) {
        tracing::warn!(command = %form.command, "Unknown slash command");
        return (StatusCode::BAD_REQUEST, "unknown command").into_response();
    }

    if !form.text.trim().is_empty() {
        tracing::debug!(text = %form.text, "Ignoring slash command arguments");
    }

    state.spawn(form.invocation()).await;

    Json(serde_json::json!({})).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::mpsc;

    struct RecordingHandler {
        tx: mpsc::UnboundedSender<Invocation>,
    }

    #[async_trait]
    impl CommandHandler for RecordingHandler {
        async fn execute(&self, invocation: Invocation) {
            let _ = self.tx.send(invocation);
        }
    }

    fn state() -> (WebhookState, mpsc::UnboundedReceiver<Invocation>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let state = WebhookState::new(Arc::new(RecordingHandler { tx }), SlashCommand::default());
        (state, rx)
    }

    fn form(token: &str) -> CommandForm {
        CommandForm {
            channel_id: "town-square".to_string(),
            user_id: "alice".to_string(),
            command: "/partyparrotssync".to_string(),
            token: token.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_command_spawns_sync() {
        let (state, mut rx) = state();
        state.set_token(Some("verify-me".to_string())).await;

        let response = handle_command(State(state), Form(form("verify-me"))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let invocation = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("handler not called")
            .expect("channel closed");
        assert_eq!(invocation.user_id, "alice");
        assert_eq!(invocation.channel_id, "town-square");
        assert_eq!(invocation.root_id, None);
    }

    #[tokio::test]
    async fn test_wrong_token_rejected() {
        let (state, mut rx) = state();
        state.set_token(Some("verify-me".to_string())).await;

        let response = handle_command(State(state), Form(form("guess"))).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_no_token_configured_accepts_any() {
        let (state, _rx) = state();
        let response = handle_command(State(state), Form(form("anything"))).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_other_command_rejected() {
        let (state, _rx) = state();
        let mut other = form("");
        other.command = "/weather".to_string();

        let response = handle_command(State(state), Form(other)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    struct StuckHandler;

    #[async_trait]
    impl CommandHandler for StuckHandler {
        async fn execute(&self, _invocation: Invocation) {
            std::future::pending::<()>().await;
        }
    }

    #[tokio::test]
    async fn test_running_sync_aborted_on_shutdown() {
        let state = WebhookState::new(Arc::new(StuckHandler), SlashCommand::default());

        let response = handle_command(State(state.clone()), Form(form(""))).await;
        assert_eq!(response.status(), StatusCode::OK);

        assert_eq!(state.abort_pending().await, 1);
        assert_eq!(state.abort_pending().await, 0);
    }

    #[tokio::test]
    async fn test_finished_sync_not_counted_as_aborted() {
        let (state, mut rx) = state();

        handle_command(State(state.clone()), Form(form(""))).await;
        tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("handler not called");
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(state.abort_pending().await, 0);
    }

    #[tokio::test]
    async fn test_hello() {
        assert_eq!(hello().await, "Hello, world!");
    }
}

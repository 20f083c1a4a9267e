//! Mattermost REST API v4 client

pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};

use crate::application::errors::{AuthError, CreateError, PlatformError};
use crate::domain::entities::{Invocation, SlashCommand};
use crate::domain::traits::{Authenticator, Platform};
use crate::infrastructure::config::Config;
use models::{ApiErrorBody, Command, CommandRequest, EmojiRequest, EphemeralRequest, Post, PostRequest, User};

/// Error text Mattermost returns when a custom emoji shadows a built-in one
const SYSTEM_CONFLICT_MESSAGE: &str = "Name conflicts with existing system emoji name";

/// A slash command as registered on the server
#[derive(Debug, Clone)]
pub struct RegisteredCommand {
    pub id: String,
    pub token: String,
}

/// Bearer-token authenticated API client
pub struct MattermostClient {
    client: Client,
    site_url: String,
    token: String,
}

impl MattermostClient {
    pub fn login(site_url: &str, token: impl Into<String>) -> Result<Self, AuthError> {
        let site_url = site_url.trim().trim_end_matches('/').to_string();
        if !(site_url.starts_with("http://") || site_url.starts_with("https://")) {
            return Err(AuthError::InvalidUrl(site_url));
        }
        Ok(Self {
            client: Client::new(),
            site_url,
            token: token.into(),
        })
    }

    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v4{}", self.site_url, path)
    }

    /// API URL with `segment` appended as a single percent-encoded path segment
    fn api_url_with_segment(&self, path: &str, segment: &str) -> Result<Url, PlatformError> {
        let mut url = Url::parse(&self.api_url(path))
            .map_err(|e| PlatformError::Parse(format!("Invalid URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| PlatformError::Parse(format!("Cannot append to {}", self.site_url)))?
            .push(segment);
        Ok(url)
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.api_url(path)).bearer_auth(&self.token)
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.api_url(path)).bearer_auth(&self.token)
    }

    fn delete(&self, path: &str) -> RequestBuilder {
        self.client.delete(self.api_url(path)).bearer_auth(&self.token)
    }

    /// Status and message of a failed response
    async fn api_error(response: Response) -> (u16, String) {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|e| e.message)
            .ok()
            .filter(|m| !m.is_empty())
            .unwrap_or(body);
        (status, message)
    }

    async fn send(request: RequestBuilder) -> Result<Response, PlatformError> {
        let response = request
            .send()
            .await
            .map_err(|e| PlatformError::Network(e.to_string()))?;
        if !response.status().is_success() {
            let (status, message) = Self::api_error(response).await;
            return Err(PlatformError::Api { status, message });
        }
        Ok(response)
    }

    /// Register a custom slash command that posts to `url`
    pub async fn register_command(
        &self,
        team_id: &str,
        command: &SlashCommand,
        url: &str,
    ) -> Result<RegisteredCommand, PlatformError> {
        let request = CommandRequest {
            team_id,
            trigger: &command.trigger,
            method: "P",
            url,
            auto_complete: command.auto_complete,
            auto_complete_desc: &command.description,
            display_name: "Party Parrots",
            description: &command.description,
        };

        let created: Command = Self::send(self.post("/commands").json(&request))
            .await?
            .json()
            .await
            .map_err(|e| PlatformError::Parse(e.to_string()))?;

        tracing::info!(command_id = %created.id, "Registered /{}", created.trigger);
        Ok(RegisteredCommand {
            id: created.id,
            token: created.token,
        })
    }

    /// Delete every custom command with this trigger. Returns whether one was found.
    pub async fn unregister_command(&self, team_id: &str, trigger: &str) -> Result<bool, PlatformError> {
        let commands: Vec<Command> = Self::send(
            self.get("/commands")
                .query(&[("team_id", team_id), ("custom_only", "true")]),
        )
        .await?
        .json()
        .await
        .map_err(|e| PlatformError::Parse(e.to_string()))?;

        let mut found = false;
        for command in commands.iter().filter(|c| c.trigger == trigger) {
            Self::send(self.delete(&format!("/commands/{}", command.id))).await?;
            tracing::info!(command_id = %command.id, "Unregistered /{}", trigger);
            found = true;
        }
        Ok(found)
    }
}

#[async_trait]
impl Platform for MattermostClient {
    async fn resolve_identity(&self) -> Result<String, AuthError> {
        let response = self.get("/users/me")
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(AuthError::Status(response.status().as_u16()));
        }

        let user: User = response
            .json()
            .await
            .map_err(|e| AuthError::Parse(e.to_string()))?;
        tracing::debug!(username = %user.username, "Authenticated");
        Ok(user.id)
    }

    async fn emoji_exists(&self, name: &str) -> Result<bool, PlatformError> {
        let url = self.api_url_with_segment("/emoji/name", name)?;
        let response = self.client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| PlatformError::Network(e.to_string()))?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => {
                let (status, message) = Self::api_error(response).await;
                Err(PlatformError::Api { status, message })
            }
        }
    }

    async fn create_emoji(&self, image: &[u8], name: &str, creator_id: &str) -> Result<(), CreateError> {
        let emoji = serde_json::to_string(&EmojiRequest { creator_id, name })
            .map_err(|e| CreateError::Rejected { status: 0, message: e.to_string() })?;
        let image = Part::bytes(image.to_vec())
            .file_name(format!("{}.gif", name))
            .mime_str("image/gif")
            .map_err(|e| CreateError::Network(e.to_string()))?;
        let form = Form::new().part("image", image).text("emoji", emoji);

        let response = self.post("/emoji")
            .multipart(form)
            .send()
            .await
            .map_err(|e| CreateError::Network(e.to_string()))?;

        if response.status().is_success() {
            return Ok(());
        }

        let (status, message) = Self::api_error(response).await;
        if message.contains(SYSTEM_CONFLICT_MESSAGE) {
            Err(CreateError::SystemNameConflict(message))
        } else {
            Err(CreateError::Rejected { status, message })
        }
    }

    async fn send_ephemeral(
        &self,
        target: &Invocation,
        post_id: Option<&str>,
        message: &str,
    ) -> Result<String, PlatformError> {
        let request = EphemeralRequest {
            user_id: &target.user_id,
            post: PostRequest {
                id: post_id,
                channel_id: &target.channel_id,
                root_id: target.root_id.as_deref().filter(|r| !r.is_empty()),
                message,
            },
        };

        let post: Post = Self::send(self.post("/posts/ephemeral").json(&request))
            .await?
            .json()
            .await
            .map_err(|e| PlatformError::Parse(e.to_string()))?;
        Ok(post.id)
    }
}

/// Logs in with the configured site URL and access token
pub struct MattermostAuthenticator {
    site_url: String,
    token: Option<String>,
}

impl MattermostAuthenticator {
    pub fn new(site_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            site_url: site_url.into(),
            token,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.mattermost.site_url.clone(),
            config.access_token().map(String::from),
        )
    }
}

#[async_trait]
impl Authenticator for MattermostAuthenticator {
    async fn authenticate(&self) -> Result<Option<Arc<dyn Platform>>, AuthError> {
        let Some(token) = self.token.as_deref() else {
            return Ok(None);
        };
        tracing::debug!("Login to {}", self.site_url);
        let platform: Arc<dyn Platform> = Arc::new(MattermostClient::login(&self.site_url, token)?);
        Ok(Some(platform))
    }
}

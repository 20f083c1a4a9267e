//! Mattermost REST v4 payloads

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub username: String,
}

/// Error body returned by every failing endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
}

/// JSON part of the emoji upload
#[derive(Debug, Serialize)]
pub struct EmojiRequest<'a> {
    pub creator_id: &'a str,
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
pub struct EphemeralRequest<'a> {
    pub user_id: &'a str,
    pub post: PostRequest<'a>,
}

#[derive(Debug, Serialize)]
pub struct PostRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<&'a str>,
    pub channel_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_id: Option<&'a str>,
    pub message: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Post {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct CommandRequest<'a> {
    pub team_id: &'a str,
    pub trigger: &'a str,
    /// "P" for POST callbacks
    pub method: &'a str,
    pub url: &'a str,
    pub auto_complete: bool,
    pub auto_complete_desc: &'a str,
    pub display_name: &'a str,
    pub description: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Command {
    pub id: String,
    pub trigger: String,
    #[serde(default)]
    pub token: String,
}

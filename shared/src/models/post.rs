//! Community feed models

use serde::{Deserialize, Serialize};

/// Feed post
///
/// Posts and replies are append-only; `likes` is a display counter that is
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub author_id: String,
    pub author_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub timestamp: String,
    pub likes: u32,
    pub replies: Vec<Reply>,
    pub reposts: u32,
    /// Authored by an administrator
    #[serde(default)]
    pub is_verified: bool,
}

/// Reply to a feed post
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: String,
    pub author_id: String,
    pub author_name: String,
    pub content: String,
    pub timestamp: String,
    #[serde(default)]
    pub is_verified: bool,
}

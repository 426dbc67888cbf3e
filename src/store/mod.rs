//! Data-store collaborator for the `posts` table.
//!
//! The gateway never owns post data. It forwards reads and writes to a
//! [`PostStore`] and passes the caller's bearer token through on writes so
//! the backend's row-level security decides what is allowed.

mod memory;
mod supabase;

pub use memory::MemoryStore;
pub use supabase::SupabaseStore;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub publish_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub author: Option<String>,
}

/// Partial update. `None` fields are left untouched by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl PostPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.author.is_none()
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// Error reported by the backend itself; the message is shown verbatim.
    #[error("{0}")]
    Backend(String),

    #[error("post {0} not found")]
    NotFound(String),

    #[error("no fields to update")]
    EmptyPatch,

    #[error("data store request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait PostStore: Send + Sync {
    async fn list_posts(&self) -> StoreResult<Vec<Post>>;

    async fn get_post(&self, id: &str) -> StoreResult<Post>;

    async fn create_post(&self, post: NewPost, token: &str) -> StoreResult<Post>;

    async fn update_post(&self, id: &str, patch: PostPatch, token: &str) -> StoreResult<Post>;

    async fn delete_post(&self, id: &str, token: &str) -> StoreResult<Post>;
}

/// Sample rows used by `blog-gateway seed` and the development store.
pub fn sample_posts() -> Vec<NewPost> {
    [
        ("First Post", "This is the first post", "Author 1"),
        ("Second Post", "This is the second post", "Author 2"),
        ("Third Post", "This is the third post", "Author 3"),
    ]
    .into_iter()
    .map(|(title, content, author)| NewPost {
        title: title.to_string(),
        content: content.to_string(),
        author: Some(author.to_string()),
    })
    .collect()
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Integer(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(value) => value,
        RawId::Integer(value) => value.to_string(),
    })
}

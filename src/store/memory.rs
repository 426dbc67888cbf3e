use super::{NewPost, Post, PostPatch, PostStore, StoreError, StoreResult};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Table {
    rows: Vec<Post>,
    next_id: u64,
}

/// Process-local store for development and tests. Tokens are accepted as-is.
#[derive(Debug, Default)]
pub struct MemoryStore {
    table: RwLock<Table>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_posts<I>(posts: I) -> Self
    where
        I: IntoIterator<Item = Post>,
    {
        let rows: Vec<Post> = posts.into_iter().collect();
        let next_id = rows
            .iter()
            .filter_map(|post| post.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self {
            table: RwLock::new(Table { rows, next_id }),
        }
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn list_posts(&self) -> StoreResult<Vec<Post>> {
        Ok(self.table.read().await.rows.clone())
    }

    async fn get_post(&self, id: &str) -> StoreResult<Post> {
        self.table
            .read()
            .await
            .rows
            .iter()
            .find(|post| post.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn create_post(&self, post: NewPost, _token: &str) -> StoreResult<Post> {
        let mut table = self.table.write().await;
        table.next_id += 1;
        let created = Post {
            id: table.next_id.to_string(),
            title: post.title,
            content: post.content,
            author: post.author,
            publish_date: Some(Utc::now().to_rfc3339()),
        };
        table.rows.push(created.clone());
        Ok(created)
    }

    async fn update_post(&self, id: &str, patch: PostPatch, _token: &str) -> StoreResult<Post> {
        let mut table = self.table.write().await;
        let post = table
            .rows
            .iter_mut()
            .find(|post| post.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if let Some(title) = patch.title {
            post.title = title;
        }
        if let Some(content) = patch.content {
            post.content = content;
        }
        if let Some(author) = patch.author {
            post.author = Some(author);
        }
        Ok(post.clone())
    }

    async fn delete_post(&self, id: &str, _token: &str) -> StoreResult<Post> {
        let mut table = self.table.write().await;
        let idx = table
            .rows
            .iter()
            .position(|post| post.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok(table.rows.remove(idx))
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;

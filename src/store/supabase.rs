use super::{NewPost, Post, PostPatch, PostStore, StoreError, StoreResult};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

const TABLE: &str = "posts";
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const RETURN_REPRESENTATION: &str = "return=representation";

/// PostgREST client for a Supabase project.
///
/// Reads authenticate with the anonymous key; writes forward the caller's
/// bearer token so row-level security applies to the real user.
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    client: Client,
    table_url: String,
    anon_key: String,
}

#[derive(Deserialize)]
struct PostgrestError {
    message: String,
}

impl SupabaseStore {
    pub fn new(client: Client, supabase_url: &str, anon_key: impl Into<String>) -> Self {
        Self {
            client,
            table_url: format!("{}/rest/v1/{TABLE}", supabase_url.trim_end_matches('/')),
            anon_key: anon_key.into(),
        }
    }

    fn request(&self, method: Method, token: Option<&str>) -> RequestBuilder {
        let bearer = token.unwrap_or(&self.anon_key);
        self.client
            .request(method, &self.table_url)
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
    }

    fn single(builder: RequestBuilder) -> RequestBuilder {
        builder
            .header(reqwest::header::ACCEPT, SINGLE_OBJECT)
            .header("Prefer", RETURN_REPRESENTATION)
    }

    async fn send<T: DeserializeOwned>(builder: RequestBuilder) -> StoreResult<T> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }
        Err(Self::backend_error(response).await)
    }

    async fn backend_error(response: Response) -> StoreError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<PostgrestError>(&body)
            .map(|error| error.message)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected response from data store")
                    .to_string()
            });
        warn!(status = status.as_u16(), %message, "data store rejected request");
        StoreError::Backend(message)
    }
}

#[async_trait]
impl PostStore for SupabaseStore {
    async fn list_posts(&self) -> StoreResult<Vec<Post>> {
        debug!(table = TABLE, "select all");
        Self::send(self.request(Method::GET, None).query(&[("select", "*")])).await
    }

    async fn get_post(&self, id: &str) -> StoreResult<Post> {
        debug!(table = TABLE, id, "select one");
        let filter = format!("eq.{id}");
        Self::send(Self::single(
            self.request(Method::GET, None)
                .query(&[("select", "*"), ("id", filter.as_str())]),
        ))
        .await
    }

    async fn create_post(&self, post: NewPost, token: &str) -> StoreResult<Post> {
        debug!(table = TABLE, title = %post.title, "insert");
        Self::send(Self::single(
            self.request(Method::POST, Some(token))
                .query(&[("select", "*")])
                .json(&post),
        ))
        .await
    }

    async fn update_post(&self, id: &str, patch: PostPatch, token: &str) -> StoreResult<Post> {
        debug!(table = TABLE, id, "update");
        let filter = format!("eq.{id}");
        Self::send(Self::single(
            self.request(Method::PATCH, Some(token))
                .query(&[("select", "*"), ("id", filter.as_str())])
                .json(&patch),
        ))
        .await
    }

    async fn delete_post(&self, id: &str, token: &str) -> StoreResult<Post> {
        debug!(table = TABLE, id, "delete");
        let filter = format!("eq.{id}");
        Self::send(Self::single(
            self.request(Method::DELETE, Some(token))
                .query(&[("select", "*"), ("id", filter.as_str())]),
        ))
        .await
    }
}

#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request};
use blog_gateway_rs::constants::header;
use blog_gateway_rs::{
    AllowedOrigins, CorsOptions, Gateway, MemoryStore, Post, PostStore, TrophyError,
    TrophyService,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

pub const BASE_URL: &str = "https://api.joshuasevy.com";
pub const ALLOWED_ORIGIN: &str = "http://localhost:5173";

pub struct StaticTrophies;

#[async_trait]
impl TrophyService for StaticTrophies {
    async fn fetch(&self, username: &str) -> Result<String, TrophyError> {
        Ok(format!("<svg data-user=\"{username}\"></svg>"))
    }
}

#[derive(Default)]
pub struct GatewayBuilder {
    origins: Option<Vec<String>>,
    posts: Vec<Post>,
    store: Option<Arc<dyn PostStore>>,
}

impl GatewayBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.origins = Some(origins.into_iter().map(Into::into).collect());
        self
    }

    pub fn post(mut self, id: &str, title: &str, publish_date: Option<&str>) -> Self {
        self.posts.push(Post {
            id: id.to_string(),
            title: title.to_string(),
            content: format!("{title} body"),
            author: Some("Author".to_string()),
            publish_date: publish_date.map(str::to_string),
        });
        self
    }

    pub fn store(mut self, store: Arc<dyn PostStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn build(self) -> Gateway {
        let options = match self.origins {
            Some(origins) => CorsOptions::with_origins(AllowedOrigins::list(origins)),
            None => CorsOptions::default(),
        };
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::with_posts(self.posts)));
        Gateway::build(options, store, Arc::new(StaticTrophies), BASE_URL)
            .expect("valid gateway configuration")
    }

    pub fn router(self) -> Router {
        self.build().router()
    }
}

pub fn gateway() -> GatewayBuilder {
    GatewayBuilder::new()
}

pub struct RequestBuilder {
    method: Method,
    uri: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl RequestBuilder {
    pub fn new(method: Method, uri: &str) -> Self {
        Self {
            method,
            uri: uri.to_string(),
            headers: Vec::new(),
            body: String::new(),
        }
    }

    pub fn origin(self, origin: &str) -> Self {
        self.header(header::ORIGIN, origin)
    }

    pub fn request_headers(self, value: &str) -> Self {
        self.header(header::ACCESS_CONTROL_REQUEST_HEADERS, value)
    }

    pub fn bearer(self, token: &str) -> Self {
        self.header(header::AUTHORIZATION, &format!("Bearer {token}"))
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn graphql(self, query: &str) -> Self {
        self.graphql_with_variables(query, Value::Null)
    }

    pub fn graphql_with_variables(self, query: &str, variables: Value) -> Self {
        let payload = if variables.is_null() {
            json!({ "query": query })
        } else {
            json!({ "query": query, "variables": variables })
        };
        self.header(header::CONTENT_TYPE, "application/json")
            .body(payload.to_string())
    }

    pub fn build(self) -> Request<Body> {
        let mut builder = Request::builder().method(self.method).uri(self.uri);
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder.body(Body::from(self.body)).expect("valid request")
    }

    pub async fn send(self, router: &Router) -> TestResponse {
        let response = router
            .clone()
            .oneshot(self.build())
            .await
            .expect("router is infallible");
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("readable body")
            .to_bytes();
        TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).expect("utf-8 body"),
        }
    }
}

pub fn get(uri: &str) -> RequestBuilder {
    RequestBuilder::new(Method::GET, uri)
}

pub fn post(uri: &str) -> RequestBuilder {
    RequestBuilder::new(Method::POST, uri)
}

pub fn options(uri: &str) -> RequestBuilder {
    RequestBuilder::new(Method::OPTIONS, uri)
}

pub fn request(method: Method, uri: &str) -> RequestBuilder {
    RequestBuilder::new(method, uri)
}

#[derive(Debug)]
pub struct TestResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("JSON body")
    }
}

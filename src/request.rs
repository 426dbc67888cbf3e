use crate::constants::{BEARER_PREFIX, header};
use crate::context::RequestContext;
use axum::body::Bytes;
use axum::http::{HeaderMap, Method, Uri};

/// Inbound request as seen by the dispatcher. Immutable once built.
#[derive(Debug, Clone)]
pub struct GatewayRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl GatewayRequest {
    pub fn new(method: Method, uri: &Uri, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            method,
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            headers,
            body,
        }
    }

    /// First value of `name`, if it is valid visible ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|value| value.to_str().ok())
    }

    pub fn cors_context(&self) -> RequestContext<'_> {
        RequestContext {
            method: self.method.as_str(),
            origin: self.header(header::ORIGIN),
            access_control_request_headers: self.header(header::ACCESS_CONTROL_REQUEST_HEADERS),
        }
    }

    pub fn bearer_token(&self) -> Option<String> {
        extract_bearer_token(self.header(header::AUTHORIZATION))
    }

    /// Query string with its leading `?`, or empty.
    pub fn search(&self) -> String {
        self.query
            .as_deref()
            .map(|query| format!("?{query}"))
            .unwrap_or_default()
    }
}

/// Token after the literal, case-sensitive `Bearer ` prefix. A missing
/// header, another scheme or an empty token all yield `None`.
pub fn extract_bearer_token(authorization: Option<&str>) -> Option<String> {
    authorization
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .filter(|token| !token.trim().is_empty())
        .map(str::to_string)
}

#[cfg(test)]
#[path = "request_test.rs"]
mod request_test;

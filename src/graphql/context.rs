use crate::request::GatewayRequest;
use axum::http::{HeaderMap, Method};

/// What resolvers may know about the HTTP request that carried them.
#[derive(Debug, Clone)]
pub struct RequestInfo {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
}

/// Per-request GraphQL context. Built once from the inbound request and
/// never mutated afterwards.
#[derive(Debug, Clone)]
pub struct GraphQlContext {
    request: RequestInfo,
    auth_token: Option<String>,
}

impl GraphQlContext {
    pub fn new(request: RequestInfo, auth_token: Option<String>) -> Self {
        Self {
            request,
            auth_token,
        }
    }

    pub fn from_request(request: &GatewayRequest) -> Self {
        Self::new(
            RequestInfo {
                method: request.method.clone(),
                path: request.path.clone(),
                headers: request.headers.clone(),
            },
            request.bearer_token(),
        )
    }

    pub fn request(&self) -> &RequestInfo {
        &self.request
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth_token.is_some()
    }
}

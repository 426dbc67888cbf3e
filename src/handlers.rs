use crate::constants::ROOT_MESSAGE;
use crate::error::GatewayResult;
use crate::headers::CorsHeaderSet;
use crate::response;
use crate::sitemap::Sitemap;
use crate::store::PostStore;
use axum::http::StatusCode;
use axum::response::Response;
use serde_json::json;

pub const HEALTH_BODY: &str = "OK";
pub const NOT_FOUND_BODY: &str = "Not Found";
pub const METHOD_NOT_ALLOWED_BODY: &str = "Method Not Allowed";

pub fn root(cors: &CorsHeaderSet) -> Response {
    response::json(
        StatusCode::OK,
        json!({ "message": ROOT_MESSAGE }).to_string(),
        cors,
    )
}

pub fn health(cors: &CorsHeaderSet) -> Response {
    response::text(StatusCode::OK, HEALTH_BODY, cors)
}

/// Preflight answer: the CORS headers are the whole response.
pub fn preflight(cors: &CorsHeaderSet) -> Response {
    response::empty(StatusCode::NO_CONTENT, cors)
}

pub fn method_not_allowed(cors: &CorsHeaderSet) -> Response {
    response::text(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED_BODY, cors)
}

pub fn not_found(cors: &CorsHeaderSet) -> Response {
    response::text(StatusCode::NOT_FOUND, NOT_FOUND_BODY, cors)
}

pub async fn sitemap(
    sitemap: &Sitemap,
    store: &dyn PostStore,
    cors: &CorsHeaderSet,
) -> GatewayResult<Response> {
    let xml = sitemap.generate(store).await?;
    Ok(response::xml(StatusCode::OK, xml, cors))
}

#[cfg(test)]
#[path = "handlers_test.rs"]
mod handlers_test;

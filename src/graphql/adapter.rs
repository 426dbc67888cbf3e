use super::context::GraphQlContext;
use super::executor::{GraphQlExecutor, HttpGraphQlRequest, ResponseBody};
use crate::error::ErrorEnvelope;
use crate::headers::CorsHeaderSet;
use crate::request::GatewayRequest;
use crate::response;
use axum::body::Body;
use axum::http::StatusCode;
use axum::response::Response;
use serde_json::{Map, Value};
use tracing::{error, warn};

pub const CHUNKED_UNSUPPORTED_MESSAGE: &str =
    "Chunked response not supported in this simple handler yet";

/// Runs one `POST /graphql` request through `executor`.
///
/// Never fails: executor errors become the `PROCESSING_ERROR` envelope and
/// incremental results become a 501. CORS values always override whatever
/// the engine put in its headers.
pub async fn handle_graphql(
    executor: &dyn GraphQlExecutor,
    request: &GatewayRequest,
    cors: &CorsHeaderSet,
) -> Response {
    let http_request = HttpGraphQlRequest {
        body: parse_body(&request.body),
        headers: request.headers.clone(),
        method: request.method.clone(),
        search: request.search(),
    };
    let context = GraphQlContext::from_request(request);

    let result = match executor.execute(http_request, context).await {
        Ok(result) => result,
        Err(err) => {
            error!(error = %err, "GraphQL processing error");
            return response::error_envelope(&ErrorEnvelope::processing(), cors);
        }
    };

    let (status, body) = match result.body {
        ResponseBody::Complete(body) => (result.status.unwrap_or(StatusCode::OK), body),
        ResponseBody::Chunked => {
            warn!("engine produced an incremental response");
            let response = response::text(
                StatusCode::NOT_IMPLEMENTED,
                CHUNKED_UNSUPPORTED_MESSAGE,
                cors,
            );
            let mut headers = result.headers;
            headers.remove(axum::http::header::CONTENT_TYPE);
            return response::merge_engine_headers(response, &headers, cors);
        }
    };

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response::merge_engine_headers(response, &result.headers, cors)
}

/// Malformed or empty bodies become `{}` so the engine reports the problem.
pub fn parse_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap_or_else(|_| Value::Object(Map::new()))
}

#[cfg(test)]
#[path = "adapter_test.rs"]
mod adapter_test;

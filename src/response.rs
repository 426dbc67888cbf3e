use crate::constants::{content_type, header};
use crate::error::{ErrorEnvelope, INTERNAL_ERROR_MESSAGE};
use crate::headers::CorsHeaderSet;
use axum::body::Body;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::Response;
use tracing::warn;

/// Writes every CORS header into `map`, replacing whatever value was there.
pub fn apply_cors(map: &mut HeaderMap, cors: &CorsHeaderSet) {
    for (name, value) in cors.iter() {
        match (HeaderName::try_from(name), HeaderValue::from_str(value)) {
            (Ok(header_name), Ok(header_value)) => {
                map.insert(header_name, header_value);
            }
            _ => warn!(header = name, "dropping CORS header with invalid name or value"),
        }
    }
}

pub fn with_cors(mut response: Response, cors: &CorsHeaderSet) -> Response {
    apply_cors(response.headers_mut(), cors);
    response
}

pub fn build(
    status: StatusCode,
    content_type: Option<&'static str>,
    body: impl Into<Body>,
    cors: &CorsHeaderSet,
) -> Response {
    let mut response = Response::new(body.into());
    *response.status_mut() = status;
    if let Some(value) = content_type {
        response.headers_mut().insert(
            HeaderName::from_static("content-type"),
            HeaderValue::from_static(value),
        );
    }
    with_cors(response, cors)
}

pub fn empty(status: StatusCode, cors: &CorsHeaderSet) -> Response {
    build(status, None, Body::empty(), cors)
}

pub fn text(status: StatusCode, body: impl Into<String>, cors: &CorsHeaderSet) -> Response {
    build(status, Some(content_type::TEXT), body.into(), cors)
}

pub fn json(status: StatusCode, body: impl Into<String>, cors: &CorsHeaderSet) -> Response {
    build(status, Some(content_type::JSON), body.into(), cors)
}

pub fn xml(status: StatusCode, body: impl Into<String>, cors: &CorsHeaderSet) -> Response {
    build(status, Some(content_type::XML), body.into(), cors)
}

pub fn error_envelope(envelope: &ErrorEnvelope, cors: &CorsHeaderSet) -> Response {
    let status =
        StatusCode::from_u16(envelope.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    json(status, envelope.to_body(), cors)
}

/// Plain-text 500 used when nothing better can be said. Still carries CORS so
/// browsers can read the failure.
pub fn internal_server_error(cors: &CorsHeaderSet) -> Response {
    text(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE, cors)
}

/// Copies headers produced by the GraphQL engine onto a response, then
/// forces the CORS values on top. Repeated engine headers keep every value.
pub fn merge_engine_headers(
    mut response: Response,
    engine_headers: &HeaderMap,
    cors: &CorsHeaderSet,
) -> Response {
    let headers = response.headers_mut();
    for name in engine_headers.keys() {
        headers.remove(name);
        for value in engine_headers.get_all(name) {
            headers.append(name.clone(), value.clone());
        }
    }
    if !response.headers().contains_key(header::CONTENT_TYPE) {
        response.headers_mut().insert(
            HeaderName::from_static("content-type"),
            HeaderValue::from_static(content_type::JSON),
        );
    }
    with_cors(response, cors)
}

#[cfg(test)]
#[path = "response_test.rs"]
mod response_test;

use super::context::GraphQlContext;
use super::schema::BlogSchema;
use crate::constants::content_type;
use crate::error::{ErrorCode, GatewayError};
use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, header};
use serde_json::{Value, json};
use tracing::debug;

pub const MISSING_QUERY_MESSAGE: &str = "GraphQL operations must contain a non-empty `query`.";

/// GraphQL-over-HTTP request handed to the execution engine.
#[derive(Debug, Clone)]
pub struct HttpGraphQlRequest {
    pub body: Value,
    pub headers: HeaderMap,
    pub method: Method,
    pub search: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    Complete(String),
    /// Incremental delivery (`@defer` / `@stream`); not served by the gateway.
    Chunked,
}

#[derive(Debug, Clone)]
pub struct HttpGraphQlResponse {
    pub status: Option<StatusCode>,
    pub headers: HeaderMap,
    pub body: ResponseBody,
}

impl HttpGraphQlResponse {
    pub fn complete(status: StatusCode, body: impl Into<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(content_type::JSON),
        );
        Self {
            status: Some(status),
            headers,
            body: ResponseBody::Complete(body.into()),
        }
    }
}

/// Execution engine seam. The adapter only sees this trait.
#[async_trait]
pub trait GraphQlExecutor: Send + Sync {
    async fn execute(
        &self,
        request: HttpGraphQlRequest,
        context: GraphQlContext,
    ) -> Result<HttpGraphQlResponse, GatewayError>;
}

/// [`GraphQlExecutor`] backed by the async-graphql schema.
#[derive(Clone)]
pub struct SchemaExecutor {
    schema: BlogSchema,
}

impl SchemaExecutor {
    pub fn new(schema: BlogSchema) -> Self {
        Self { schema }
    }

    fn validation_failure(message: &str) -> HttpGraphQlResponse {
        let body = json!({
            "errors": [{
                "message": message,
                "extensions": { "code": ErrorCode::ValidationError.as_str() }
            }]
        });
        HttpGraphQlResponse::complete(StatusCode::BAD_REQUEST, body.to_string())
    }

    fn parse_operation(body: Value) -> Result<async_graphql::Request, String> {
        if !body.is_object() {
            return Err("GraphQL request body must be a JSON object.".to_string());
        }
        let has_query = body
            .get("query")
            .and_then(Value::as_str)
            .is_some_and(|query| !query.trim().is_empty());
        if !has_query {
            return Err(MISSING_QUERY_MESSAGE.to_string());
        }
        serde_json::from_value::<async_graphql::Request>(body).map_err(|err| err.to_string())
    }
}

#[async_trait]
impl GraphQlExecutor for SchemaExecutor {
    async fn execute(
        &self,
        request: HttpGraphQlRequest,
        context: GraphQlContext,
    ) -> Result<HttpGraphQlResponse, GatewayError> {
        let operation = match Self::parse_operation(request.body) {
            Ok(operation) => operation,
            Err(message) => {
                debug!(%message, "rejecting GraphQL request before execution");
                return Ok(Self::validation_failure(&message));
            }
        };

        debug!(
            operation = operation.operation_name.as_deref().unwrap_or("<anonymous>"),
            search = %request.search,
            "executing GraphQL operation"
        );
        let response = self.schema.execute(operation.data(context)).await;

        // Parse and validation errors stop before execution and leave `data`
        // null; every root field is nullable, so resolver errors never do.
        let rejected = response.is_err() && matches!(response.data, async_graphql::Value::Null);

        let mut payload = serde_json::to_value(&response)
            .map_err(|err| GatewayError::Processing(err.to_string()))?;
        if rejected && let Some(errors) = payload.get_mut("errors").and_then(Value::as_array_mut)
        {
            for error in errors {
                error["extensions"]["code"] = json!(ErrorCode::ValidationError.as_str());
            }
        }

        let status = if rejected {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::OK
        };
        let mut http = HttpGraphQlResponse::complete(status, payload.to_string());
        for name in response.http_headers.keys() {
            http.headers.remove(name);
            for value in response.http_headers.get_all(name) {
                http.headers.append(name.clone(), value.clone());
            }
        }
        Ok(http)
    }
}

#[cfg(test)]
#[path = "executor_test.rs"]
mod executor_test;

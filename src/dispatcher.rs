//! Request dispatch.
//!
//! Every request goes through [`Gateway::dispatch`]: CORS is computed first,
//! the route table picks a handler, and any failure, panics included, ends in
//! a plain-text 500 that still carries the CORS headers.

use crate::cors::Cors;
use crate::error::{ErrorEnvelope, GatewayError, GatewayResult};
use crate::graphql::{self, GraphQlExecutor, Resolvers, SchemaExecutor, build_schema};
use crate::handlers;
use crate::headers::CorsHeaderSet;
use crate::options::CorsOptions;
use crate::request::GatewayRequest;
use crate::response;
use crate::route::Route;
use crate::sitemap::Sitemap;
use crate::store::PostStore;
use crate::trophy::TrophyService;
use axum::Router;
use axum::body::Bytes;
use axum::extract::{Request, State};
use axum::response::Response;
use futures::FutureExt;
use http_body_util::LengthLimitError;
use std::any::Any;
use std::error::Error as StdError;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

/// Largest request body the gateway will buffer.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Read-only state shared by every request.
pub struct GatewayState {
    pub cors: Cors,
    pub executor: Arc<dyn GraphQlExecutor>,
    pub store: Arc<dyn PostStore>,
    pub sitemap: Sitemap,
}

#[derive(Clone)]
pub struct Gateway {
    state: Arc<GatewayState>,
}

impl Gateway {
    pub fn new(state: GatewayState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Wires the async-graphql schema over `store` and `trophies`.
    pub fn build(
        options: CorsOptions,
        store: Arc<dyn PostStore>,
        trophies: Arc<dyn TrophyService>,
        base_url: &str,
    ) -> GatewayResult<Self> {
        let cors = Cors::new(options)?;
        let schema = build_schema(Resolvers::new(Arc::clone(&store), trophies));
        Ok(Self::new(GatewayState {
            cors,
            executor: Arc::new(SchemaExecutor::new(schema)),
            store,
            sitemap: Sitemap::new(base_url),
        }))
    }

    pub async fn dispatch(&self, request: GatewayRequest) -> Response {
        let cors = self.state.cors.check(&request.cors_context());
        let route = Route::resolve(&request.path, request.method.as_str());
        info!(
            method = %request.method,
            path = %request.path,
            route = route.name(),
            "Handling request: {} {}",
            request.method,
            request.path
        );

        let outcome = AssertUnwindSafe(self.route(route, &request, &cors))
            .catch_unwind()
            .await;
        let response = match outcome {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => {
                error!(error = %err, route = route.name(), "request failed");
                response::internal_server_error(&cors)
            }
            Err(panic) => {
                let err = GatewayError::Internal(format!(
                    "handler panicked: {}",
                    panic_message(panic.as_ref())
                ));
                error!(error = %err, route = route.name(), "request failed");
                response::internal_server_error(&cors)
            }
        };

        debug!(
            status = response.status().as_u16(),
            route = route.name(),
            "request completed"
        );
        response
    }

    /// Answers a request whose body could not be read or was too large. CORS
    /// still applies.
    pub fn reject(&self, request: &GatewayRequest, error: &GatewayError) -> Response {
        let cors = self.state.cors.check(&request.cors_context());
        warn!(
            method = %request.method,
            path = %request.path,
            error = %error,
            "rejecting request"
        );
        response::error_envelope(&ErrorEnvelope::from(error), &cors)
    }

    async fn route(
        &self,
        route: Route,
        request: &GatewayRequest,
        cors: &CorsHeaderSet,
    ) -> GatewayResult<Response> {
        let response = match route {
            Route::Root => handlers::root(cors),
            Route::Health => handlers::health(cors),
            Route::Preflight => handlers::preflight(cors),
            Route::GraphQl => {
                graphql::handle_graphql(self.state.executor.as_ref(), request, cors).await
            }
            Route::Sitemap => {
                handlers::sitemap(&self.state.sitemap, self.state.store.as_ref(), cors).await?
            }
            Route::MethodNotAllowed => handlers::method_not_allowed(cors),
            Route::NotFound => handlers::not_found(cors),
        };
        Ok(response)
    }

    /// Single catch-all route; the path table lives in [`Route`].
    pub fn router(&self) -> Router {
        Router::new().fallback(serve_request).with_state(self.clone())
    }

    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        if let Ok(addr) = listener.local_addr() {
            info!(%addr, "blog gateway listening");
        }
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        info!("blog gateway stopped");
        Ok(())
    }
}

async fn serve_request(State(gateway): State<Gateway>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => {
            let request = GatewayRequest::new(parts.method, &parts.uri, parts.headers, bytes);
            gateway.dispatch(request).await
        }
        Err(err) => {
            let request =
                GatewayRequest::new(parts.method, &parts.uri, parts.headers, Bytes::new());
            let error = if exceeds_body_limit(&err) {
                GatewayError::PayloadTooLarge {
                    limit: MAX_BODY_BYTES,
                }
            } else {
                GatewayError::Validation(format!("unreadable request body: {err}"))
            };
            gateway.reject(&request, &error)
        }
    }
}

fn exceeds_body_limit(err: &(dyn StdError + 'static)) -> bool {
    let mut source = Some(err);
    while let Some(current) = source {
        if current.is::<LengthLimitError>() {
            return true;
        }
        source = current.source();
    }
    false
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

#[cfg(test)]
#[path = "dispatcher_test.rs"]
mod dispatcher_test;

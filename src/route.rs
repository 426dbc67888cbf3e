use crate::constants::{method, path};

/// Handler selected for a `(path, method)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Root,
    Preflight,
    GraphQl,
    Sitemap,
    Health,
    MethodNotAllowed,
    NotFound,
}

impl Route {
    /// Paths are matched exactly; `/graphql/` is not `/graphql`.
    pub fn resolve(request_path: &str, request_method: &str) -> Self {
        match request_path {
            path::ROOT => Route::Root,
            path::HEALTH => Route::Health,
            path::GRAPHQL => {
                if request_method.eq_ignore_ascii_case(method::OPTIONS) {
                    Route::Preflight
                } else if request_method.eq_ignore_ascii_case(method::POST) {
                    Route::GraphQl
                } else {
                    Route::MethodNotAllowed
                }
            }
            path::SITEMAP => {
                if request_method.eq_ignore_ascii_case(method::GET) {
                    Route::Sitemap
                } else {
                    Route::MethodNotAllowed
                }
            }
            _ => Route::NotFound,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Route::Root => "root",
            Route::Preflight => "preflight",
            Route::GraphQl => "graphql",
            Route::Sitemap => "sitemap",
            Route::Health => "health",
            Route::MethodNotAllowed => "method_not_allowed",
            Route::NotFound => "not_found",
        }
    }
}

#[cfg(test)]
#[path = "route_test.rs"]
mod route_test;

use crate::constants::cors;
use crate::origin::AllowedOrigins;
use thiserror::Error;

/// Immutable CORS configuration, built once at startup and shared by every
/// request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsOptions {
    pub origins: AllowedOrigins,
    pub methods: Vec<String>,
    pub default_allowed_headers: String,
    pub exposed_headers: Option<String>,
    pub max_age: u64,
}

impl Default for CorsOptions {
    fn default() -> Self {
        Self {
            origins: AllowedOrigins::default(),
            methods: cors::ALLOWED_METHODS.iter().map(|m| m.to_string()).collect(),
            default_allowed_headers: cors::DEFAULT_ALLOWED_HEADERS.to_string(),
            exposed_headers: Some(cors::EXPOSED_HEADERS.to_string()),
            max_age: cors::MAX_AGE_SECONDS,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("allowed origin list contains an empty entry")]
    EmptyOrigin,
    #[error(
        "allowed origin list contains '*'; wildcard origins cannot be combined with credentials"
    )]
    WildcardOrigin,
    #[error("allowed origin '{0}' must not end with '/'")]
    TrailingSlash(String),
    #[error("at least one allowed method is required")]
    NoMethods,
    #[error("default allowed headers must not be empty")]
    EmptyDefaultHeaders,
}

impl CorsOptions {
    pub fn with_origins(origins: AllowedOrigins) -> Self {
        Self {
            origins,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for origin in self.origins.entries() {
            let trimmed = origin.trim();
            if trimmed.is_empty() {
                return Err(ValidationError::EmptyOrigin);
            }
            if trimmed == "*" {
                return Err(ValidationError::WildcardOrigin);
            }
            if trimmed.ends_with('/') {
                return Err(ValidationError::TrailingSlash(origin.clone()));
            }
        }

        if self.methods.iter().all(|method| method.trim().is_empty()) {
            return Err(ValidationError::NoMethods);
        }

        if self.default_allowed_headers.trim().is_empty() {
            return Err(ValidationError::EmptyDefaultHeaders);
        }

        Ok(())
    }

    pub(crate) fn methods_header_value(&self) -> String {
        self.methods
            .iter()
            .map(|method| method.trim())
            .filter(|method| !method.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
#[path = "options_test.rs"]
mod options_test;

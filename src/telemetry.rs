use crate::config::LogFormat;
use tracing_subscriber::{EnvFilter, fmt};

pub const DEFAULT_FILTER: &str = "blog_gateway_rs=info,blog_gateway=info";

/// `RUST_LOG` wins over [`DEFAULT_FILTER`].
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber. A second call is a no-op.
pub fn init(format: LogFormat) {
    let builder = fmt().with_env_filter(env_filter()).with_target(true);
    let result = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
    if let Err(err) = result {
        tracing::debug!(error = %err, "tracing subscriber already installed");
    }
}

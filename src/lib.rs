pub mod auth;
pub mod config;
pub mod constants;
mod context;
mod cors;
pub mod dispatcher;
pub mod error;
pub mod graphql;
pub mod handlers;
mod headers;
mod options;
mod origin;
mod request;
pub mod response;
mod route;
pub mod sitemap;
pub mod store;
pub mod telemetry;
pub mod trophy;

pub use auth::{AuthError, SupabaseAuth, TokenOutcome};
pub use config::{ConfigError, ConfigOverrides, GatewayConfig, LogFormat, StoreKind};
pub use context::RequestContext;
pub use cors::{Cors, compute_cors};
pub use dispatcher::{Gateway, GatewayState};
pub use error::{ErrorCode, ErrorEnvelope, GatewayError, GatewayResult};
pub use headers::CorsHeaderSet;
pub use options::{CorsOptions, ValidationError};
pub use origin::{AllowedOrigins, OriginDecision};
pub use request::{GatewayRequest, extract_bearer_token};
pub use route::Route;
pub use sitemap::Sitemap;
pub use store::{MemoryStore, NewPost, Post, PostPatch, PostStore, StoreError, SupabaseStore};
pub use trophy::{TrophyClient, TrophyError, TrophyService};

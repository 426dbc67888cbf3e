pub mod header {
    pub const ACCESS_CONTROL_ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
    pub const ACCESS_CONTROL_ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
    pub const ACCESS_CONTROL_ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";
    pub const ACCESS_CONTROL_ALLOW_CREDENTIALS: &str = "Access-Control-Allow-Credentials";
    pub const ACCESS_CONTROL_EXPOSE_HEADERS: &str = "Access-Control-Expose-Headers";
    pub const ACCESS_CONTROL_MAX_AGE: &str = "Access-Control-Max-Age";
    pub const ACCESS_CONTROL_REQUEST_HEADERS: &str = "Access-Control-Request-Headers";
    pub const ACCESS_CONTROL_REQUEST_METHOD: &str = "Access-Control-Request-Method";
    pub const AUTHORIZATION: &str = "Authorization";
    pub const CONTENT_TYPE: &str = "Content-Type";
    pub const ORIGIN: &str = "Origin";
    pub const VARY: &str = "Vary";
}

pub mod method {
    pub const GET: &str = "GET";
    pub const OPTIONS: &str = "OPTIONS";
    pub const POST: &str = "POST";
}

pub mod path {
    pub const ROOT: &str = "/";
    pub const GRAPHQL: &str = "/graphql";
    pub const SITEMAP: &str = "/sitemap";
    pub const HEALTH: &str = "/health";
}

pub mod content_type {
    pub const JSON: &str = "application/json";
    pub const XML: &str = "application/xml";
    pub const TEXT: &str = "text/plain; charset=utf-8";
}

pub mod cors {
    pub const ALLOWED_METHODS: [&str; 3] = ["GET", "POST", "OPTIONS"];
    pub const DEFAULT_ALLOWED_HEADERS: &str = "Content-Type, Authorization";
    pub const EXPOSED_HEADERS: &str = "Content-Type, Authorization";
    pub const MAX_AGE_SECONDS: u64 = 86_400;
    pub const PREFLIGHT_VARY: &str =
        "Origin, Access-Control-Request-Method, Access-Control-Request-Headers";

    pub const DEFAULT_ALLOWED_ORIGINS: [&str; 7] = [
        "https://joshuasevy.com",
        "https://www.joshuasevy.com",
        "http://localhost:3000",
        "http://localhost:4000",
        "http://localhost:5173",
        "http://127.0.0.1:5173",
        "http://localhost:5174",
    ];
}

pub const BEARER_PREFIX: &str = "Bearer ";
pub const DEFAULT_BASE_URL: &str = "https://api.joshuasevy.com";
pub const DEFAULT_TROPHY_URL: &str = "https://github-profile-trophy.vercel.app";
pub const ROOT_MESSAGE: &str = "API is running. Use /graphql for queries.";

use crate::constants::{cors, header};
use crate::context::RequestContext;
use crate::headers::CorsHeaderSet;
use crate::options::{CorsOptions, ValidationError};
use crate::origin::OriginDecision;

/// Origin policy: turns a request's CORS inputs into the header set every
/// response must carry.
#[derive(Debug, Clone)]
pub struct Cors {
    options: CorsOptions,
}

impl Cors {
    pub fn new(options: CorsOptions) -> Result<Self, ValidationError> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &CorsOptions {
        &self.options
    }

    pub fn check(&self, request: &RequestContext<'_>) -> CorsHeaderSet {
        compute_cors(&self.options, request)
    }
}

/// Pure function of its inputs. A disallowed or missing origin only drops
/// the allow-origin and credentials headers; blocking is left to the browser.
pub fn compute_cors(options: &CorsOptions, request: &RequestContext<'_>) -> CorsHeaderSet {
    let mut headers = CorsHeaderSet::new();

    if request.is_preflight() {
        headers.add_vary(cors::PREFLIGHT_VARY);
    } else {
        headers.add_vary(header::ORIGIN);
    }

    if let OriginDecision::Allowed(origin) = options.origins.resolve(request.origin) {
        headers.push(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        headers.push(header::ACCESS_CONTROL_ALLOW_CREDENTIALS, "true");
    }

    headers.push(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        options.methods_header_value(),
    );

    let allowed_headers = request
        .access_control_request_headers
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(options.default_allowed_headers.as_str());
    headers.push(header::ACCESS_CONTROL_ALLOW_HEADERS, allowed_headers);

    if let Some(exposed) = options
        .exposed_headers
        .as_deref()
        .filter(|value| !value.trim().is_empty())
    {
        headers.push(header::ACCESS_CONTROL_EXPOSE_HEADERS, exposed);
    }

    headers.push(header::ACCESS_CONTROL_MAX_AGE, options.max_age.to_string());
    headers
}

#[cfg(test)]
#[path = "cors_test.rs"]
mod cors_test;

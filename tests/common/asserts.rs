#![allow(dead_code)]

use super::builders::TestResponse;
use super::headers::{has_header, header_count, header_value, vary_values};
use blog_gateway_rs::constants::header;
use std::collections::HashSet;

pub fn assert_header_eq(response: &TestResponse, name: &str, expected: &str) {
    assert_eq!(
        header_value(&response.headers, name),
        Some(expected),
        "header {name} mismatch"
    );
    assert_eq!(
        header_count(&response.headers, name),
        1,
        "header {name} appears more than once"
    );
}

pub fn assert_header_absent(response: &TestResponse, name: &str) {
    assert!(
        !has_header(&response.headers, name),
        "expected {name} to be absent, found {:?}",
        header_value(&response.headers, name)
    );
}

pub fn assert_vary_eq<I, S>(response: &TestResponse, expected: I)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let expected: HashSet<String> = expected.into_iter().map(Into::into).collect();
    assert_eq!(vary_values(&response.headers), expected);
}

/// Headers every response carries whatever the origin.
pub fn assert_base_cors(response: &TestResponse) {
    assert_header_eq(
        response,
        header::ACCESS_CONTROL_ALLOW_METHODS,
        "GET, POST, OPTIONS",
    );
    assert_header_eq(
        response,
        header::ACCESS_CONTROL_EXPOSE_HEADERS,
        "Content-Type, Authorization",
    );
    assert_header_eq(response, header::ACCESS_CONTROL_MAX_AGE, "86400");
    assert!(has_header(&response.headers, header::VARY));
}

pub fn assert_origin_allowed(response: &TestResponse, origin: &str) {
    assert_base_cors(response);
    assert_header_eq(response, header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    assert_header_eq(response, header::ACCESS_CONTROL_ALLOW_CREDENTIALS, "true");
}

pub fn assert_origin_denied(response: &TestResponse) {
    assert_base_cors(response);
    assert_header_absent(response, header::ACCESS_CONTROL_ALLOW_ORIGIN);
    assert_header_absent(response, header::ACCESS_CONTROL_ALLOW_CREDENTIALS);
}

/// First GraphQL error message in a JSON body.
pub fn first_error_message(response: &TestResponse) -> String {
    response.json()["errors"][0]["message"]
        .as_str()
        .expect("GraphQL error message")
        .to_string()
}

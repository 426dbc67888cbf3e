#![allow(dead_code)]

use axum::http::HeaderMap;
use blog_gateway_rs::constants::header;
use std::collections::HashSet;

pub fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

pub fn has_header(headers: &HeaderMap, name: &str) -> bool {
    headers.contains_key(name)
}

pub fn header_count(headers: &HeaderMap, name: &str) -> usize {
    headers.get_all(name).iter().count()
}

pub fn vary_values(headers: &HeaderMap) -> HashSet<String> {
    header_value(headers, header::VARY)
        .map(|value| {
            value
                .split(',')
                .map(|part| part.trim().to_string())
                .filter(|part| !part.is_empty())
                .collect::<HashSet<_>>()
        })
        .unwrap_or_default()
}

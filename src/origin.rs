use crate::constants::cors::DEFAULT_ALLOWED_ORIGINS;

const MAX_ORIGIN_LENGTH: usize = 4_096;

/// Fixed list of origins that may make credentialed cross-origin calls.
///
/// Matching is byte-for-byte: no wildcards, no subdomain expansion and no
/// case folding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedOrigins {
    entries: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginDecision {
    /// Origin is on the list; echo it back verbatim.
    Allowed(String),
    /// Origin was sent but is not on the list.
    Disallowed,
    /// No usable `Origin` header on the request.
    Absent,
}

impl AllowedOrigins {
    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entries: Vec<String> = Vec::new();
        for value in values {
            let value = value.into();
            if !entries.contains(&value) {
                entries.push(value);
            }
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn allows(&self, origin: &str) -> bool {
        origin.len() <= MAX_ORIGIN_LENGTH && self.entries.iter().any(|entry| entry == origin)
    }

    pub fn resolve(&self, request_origin: Option<&str>) -> OriginDecision {
        match request_origin {
            None | Some("") => OriginDecision::Absent,
            Some(origin) if self.allows(origin) => OriginDecision::Allowed(origin.to_string()),
            Some(_) => OriginDecision::Disallowed,
        }
    }
}

impl Default for AllowedOrigins {
    fn default() -> Self {
        Self::list(DEFAULT_ALLOWED_ORIGINS)
    }
}

#[cfg(test)]
#[path = "origin_test.rs"]
mod origin_test;

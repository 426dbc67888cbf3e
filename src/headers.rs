use crate::constants::header;
use indexmap::IndexMap;

/// Ordered header set produced by the origin policy.
///
/// Names are compared case-insensitively and keep their first insertion
/// position. `Vary` values are merged instead of replaced.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CorsHeaderSet {
    headers: IndexMap<String, String>,
}

impl CorsHeaderSet {
    pub fn new() -> Self {
        Self {
            headers: IndexMap::with_capacity(8),
        }
    }

    pub fn push<N, V>(&mut self, name: N, value: V)
    where
        N: Into<String>,
        V: Into<String>,
    {
        let name = name.into();
        if name.eq_ignore_ascii_case(header::VARY) {
            self.add_vary(value);
            return;
        }

        let value = value.into();
        match self.position(&name) {
            Some(idx) => {
                if let Some((_, existing)) = self.headers.get_index_mut(idx) {
                    *existing = value;
                }
            }
            None => {
                self.headers.insert(name, value);
            }
        }
    }

    pub fn add_vary<S: Into<String>>(&mut self, value: S) {
        let existing_idx = self.position(header::VARY);
        let mut entries: Vec<String> = existing_idx
            .and_then(|idx| self.headers.get_index(idx))
            .map(|(_, existing)| split_list(existing))
            .unwrap_or_default();

        entries.extend(split_list(&value.into()));

        let mut deduped: Vec<String> = Vec::with_capacity(entries.len());
        for entry in entries {
            if deduped
                .iter()
                .any(|existing| existing.eq_ignore_ascii_case(&entry))
            {
                continue;
            }
            deduped.push(entry);
        }

        if deduped.is_empty() {
            if let Some(idx) = existing_idx {
                self.headers.shift_remove_index(idx);
            }
            return;
        }

        let merged = deduped.join(", ");
        match existing_idx.and_then(|idx| self.headers.get_index_mut(idx)) {
            Some((_, existing)) => *existing = merged,
            None => {
                self.headers.insert(header::VARY.to_string(), merged);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name)
            .and_then(|idx| self.headers.get_index(idx))
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.headers
            .keys()
            .position(|existing| existing.eq_ignore_ascii_case(name))
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "headers_test.rs"]
mod headers_test;

use crate::store::{Post, PostStore, StoreResult};
use chrono::{NaiveDate, Utc};
use std::fmt::Write;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const POST_PRIORITY: &str = "0.6";

pub const STATIC_PAGES: [(&str, &str); 5] = [
    ("/", "1.0"),
    ("/about", "0.8"),
    ("/resume", "0.8"),
    ("/contact", "0.6"),
    ("/blog", "0.7"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    pub path: String,
    pub priority: &'static str,
    pub lastmod: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct Sitemap {
    base_url: String,
}

impl Sitemap {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Static pages first, then one entry per post in store order.
    pub fn entries(posts: &[Post]) -> Vec<SitemapEntry> {
        let statics = STATIC_PAGES.iter().map(|(path, priority)| SitemapEntry {
            path: path.to_string(),
            priority,
            lastmod: None,
        });
        let dynamic = posts.iter().map(|post| SitemapEntry {
            path: format!("/blog/{}", post.id),
            priority: POST_PRIORITY,
            lastmod: post.publish_date.as_deref().and_then(parse_date),
        });
        statics.chain(dynamic).collect()
    }

    pub fn render(&self, entries: &[SitemapEntry], today: NaiveDate) -> String {
        let mut xml = String::with_capacity(128 + entries.len() * 128);
        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        let _ = writeln!(xml, "<urlset xmlns=\"{SITEMAP_NS}\">");
        for entry in entries {
            let loc = format!("{}{}", self.base_url, entry.path);
            let lastmod = entry.lastmod.unwrap_or(today).format("%Y-%m-%d");
            let _ = write!(
                xml,
                "  <url>\n    <loc>{}</loc>\n    <lastmod>{lastmod}</lastmod>\n    <priority>{}</priority>\n  </url>\n",
                escape_xml(&loc),
                entry.priority,
            );
        }
        xml.push_str("</urlset>\n");
        xml
    }

    pub async fn generate(&self, store: &dyn PostStore) -> StoreResult<String> {
        let posts = store.list_posts().await?;
        let entries = Self::entries(&posts);
        Ok(self.render(&entries, Utc::now().date_naive()))
    }
}

/// Accepts a bare date or any timestamp that starts with one.
fn parse_date(value: &str) -> Option<NaiveDate> {
    let date = value.trim().get(..10)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
#[path = "sitemap_test.rs"]
mod sitemap_test;

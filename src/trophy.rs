//! GitHub profile trophy passthrough.

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{error, info};

pub const TROPHY_THEME: &str = "darkhub";

#[derive(Debug, Error)]
pub enum TrophyError {
    #[error("Failed to fetch trophies from GitHub Profile Trophy.")]
    Upstream { status: u16 },

    #[error("trophy request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[async_trait]
pub trait TrophyService: Send + Sync {
    /// Trophy markup (SVG) for `username`.
    async fn fetch(&self, username: &str) -> Result<String, TrophyError>;
}

#[derive(Debug, Clone)]
pub struct TrophyClient {
    client: Client,
    base_url: String,
}

impl TrophyClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl TrophyService for TrophyClient {
    async fn fetch(&self, username: &str) -> Result<String, TrophyError> {
        info!(username, "fetching GitHub trophies");
        let url = format!("{}/", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(url)
            .query(&[("username", username), ("theme", TROPHY_THEME)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!(
                status = status.as_u16(),
                reason = status.canonical_reason().unwrap_or_default(),
                "failed to fetch trophies"
            );
            return Err(TrophyError::Upstream {
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

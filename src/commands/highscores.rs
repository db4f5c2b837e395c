use std::time::Duration;

use crate::error::HighscoreError;
use crate::models::account::AccountVariant;
use crate::models::snapshot::{parse_snapshot, Snapshot, NOT_FOUND_MARKER};

/// Anything that can hand back the raw highscores text for an account.
#[allow(async_fn_in_trait)]
pub trait SnapshotSource {
    async fn fetch_snapshot_text(
        &self,
        username: &str,
        variant: AccountVariant,
    ) -> Result<String, HighscoreError>;
}

pub struct HttpSnapshotSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSnapshotSource {
    pub fn new(base_url: &str, timeout: Duration, user_agent: &str) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {e}"))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self, variant: AccountVariant) -> String {
        format!(
            "{}/m={}/index_lite.ws",
            self.base_url,
            variant.highscores_segment()
        )
    }
}

impl SnapshotSource for HttpSnapshotSource {
    async fn fetch_snapshot_text(
        &self,
        username: &str,
        variant: AccountVariant,
    ) -> Result<String, HighscoreError> {
        let url = self.endpoint(variant);
        log::info!("fetching {} highscores for {username}", variant.as_tag());

        let resp = self
            .client
            .get(&url)
            .query(&[("player", username)])
            .send()
            .await
            .map_err(transport_error)?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(HighscoreError::AccountNotFound);
        }
        if !resp.status().is_success() {
            return Err(HighscoreError::FetchUnavailable(format!(
                "highscores answered {}",
                resp.status()
            )));
        }

        let body = resp.text().await.map_err(transport_error)?;
        if body.contains(NOT_FOUND_MARKER) {
            return Err(HighscoreError::AccountNotFound);
        }
        Ok(body)
    }
}

fn transport_error(err: reqwest::Error) -> HighscoreError {
    if err.is_timeout() {
        HighscoreError::FetchTimeout
    } else {
        HighscoreError::FetchUnavailable(err.to_string())
    }
}

/// Fetch and parse one snapshot.
pub async fn fetch_snapshot<S: SnapshotSource>(
    source: &S,
    username: &str,
    variant: AccountVariant,
) -> Result<Snapshot, HighscoreError> {
    let raw = source.fetch_snapshot_text(username, variant).await?;
    parse_snapshot(&raw)
}

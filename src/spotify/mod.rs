//! # Spotify Integration Module
//!
//! Thin reqwest adapter over the Spotify Web API used by the analysis engine.
//! It implements [`FeatureProvider`](crate::provider::FeatureProvider) for
//! canonical track identity and audio features, and lists the tracks of the
//! collections a user can analyze.
//!
//! ## Architecture
//!
//! ```text
//! CLI Layer
//!     ↓
//! Analysis Engine (TrackAnalyzer, CollectionAggregator)
//!     ↓ FeatureProvider
//! Spotify Integration Layer
//!     ├── Features   (GET /tracks/{id}, GET /audio-features/{id})
//!     └── Collections (albums, playlists, liked songs, recently played)
//!     ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## Authentication
//!
//! The client holds an already-authorized bearer token handed in by the
//! caller. It never refreshes or requests tokens; an expired token surfaces
//! as [`ProviderError::Forbidden`].
//!
//! ## Error Mapping
//!
//! | Response | Error |
//! |----------|-------|
//! | 404 | `NotFound` |
//! | 401, 403 | `Forbidden` |
//! | 429 | `RateLimited` with the `Retry-After` hint |
//! | 200 with an `error` object | `RateLimited` (embedded error payload) |
//! | 502 | retried after 10 seconds, up to three times |
//! | undecodable body | `Malformed` |
//! | network failure | `Transport` |
//!
//! Rate-limit retries are not done here: the analyzer owns the cooldown so
//! that it can be shared across concurrent analyses.

use std::time::Duration;

use reqwest::{Client, StatusCode, header::RETRY_AFTER};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::time::sleep;

use crate::provider::ProviderError;

pub mod collections;
pub mod features;

const BAD_GATEWAY_RETRIES: u32 = 3;

#[derive(Debug, Clone)]
pub struct SpotifyClient {
    client: Client,
    api_url: String,
    token: String,
}

impl SpotifyClient {
    pub fn new(api_url: &str, token: &str) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// GETs `url` and decodes the body, mapping Spotify failures onto
    /// [`ProviderError`].
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ProviderError> {
        let mut bad_gateways = 0;

        loop {
            let response = self
                .client
                .get(url)
                .bearer_auth(&self.token)
                .send()
                .await
                .map_err(|e| ProviderError::Transport(e.to_string()))?;

            let status = response.status();
            if status == StatusCode::BAD_GATEWAY && bad_gateways < BAD_GATEWAY_RETRIES {
                bad_gateways += 1;
                sleep(Duration::from_secs(10)).await;
                continue; // retry
            }

            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            if let Some(err) = status_error(status, retry_after.as_deref(), url) {
                return Err(err);
            }

            let body: Value = response.json().await?;
            return decode_body(body);
        }
    }
}

/// Maps a non-success status onto the matching [`ProviderError`].
///
/// `retry_after` is the raw `Retry-After` header (seconds). Returns `None`
/// for success statuses.
pub fn status_error(
    status: StatusCode,
    retry_after: Option<&str>,
    url: &str,
) -> Option<ProviderError> {
    match status {
        StatusCode::NOT_FOUND => Some(ProviderError::NotFound(url.to_string())),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Some(ProviderError::Forbidden(url.to_string()))
        }
        StatusCode::TOO_MANY_REQUESTS => Some(ProviderError::RateLimited {
            retry_after: retry_after
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs),
        }),
        status if !status.is_success() => Some(ProviderError::Transport(format!(
            "{} from {}",
            status, url
        ))),
        _ => None,
    }
}

/// Decodes a successful response body.
///
/// Spotify sometimes answers 200 with an embedded `error` object while it is
/// throttling; that is reported as [`ProviderError::RateLimited`] so the
/// analyzer cools down and retries.
pub fn decode_body<T: DeserializeOwned>(body: Value) -> Result<T, ProviderError> {
    if body.get("error").is_some() {
        return Err(ProviderError::RateLimited { retry_after: None });
    }

    serde_json::from_value(body).map_err(|e| ProviderError::Malformed(e.to_string()))
}

//! Capability interfaces the analysis engine consumes.
//!
//! The engine never talks HTTP and never authenticates. Callers hand it
//! already-authenticated handles implementing these traits; the concrete
//! reqwest-backed adapters live in [`crate::spotify`], [`crate::genius`] and
//! [`crate::nlu`], and tests substitute in-memory fakes.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{AudioFeatures, NluAnalysis, TrackMetadata};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("access forbidden: {0}")]
    Forbidden(String),

    #[error("malformed response: {0}")]
    Malformed(String),

    /// The provider answered, but with an error payload that is expected to
    /// clear after a cooldown.
    #[error("rate limited")]
    RateLimited { retry_after: Option<Duration> },

    #[error("transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ProviderError::Malformed(err.to_string())
        } else {
            ProviderError::Transport(err.to_string())
        }
    }
}

/// Source of canonical track identity and audio features.
#[async_trait]
pub trait FeatureProvider: Send + Sync {
    async fn track_metadata(&self, track_id: &str) -> Result<TrackMetadata, ProviderError>;

    async fn audio_features(&self, track_id: &str) -> Result<AudioFeatures, ProviderError>;
}

/// A search hit on the lyrics site.
#[derive(Debug, Clone, PartialEq)]
pub struct LyricsHit {
    pub url: String,
    pub primary_artist: String,
}

#[async_trait]
pub trait LyricsSource: Send + Sync {
    async fn search(&self, title: &str, artist: &str) -> Result<Vec<LyricsHit>, ProviderError>;

    /// Display text of a lyrics page, `None` when the page has no lyrics block.
    async fn page_text(&self, url: &str) -> Result<Option<String>, ProviderError>;
}

#[async_trait]
pub trait TextAnalyzer: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<NluAnalysis, ProviderError>;
}

use std::sync::Arc;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::{
    analysis::{
        retry::{Cooldown, RetryPolicy},
        segmenter,
    },
    management::TrackCache,
    provider::{FeatureProvider, LyricsSource, ProviderError, TextAnalyzer},
    types::{AudioFeatures, LyricAnalysis, NluAnalysis, TrackMetadata, TrackRecord},
    warning,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// The feature provider permanently refused this track; skip it.
    #[error("track {id} unavailable: {reason}")]
    TrackUnavailable { id: String, reason: ProviderError },

    /// Still rate limited after the retry budget ran out.
    #[error("track {id} still rate limited after {attempts} attempts")]
    RateLimited { id: String, attempts: u32 },

    #[error("no lyrics found for {title} by {artist}")]
    NoLyricsFound { title: String, artist: String },

    #[error("text analysis failed: {0}")]
    TextAnalysisFailed(ProviderError),

    #[error("analysis cancelled")]
    Cancelled,
}

/// Builds one [`TrackRecord`] per track id, memoized in a [`TrackCache`].
pub struct TrackAnalyzer {
    features: Arc<dyn FeatureProvider>,
    lyrics: Arc<dyn LyricsSource>,
    text: Arc<dyn TextAnalyzer>,
    cache: Arc<TrackCache>,
    retry: RetryPolicy,
    cooldown: Arc<Cooldown>,
}

impl TrackAnalyzer {
    pub fn new(
        features: Arc<dyn FeatureProvider>,
        lyrics: Arc<dyn LyricsSource>,
        text: Arc<dyn TextAnalyzer>,
        cache: Arc<TrackCache>,
    ) -> Self {
        Self {
            features,
            lyrics,
            text,
            cache,
            retry: RetryPolicy::default(),
            cooldown: Arc::new(Cooldown::new()),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Returns the cached record for `track_id` untouched, or fetches
    /// features, lyrics and text analysis and caches the result.
    pub async fn analyze(
        &self,
        track_id: &str,
        title: &str,
        primary_artist: &str,
        cancel: &CancellationToken,
    ) -> Result<TrackRecord, AnalysisError> {
        if let Some(record) = self.cache.get(track_id).await {
            return Ok(record);
        }

        if cancel.is_cancelled() {
            return Err(AnalysisError::Cancelled);
        }

        let (metadata, features) = self.fetch_features(track_id, cancel).await?;
        let title = if metadata.title.is_empty() { title.to_string() } else { metadata.title };
        let artist = if metadata.artist.is_empty() {
            primary_artist.to_string()
        } else {
            metadata.artist
        };

        let lyrics = match self.fetch_lyrics(&title, &artist).await {
            Ok(lines) => Some(lines),
            Err(e) => {
                warning!("{}", e);
                None
            }
        };

        let nlu = match &lyrics {
            Some(lines) if !lines.is_empty() => match self.analyze_lyrics(lines).await {
                Ok(nlu) => Some(nlu),
                Err(e) => {
                    warning!("{} ({} by {})", e, title, artist);
                    None
                }
            },
            _ => None,
        };

        let record = TrackRecord {
            id: track_id.to_string(),
            title,
            artist,
            features,
            ai: LyricAnalysis { lyrics, nlu },
        };

        self.cache.put(track_id, record.clone()).await;
        Ok(record)
    }

    async fn fetch_features(
        &self,
        track_id: &str,
        cancel: &CancellationToken,
    ) -> Result<(TrackMetadata, AudioFeatures), AnalysisError> {
        let mut attempt = 0;

        loop {
            if !self.cooldown.wait(cancel).await {
                return Err(AnalysisError::Cancelled);
            }

            let result = match self.features.track_metadata(track_id).await {
                Ok(metadata) => self
                    .features
                    .audio_features(track_id)
                    .await
                    .map(|features| (metadata, features)),
                Err(e) => Err(e),
            };

            match result {
                Ok(fetched) => return Ok(fetched),
                Err(ProviderError::RateLimited { retry_after }) => {
                    if attempt >= self.retry.max_attempts {
                        return Err(AnalysisError::RateLimited {
                            id: track_id.to_string(),
                            attempts: attempt + 1,
                        });
                    }

                    let delay = self.retry.delay_for(attempt, retry_after);
                    warning!(
                        "<{}> got rate limited, waiting {:.1}s for api cooldown",
                        track_id,
                        delay.as_secs_f64()
                    );
                    self.cooldown.extend(delay).await;
                    attempt += 1;
                }
                Err(reason) => {
                    return Err(AnalysisError::TrackUnavailable {
                        id: track_id.to_string(),
                        reason,
                    });
                }
            }
        }
    }

    /// Picks the first search hit credited to `artist` and segments its page.
    async fn fetch_lyrics(&self, title: &str, artist: &str) -> Result<Vec<String>, AnalysisError> {
        let not_found = || AnalysisError::NoLyricsFound {
            title: title.to_string(),
            artist: artist.to_string(),
        };

        let hits = self.lyrics.search(title, artist).await.map_err(|e| {
            warning!("Lyrics search failed for {} by {}: {}", title, artist, e);
            not_found()
        })?;

        let wanted = artist.to_lowercase();
        let hit = hits
            .iter()
            .find(|hit| hit.primary_artist.to_lowercase().contains(&wanted))
            .ok_or_else(not_found)?;

        let text = match self.lyrics.page_text(&hit.url).await {
            Ok(Some(text)) => text,
            Ok(None) => return Err(not_found()),
            Err(e) => {
                warning!("Cannot load lyrics page {}: {}", hit.url, e);
                return Err(not_found());
            }
        };

        segmenter::segment(&text).ok_or_else(not_found)
    }

    /// One provider call per track: all lines are joined into a single text.
    async fn analyze_lyrics(&self, lines: &[String]) -> Result<NluAnalysis, AnalysisError> {
        let text = lines.join(" ");
        self.text
            .analyze(&text)
            .await
            .map_err(AnalysisError::TextAnalysisFailed)
    }
}

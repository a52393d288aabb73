use async_trait::async_trait;

use crate::{
    provider::{FeatureProvider, ProviderError},
    spotify::SpotifyClient,
    types::{AudioFeatures, SpotifyTrack, TrackMetadata},
};

/// Canonical title and primary artist come from `GET /tracks/{id}`, the
/// scalar descriptors from `GET /audio-features/{id}`.
#[async_trait]
impl FeatureProvider for SpotifyClient {
    async fn track_metadata(&self, track_id: &str) -> Result<TrackMetadata, ProviderError> {
        let url = format!("{uri}/tracks/{id}", uri = self.api_url(), id = track_id);
        let track: SpotifyTrack = self.get_json(&url).await?;

        let artist = track
            .artists
            .first()
            .map(|a| a.name.clone())
            .ok_or_else(|| ProviderError::Malformed(format!("track {} has no artist", track_id)))?;

        Ok(TrackMetadata {
            title: track.name,
            artist,
        })
    }

    async fn audio_features(&self, track_id: &str) -> Result<AudioFeatures, ProviderError> {
        let url = format!("{uri}/audio-features/{id}", uri = self.api_url(), id = track_id);
        self.get_json(&url).await
    }
}

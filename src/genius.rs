//! Genius lyrics adapter.
//!
//! Searches songs through the Genius API and scrapes the public song page for
//! its lyrics block. The page text is returned exactly as rendered (markup
//! stripped, no separators) so the segmenter can split it.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::{
    provider::{LyricsHit, LyricsSource, ProviderError},
    utils,
};

const LYRICS_ROOT_MARKER: &str = "id=\"lyrics-root-pin-spacer\"";
const LYRICS_CONTAINER_MARKER: &str = "data-lyrics-container=\"true\"";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    response: SearchHits,
}

#[derive(Debug, Deserialize)]
struct SearchHits {
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    result: SongResult,
}

#[derive(Debug, Deserialize)]
struct SongResult {
    url: String,
    primary_artist: PrimaryArtist,
}

#[derive(Debug, Deserialize)]
struct PrimaryArtist {
    name: String,
}

#[derive(Debug, Clone)]
pub struct GeniusClient {
    client: Client,
    api_url: String,
    api_key: String,
}

impl GeniusClient {
    pub fn new(api_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

/// Text of the lyrics block of a Genius song page, if it has one.
pub fn lyrics_from_page(html: &str) -> Option<String> {
    utils::extract_div_text(html, LYRICS_ROOT_MARKER)
        .or_else(|| utils::extract_all_div_text(html, LYRICS_CONTAINER_MARKER))
}

#[async_trait]
impl LyricsSource for GeniusClient {
    async fn search(&self, title: &str, artist: &str) -> Result<Vec<LyricsHit>, ProviderError> {
        let query = format!("{} {}", title, artist);
        let response = self
            .client
            .get(format!("{}/search", self.api_url))
            .query(&[("q", query.as_str())])
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(ProviderError::Forbidden("genius search".to_string()));
            }
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(ProviderError::RateLimited { retry_after: None });
            }
            status if !status.is_success() => {
                return Err(ProviderError::Transport(format!("{} from genius search", status)));
            }
            _ => {}
        }

        let json = response.json::<SearchResponse>().await?;
        Ok(json
            .response
            .hits
            .into_iter()
            .map(|hit| LyricsHit {
                url: hit.result.url,
                primary_artist: hit.result.primary_artist.name,
            })
            .collect())
    }

    async fn page_text(&self, url: &str) -> Result<Option<String>, ProviderError> {
        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let html = response.error_for_status()?.text().await?;
        Ok(lyrics_from_page(&html))
    }
}

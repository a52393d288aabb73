#![allow(dead_code)]

use std::{
    collections::{BTreeMap, HashMap},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::{Duration, Instant},
};

use async_trait::async_trait;
use sonalyze::{
    analysis::{RetryPolicy, TrackAnalyzer},
    management::TrackCache,
    provider::{FeatureProvider, LyricsHit, LyricsSource, ProviderError, TextAnalyzer},
    types::{
        AudioFeatures, ConceptEntry, Counter, EmotionProfile, LyricAnalysis, NluAnalysis,
        TrackMetadata, TrackRecord,
    },
};

pub const LYRICS_TEXT: &str = "First line hereSecond line hereThird line hereFourth line here";

// Feature provider serving a fixed catalogue, optionally rate limiting the
// first few requests.
pub struct FakeFeatures {
    pub tracks: HashMap<String, (TrackMetadata, AudioFeatures)>,
    pub rate_limited: AtomicUsize,
    pub calls: AtomicUsize,
    /// When each metadata call happened and whether it was rate limited.
    pub log: Mutex<Vec<(Instant, bool)>>,
}

impl FakeFeatures {
    pub fn new() -> Self {
        Self {
            tracks: HashMap::new(),
            rate_limited: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
            log: Mutex::new(Vec::new()),
        }
    }

    pub fn with_track(mut self, id: &str, title: &str, artist: &str, energy: f64) -> Self {
        let metadata = TrackMetadata {
            title: title.to_string(),
            artist: artist.to_string(),
        };
        self.tracks.insert(id.to_string(), (metadata, features_with_energy(energy)));
        self
    }

    pub fn rate_limit_first(self, count: usize) -> Self {
        self.rate_limited.store(count, Ordering::SeqCst);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeatureProvider for FakeFeatures {
    async fn track_metadata(&self, track_id: &str) -> Result<TrackMetadata, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let limited = self
            .rate_limited
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        self.log.lock().unwrap().push((Instant::now(), limited));
        if limited {
            return Err(ProviderError::RateLimited { retry_after: None });
        }

        self.tracks
            .get(track_id)
            .map(|(metadata, _)| metadata.clone())
            .ok_or_else(|| ProviderError::NotFound(track_id.to_string()))
    }

    async fn audio_features(&self, track_id: &str) -> Result<AudioFeatures, ProviderError> {
        self.tracks
            .get(track_id)
            .map(|(_, features)| *features)
            .ok_or_else(|| ProviderError::NotFound(track_id.to_string()))
    }
}

// Lyrics source returning the same hits and page text for every search.
pub struct FakeLyrics {
    pub hits: Vec<LyricsHit>,
    pub text: Option<String>,
    pub searches: AtomicUsize,
}

impl FakeLyrics {
    pub fn for_artist(artist: &str) -> Self {
        Self {
            hits: vec![LyricsHit {
                url: "https://lyrics.test/song".to_string(),
                primary_artist: artist.to_string(),
            }],
            text: Some(LYRICS_TEXT.to_string()),
            searches: AtomicUsize::new(0),
        }
    }

    pub fn none() -> Self {
        Self {
            hits: Vec::new(),
            text: None,
            searches: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl LyricsSource for FakeLyrics {
    async fn search(&self, _title: &str, _artist: &str) -> Result<Vec<LyricsHit>, ProviderError> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        Ok(self.hits.clone())
    }

    async fn page_text(&self, _url: &str) -> Result<Option<String>, ProviderError> {
        Ok(self.text.clone())
    }
}

pub struct FakeText {
    pub result: Result<NluAnalysis, ProviderError>,
    pub calls: AtomicUsize,
}

impl FakeText {
    pub fn ok(analysis: NluAnalysis) -> Self {
        Self {
            result: Ok(analysis),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            result: Err(ProviderError::Transport("service down".to_string())),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextAnalyzer for FakeText {
    async fn analyze(&self, _text: &str) -> Result<NluAnalysis, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

pub fn fast_retry(max_attempts: u32) -> RetryPolicy {
    RetryPolicy::new(Duration::from_millis(1), Duration::from_millis(4), max_attempts)
}

pub fn analyzer(
    features: &Arc<FakeFeatures>,
    lyrics: &Arc<FakeLyrics>,
    text: &Arc<FakeText>,
    cache: &Arc<TrackCache>,
) -> TrackAnalyzer {
    TrackAnalyzer::new(
        features.clone(),
        lyrics.clone(),
        text.clone(),
        cache.clone(),
    )
    .with_retry(fast_retry(3))
}

pub fn features_with_energy(energy: f64) -> AudioFeatures {
    AudioFeatures {
        acousticness: 0.1,
        danceability: 0.5,
        duration_ms: 200_000.0,
        energy,
        instrumentalness: 0.0,
        liveness: 0.2,
        loudness: -6.0,
        speechiness: 0.05,
        tempo: 120.0,
        valence: 0.5,
    }
}

pub fn emotions(joy: f64, sadness: f64) -> EmotionProfile {
    EmotionProfile {
        anger: 0.1,
        disgust: 0.1,
        fear: 0.1,
        joy,
        sadness,
    }
}

pub fn nlu(joy: f64, sadness: f64) -> NluAnalysis {
    NluAnalysis {
        emotions: emotions(joy, sadness),
        concepts: BTreeMap::new(),
        counters: BTreeMap::new(),
    }
}

pub fn nlu_with(
    joy: f64,
    concepts: &[(&str, Vec<ConceptEntry>)],
    counters: &[(&str, &str, Counter)],
) -> NluAnalysis {
    let mut analysis = nlu(joy, 0.2);
    for (category, entries) in concepts {
        analysis.concepts.insert(category.to_string(), entries.clone());
    }
    for (field, key, counter) in counters {
        analysis
            .counters
            .entry(field.to_string())
            .or_default()
            .insert(key.to_string(), counter.clone());
    }
    analysis
}

pub fn record(id: &str, title: &str, artist: &str, nlu: Option<NluAnalysis>) -> TrackRecord {
    let lyrics = nlu.as_ref().map(|_| vec!["a line".to_string(); 4]);
    TrackRecord {
        id: id.to_string(),
        title: title.to_string(),
        artist: artist.to_string(),
        features: features_with_energy(0.5),
        ai: LyricAnalysis { lyrics, nlu },
    }
}

pub fn term(value: &str) -> ConceptEntry {
    ConceptEntry::Term(value.to_string())
}

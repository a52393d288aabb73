use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackStub {
    pub id: String,
    pub title: String,
    pub artists: Vec<String>,
}

impl TrackStub {
    pub fn new(id: &str, title: &str, artists: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            artists: artists.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn primary_artist(&self) -> &str {
        self.artists.first().map(String::as_str).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackMetadata {
    pub title: String,
    pub artist: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub acousticness: f64,
    pub danceability: f64,
    pub duration_ms: f64,
    pub energy: f64,
    pub instrumentalness: f64,
    pub liveness: f64,
    pub loudness: f64,
    pub speechiness: f64,
    pub tempo: f64,
    pub valence: f64,
}

pub const AUDIO_FEATURE_NAMES: [&str; 10] = [
    "acousticness",
    "danceability",
    "duration_ms",
    "energy",
    "instrumentalness",
    "liveness",
    "loudness",
    "speechiness",
    "tempo",
    "valence",
];

impl AudioFeatures {
    pub fn values(&self) -> [f64; 10] {
        [
            self.acousticness,
            self.danceability,
            self.duration_ms,
            self.energy,
            self.instrumentalness,
            self.liveness,
            self.loudness,
            self.speechiness,
            self.tempo,
            self.valence,
        ]
    }

    pub fn from_values(v: [f64; 10]) -> Self {
        Self {
            acousticness: v[0],
            danceability: v[1],
            duration_ms: v[2],
            energy: v[3],
            instrumentalness: v[4],
            liveness: v[5],
            loudness: v[6],
            speechiness: v[7],
            tempo: v[8],
            valence: v[9],
        }
    }

    /// Field-wise arithmetic mean; `None` for an empty input.
    pub fn mean<'a>(items: impl IntoIterator<Item = &'a AudioFeatures>) -> Option<AudioFeatures> {
        let mut sums = [0.0_f64; 10];
        let mut count = 0usize;
        for features in items {
            for (sum, value) in sums.iter_mut().zip(features.values()) {
                *sum += value;
            }
            count += 1;
        }

        if count == 0 {
            return None;
        }

        Some(Self::from_values(sums.map(|s| s / count as f64)))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EmotionProfile {
    #[serde(rename = "Anger")]
    pub anger: f64,
    #[serde(rename = "Disgust")]
    pub disgust: f64,
    #[serde(rename = "Fear")]
    pub fear: f64,
    #[serde(rename = "Joy")]
    pub joy: f64,
    #[serde(rename = "Sadness")]
    pub sadness: f64,
}

pub const EMOTION_NAMES: [&str; 5] = ["Anger", "Disgust", "Fear", "Joy", "Sadness"];

impl EmotionProfile {
    pub fn values(&self) -> [f64; 5] {
        [self.anger, self.disgust, self.fear, self.joy, self.sadness]
    }

    pub fn from_values(v: [f64; 5]) -> Self {
        Self {
            anger: v[0],
            disgust: v[1],
            fear: v[2],
            joy: v[3],
            sadness: v[4],
        }
    }

    /// The emotion with the highest intensity, ties resolved in canonical order.
    pub fn dominant(&self) -> (&'static str, f64) {
        EMOTION_NAMES
            .iter()
            .zip(self.values())
            .fold(("", f64::MIN), |best, (name, value)| {
                if value > best.1 { (*name, value) } else { best }
            })
    }
}

/// One concept under a category; providers occasionally nest a group one level deep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConceptEntry {
    Term(String),
    Group(Vec<String>),
}

pub type ConceptFrequencyTable = BTreeMap<String, Vec<ConceptEntry>>;

/// Value of a per-key counter inside the free-form analysis fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Counter {
    Count(i64),
    Score(f64),
    Terms(Vec<String>),
}

impl Counter {
    /// Sentinel written when a key is seen with both a numeric and a list value.
    pub const CONFLICT: Counter = Counter::Count(1);

    /// Folds `incoming` into `self`.
    ///
    /// Numbers add up (an overflowing integer sum continues as a float),
    /// lists concatenate. A numeric/list clash at the same key
    /// collapses to [`Counter::CONFLICT`], matching how existing analysis
    /// caches were built.
    pub fn absorb(&mut self, incoming: &Counter) {
        let merged = match (&*self, incoming) {
            (Counter::Count(a), Counter::Count(b)) => match a.checked_add(*b) {
                Some(sum) => Counter::Count(sum),
                None => Counter::Score(*a as f64 + *b as f64),
            },
            (Counter::Count(a), Counter::Score(b)) => Counter::Score(*a as f64 + b),
            (Counter::Score(a), Counter::Count(b)) => Counter::Score(a + *b as f64),
            (Counter::Score(a), Counter::Score(b)) => Counter::Score(a + b),
            (Counter::Terms(a), Counter::Terms(b)) => {
                let mut terms = a.clone();
                terms.extend(b.iter().cloned());
                Counter::Terms(terms)
            }
            (Counter::Terms(_), Counter::Count(_) | Counter::Score(_))
            | (Counter::Count(_) | Counter::Score(_), Counter::Terms(_)) => Counter::CONFLICT,
        };
        *self = merged;
    }
}

pub type CounterFields = BTreeMap<String, BTreeMap<String, Counter>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NluAnalysis {
    #[serde(rename = "averageEmotion")]
    pub emotions: EmotionProfile,
    #[serde(rename = "conceptfrequencies", default)]
    pub concepts: ConceptFrequencyTable,
    #[serde(flatten)]
    pub counters: CounterFields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LyricAnalysis {
    pub lyrics: Option<Vec<String>>,
    pub nlu: Option<NluAnalysis>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub id: String,
    #[serde(rename = "song_title", alias = "title")]
    pub title: String,
    #[serde(rename = "artist_name", alias = "artist")]
    pub artist: String,
    #[serde(flatten)]
    pub features: AudioFeatures,
    pub ai: LyricAnalysis,
}

/// Merged concept buckets. Categories share the JSON object with the
/// `singularities` list, so a category of that name is stored under
/// [`MergedConcepts::RENAMED_SINGULARITIES`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergedConcepts {
    #[serde(flatten)]
    pub categories: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub singularities: Vec<String>,
}

impl MergedConcepts {
    pub const SINGULARITIES_KEY: &'static str = "singularities";
    pub const RENAMED_SINGULARITIES: &'static str = "singularities_category";

    /// Bucket for `category`, never colliding with the singularities list.
    pub fn bucket(&mut self, category: &str) -> &mut Vec<String> {
        let key = if category == Self::SINGULARITIES_KEY {
            Self::RENAMED_SINGULARITIES
        } else {
            category
        };
        self.categories.entry(key.to_string()).or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedAi {
    #[serde(rename = "averageEmotion")]
    pub emotions: EmotionProfile,
    #[serde(rename = "conceptfrequencies")]
    pub concepts: MergedConcepts,
    #[serde(flatten)]
    pub counters: CounterFields,
    pub amount: usize,
    pub watson_songs: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionAggregate {
    #[serde(flatten)]
    pub features: AudioFeatures,
    pub ai: Option<MergedAi>,
}

impl CollectionAggregate {
    pub fn amount(&self) -> usize {
        self.ai.as_ref().map_or(0, |ai| ai.amount)
    }
}

#[derive(Tabled)]
pub struct FeatureTableRow {
    pub feature: String,
    pub value: String,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub title: String,
    pub artist: String,
    pub energy: String,
    pub valence: String,
    pub tempo: String,
    pub mood: String,
}

#[derive(Tabled)]
pub struct ConceptTableRow {
    pub category: String,
    pub mentions: usize,
    pub sample: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paging<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
    #[serde(default)]
    pub total: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyArtist {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyTrack {
    pub id: Option<String>,
    pub name: String,
    pub artists: Vec<SpotifyArtist>,
}

impl SpotifyTrack {
    /// Local files and unavailable tracks come back without an id.
    pub fn into_stub(self) -> Option<TrackStub> {
        Some(TrackStub {
            id: self.id.filter(|id| !id.is_empty())?,
            title: self.name,
            artists: self.artists.into_iter().map(|a| a.name).collect(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTrackItem {
    pub track: Option<SpotifyTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayHistoryItem {
    pub track: SpotifyTrack,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedAlbumItem {
    pub album: SavedAlbum,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedAlbum {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SpotifyArtist>,
    pub tracks: Paging<SpotifyTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistOwner {
    pub display_name: Option<String>,
}

/// Link to a playlist's tracks; the tracks themselves are fetched separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracksLink {
    pub href: String,
    pub total: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimplifiedPlaylist {
    pub id: String,
    pub name: String,
    pub owner: PlaylistOwner,
    pub tracks: TracksLink,
}

/// One analyzable collection of the current user, as listed by
/// `collection playlists --list` and `collection saved-albums --list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tabled)]
pub struct CollectionTableRow {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub tracks: u32,
}

impl From<&SimplifiedPlaylist> for CollectionTableRow {
    fn from(playlist: &SimplifiedPlaylist) -> Self {
        Self {
            id: playlist.id.clone(),
            name: playlist.name.clone(),
            owner: playlist.owner.display_name.clone().unwrap_or_default(),
            tracks: playlist.tracks.total,
        }
    }
}

impl From<&SavedAlbum> for CollectionTableRow {
    fn from(album: &SavedAlbum) -> Self {
        Self {
            id: album.id.clone(),
            name: album.name.clone(),
            owner: album
                .artists
                .iter()
                .map(|a| a.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            tracks: album.tracks.total.unwrap_or(album.tracks.items.len() as u32),
        }
    }
}

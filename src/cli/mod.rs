//! # CLI Module
//!
//! This module provides the command-line interface layer for Sonalyze. It
//! wires configuration, the provider adapters and the analysis engine
//! together and renders results for the terminal.
//!
//! ## Command Categories
//!
//! ### Track Analysis
//!
//! - [`track`] - Analyzes a single track (or returns its cached analysis)
//!
//! ### Collection Analysis
//!
//! - [`collection`] - Aggregates an album, playlist, liked songs, recent plays,
//!   all saved albums, all playlists or a track list file into one profile
//! - [`list_collections`] - Lists playlists or saved albums with their ids
//!
//! ### Cache Inspection
//!
//! - [`cache`] - Shows the track cache location and size, or one record
//!
//! ## Architecture Design
//!
//! ```text
//! CLI Layer (User Interface)
//!     ↓
//! Analysis Layer (Aggregator, Analyzer, Merger, Segmenter)
//!     ↓                      ↓
//! Management Layer       Provider Adapters (Spotify, Genius, NLU)
//! (Track Cache)              ↓
//!                        Network Layer (HTTP Requests)
//! ```
//!
//! ## Error Handling Strategy
//!
//! - **Configuration errors**: missing credentials terminate with a message
//!   naming the variable
//! - **Partial failures**: skipped tracks are reported as warnings and the
//!   aggregate covers the rest
//! - **Empty collections**: reported as an error, nothing to aggregate
//! - **Interrupts**: Ctrl-C cancels the running analysis; tracks already
//!   analyzed stay cached
//!
//! ## User Experience Features
//!
//! - Spinner while collections are listed, progress bar while tracks are
//!   analyzed
//! - Tables for features, emotions, concepts and per-track breakdowns
//! - `--json` output for scripting; warnings and errors go to stderr so
//!   stdout stays parseable

mod cache;
mod collection;
mod track;

pub use cache::cache;
pub use collection::CollectionListing;
pub use collection::CollectionSource;
pub use collection::collection;
pub use collection::list_collections;
pub use track::track;

use std::{sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;

use crate::{
    Res,
    analysis::TrackAnalyzer,
    config,
    genius::GeniusClient,
    management::TrackCache,
    nlu::NluClient,
    spotify::SpotifyClient,
};

pub(crate) fn spotify_client() -> Res<SpotifyClient> {
    let token = config::spotify_access_token()?;
    Ok(SpotifyClient::new(&config::spotify_apiurl(), &token))
}

/// Builds an analyzer over the configured providers and the on-disk cache.
pub(crate) async fn build_analyzer(spotify: SpotifyClient) -> Res<TrackAnalyzer> {
    let genius = GeniusClient::new(&config::genius_apiurl(), &config::genius_api_key()?);
    let nlu = NluClient::new(&config::nlu_service_url()?, &config::nlu_api_key()?);
    let cache = TrackCache::open(config::cache_path()).await;

    Ok(TrackAnalyzer::new(
        Arc::new(spotify),
        Arc::new(genius),
        Arc::new(nlu),
        Arc::new(cache),
    )
    .with_retry(config::retry_policy()))
}

/// A token that is cancelled when the user hits Ctrl-C.
pub(crate) fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });
    cancel
}

pub(crate) fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}

pub(crate) fn progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} [{bar:30.blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .progress_chars("=> "),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

//! Configuration management for Sonalyze.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. Provider endpoints and engine tuning
//! fall back to sensible defaults; credentials are required only by the
//! commands that reach the network.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)
//!
//! Values are read here, in the application layer, and passed explicitly into
//! the analysis engine. Nothing below the CLI reads the environment.

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use crate::{analysis::RetryPolicy, management::TrackCache};

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the `sonalyze` data directory if it doesn't exist and loads
/// variables from `sonalyze/.env` inside it:
/// - Linux: `~/.local/share/sonalyze/.env`
/// - macOS: `~/Library/Application Support/sonalyze/.env`
/// - Windows: `%LOCALAPPDATA%/sonalyze/.env`
///
/// # Errors
///
/// Returns an error string if the directory cannot be created or the `.env`
/// file exists but cannot be parsed. A missing file is not an error: every
/// variable can also come from the process environment.
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("sonalyze/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path)
        .map(|_| ())
        .map_err(|e| format!("{}: {}", path.display(), e))
}

fn required(name: &str) -> Result<String, String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(format!("{} must be set", name)),
    }
}

fn parsed_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Returns the Spotify Web API base URL.
///
/// Reads `SPOTIFY_API_URL`, defaulting to `https://api.spotify.com/v1`.
pub fn spotify_apiurl() -> String {
    env::var("SPOTIFY_API_URL").unwrap_or_else(|_| "https://api.spotify.com/v1".to_string())
}

/// Returns the already-authorized Spotify access token.
///
/// Reads `SPOTIFY_ACCESS_TOKEN`. Sonalyze never runs an OAuth flow itself;
/// obtain the token elsewhere and export it.
///
/// # Errors
///
/// Returns an error message if the variable is unset or empty.
pub fn spotify_access_token() -> Result<String, String> {
    required("SPOTIFY_ACCESS_TOKEN")
}

/// Returns the Genius API base URL (`GENIUS_API_URL`, default `https://api.genius.com`).
pub fn genius_apiurl() -> String {
    env::var("GENIUS_API_URL").unwrap_or_else(|_| "https://api.genius.com".to_string())
}

/// Returns the Genius API key (`GENIUS_API_KEY`).
pub fn genius_api_key() -> Result<String, String> {
    required("GENIUS_API_KEY")
}

/// Returns the natural-language analysis service URL (`NLU_SERVICE_URL`).
pub fn nlu_service_url() -> Result<String, String> {
    required("NLU_SERVICE_URL")
}

/// Returns the natural-language analysis API key (`NLU_API_KEY`).
pub fn nlu_api_key() -> Result<String, String> {
    required("NLU_API_KEY")
}

/// Returns the track cache file location.
///
/// Reads `SONALYZE_CACHE_PATH`, defaulting to `sonalyze/cache/song_db.json`
/// in the local data directory.
pub fn cache_path() -> PathBuf {
    env::var("SONALYZE_CACHE_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(TrackCache::default_path)
}

/// Builds the rate-limit retry policy.
///
/// - `SONALYZE_COOLDOWN_SECS` - first cooldown (default 3)
/// - `SONALYZE_MAX_COOLDOWN_SECS` - backoff ceiling (default 48)
/// - `SONALYZE_MAX_RETRIES` - retries before giving up on a track (default 5)
pub fn retry_policy() -> RetryPolicy {
    let base = parsed_or("SONALYZE_COOLDOWN_SECS", 3u64);
    let max = parsed_or("SONALYZE_MAX_COOLDOWN_SECS", base * 16);
    let attempts = parsed_or("SONALYZE_MAX_RETRIES", 5u32);
    RetryPolicy::new(Duration::from_secs(base), Duration::from_secs(max), attempts)
}

/// Returns how many tracks are analyzed at once (`SONALYZE_CONCURRENCY`, default 1).
pub fn concurrency() -> usize {
    parsed_or("SONALYZE_CONCURRENCY", 1usize).max(1)
}

//! Sonalyze Library
//!
//! This library profiles music tracks and whole collections (albums,
//! playlists, liked songs, recent plays, ad hoc lists) by combining audio
//! features with emotion and concept analysis of the lyrics. Every track is
//! analyzed once and memoized in a JSON cache; collections are folded into a
//! single aggregate with averaged features and a merged lyric profile.
//!
//! # Modules
//!
//! - `analysis` - Segmenter, per-track analyzer, merger and collection aggregator
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `genius` - Lyrics search and page scraping adapter
//! - `management` - Durable track cache
//! - `nlu` - Natural-language analysis adapter
//! - `provider` - Capability traits the analysis engine depends on
//! - `spotify` - Spotify Web API adapter (features and collections)
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers

pub mod analysis;
pub mod cli;
pub mod config;
pub mod genius;
pub mod management;
pub mod nlu;
pub mod provider;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for the application layer.
///
/// The analysis engine returns typed errors; the CLI collapses them into a
/// boxed error trait object that stays `Send + Sync` for async contexts.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// Accepts the same arguments as `println!`.
///
/// # Example
///
/// ```
/// info!("Analyzing {} tracks", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// Accepts the same arguments as `println!`.
///
/// # Example
///
/// ```
/// success!("Collection analyzed");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark to stderr and exits
/// the program.
///
/// Only the CLI layer uses this macro. The analysis engine never terminates
/// the process; it returns typed errors or logs with [`warning!`] and
/// carries on.
///
/// # Example
///
/// ```
/// error!("Missing required environment variable: {}", var_name);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark to stderr.
///
/// Used for recoverable issues: skipped tracks, missing lyrics, cache
/// problems. Stdout stays reserved for results, so `--json` output remains
/// parseable. Accepts the same arguments as `eprintln!`.
///
/// # Example
///
/// ```
/// warning!("Skipping {}: {}", title, reason);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use sonalyze::{
    cli::{self, CollectionListing, CollectionSource},
    config, warning,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Analyze a single track
    Track(TrackOptions),

    /// Aggregate a whole collection of tracks
    Collection(CollectionOptions),

    /// Inspect the track cache
    Cache(CacheOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct TrackOptions {
    /// Spotify track id
    pub id: String,

    /// Title hint for the lyrics lookup
    #[clap(long)]
    pub title: Option<String>,

    /// Artist hint for the lyrics lookup
    #[clap(long)]
    pub artist: Option<String>,

    /// Print the record as JSON
    #[clap(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CollectionOptions {
    /// Print the aggregate and per-track breakdown as JSON
    #[clap(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub source: SourceSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum SourceSubcommand {
    /// Tracks of an album
    Album { id: String },

    /// Tracks of a playlist
    Playlist { id: String },

    /// Liked songs of the current user
    Liked,

    /// Recently played tracks
    Recent {
        /// Number of plays to include (1-50)
        #[clap(long, default_value_t = 50)]
        limit: u32,
    },

    /// Tracks of every saved album
    SavedAlbums {
        /// Only list the saved albums and their ids
        #[clap(long)]
        list: bool,
    },

    /// Tracks of every playlist of the user
    Playlists {
        /// Only list the playlists and their ids
        #[clap(long)]
        list: bool,
    },

    /// Tracks listed in a JSON file
    List { file: PathBuf },
}

impl SourceSubcommand {
    /// Listing requested instead of an analysis, if any.
    fn listing(&self) -> Option<CollectionListing> {
        match self {
            SourceSubcommand::SavedAlbums { list: true } => Some(CollectionListing::SavedAlbums),
            SourceSubcommand::Playlists { list: true } => Some(CollectionListing::Playlists),
            _ => None,
        }
    }
}

impl From<SourceSubcommand> for CollectionSource {
    fn from(source: SourceSubcommand) -> Self {
        match source {
            SourceSubcommand::Album { id } => CollectionSource::Album(id),
            SourceSubcommand::Playlist { id } => CollectionSource::Playlist(id),
            SourceSubcommand::Liked => CollectionSource::Liked,
            SourceSubcommand::Recent { limit } => CollectionSource::Recent(limit),
            SourceSubcommand::SavedAlbums { .. } => CollectionSource::SavedAlbums,
            SourceSubcommand::Playlists { .. } => CollectionSource::Playlists,
            SourceSubcommand::List { file } => CollectionSource::List(file),
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct CacheOptions {
    /// Print the cached record of this track id
    #[clap(long)]
    pub show: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Track(opt) => cli::track(opt.id, opt.title, opt.artist, opt.json).await,
        Command::Collection(opt) => match opt.source.listing() {
            Some(listing) => cli::list_collections(listing, opt.json).await,
            None => cli::collection(opt.source.into(), opt.json).await,
        },
        Command::Cache(opt) => cli::cache(opt.show).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}

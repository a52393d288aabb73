use std::path::{Path, PathBuf};

use tabled::Table;

use crate::{
    Res,
    analysis::{CollectionAggregator, TrackBreakdown},
    config, error, info,
    spotify::SpotifyClient,
    success,
    provider::ProviderError,
    types::{
        CollectionAggregate, CollectionTableRow, EMOTION_NAMES, FeatureTableRow, TrackStub,
        TrackTableRow,
    },
    utils, warning,
};

/// Where the tracks of a collection come from.
#[derive(Debug, Clone)]
pub enum CollectionSource {
    Album(String),
    Playlist(String),
    Liked,
    Recent(u32),
    SavedAlbums,
    Playlists,
    List(PathBuf),
}

/// Collections of the current user that can be listed to find their ids.
#[derive(Debug, Clone, Copy)]
pub enum CollectionListing {
    Playlists,
    SavedAlbums,
}

impl CollectionSource {
    fn describe(&self) -> String {
        match self {
            CollectionSource::Album(id) => format!("album {}", id),
            CollectionSource::Playlist(id) => format!("playlist {}", id),
            CollectionSource::Liked => "liked songs".to_string(),
            CollectionSource::Recent(limit) => format!("last {} played tracks", limit),
            CollectionSource::SavedAlbums => "saved albums".to_string(),
            CollectionSource::Playlists => "all playlists".to_string(),
            CollectionSource::List(path) => format!("track list {}", path.display()),
        }
    }
}

async fn load_tracks(spotify: &SpotifyClient, source: &CollectionSource) -> Res<Vec<TrackStub>> {
    let tracks = match source {
        CollectionSource::Album(id) => spotify.album_tracks(id).await?,
        CollectionSource::Playlist(id) => spotify.playlist_tracks(id).await?,
        CollectionSource::Liked => spotify.liked_tracks().await?,
        CollectionSource::Recent(limit) => spotify.recent_tracks(*limit).await?,
        CollectionSource::SavedAlbums => spotify.saved_album_tracks().await?,
        CollectionSource::Playlists => spotify.user_playlist_tracks().await?,
        CollectionSource::List(path) => read_track_list(path).await?,
    };
    Ok(tracks)
}

/// Reads an ad hoc collection: a JSON array of `{ "id", "title", "artists" }`.
pub async fn read_track_list(path: &Path) -> Res<Vec<TrackStub>> {
    let content = async_fs::read_to_string(path).await?;
    let tracks: Vec<TrackStub> = serde_json::from_str(&content)?;
    Ok(tracks)
}

/// Aggregates every track of `source` into one profile and prints it along
/// with the per-track breakdown.
pub async fn collection(source: CollectionSource, json: bool) {
    let spotify = match super::spotify_client() {
        Ok(client) => client,
        Err(e) => error!("Cannot configure Spotify: {}", e),
    };

    let pb = super::spinner(&format!("Fetching tracks of {}...", source.describe()));
    let tracks = load_tracks(&spotify, &source).await;
    pb.finish_and_clear();

    let tracks = match tracks {
        Ok(tracks) if tracks.is_empty() => error!("No tracks found in {}.", source.describe()),
        Ok(tracks) => tracks,
        Err(e) => error!("Cannot load {}: {}", source.describe(), e),
    };

    if !json {
        info!("Analyzing {} tracks of {}", tracks.len(), source.describe());
    }

    let analyzer = match super::build_analyzer(spotify).await {
        Ok(analyzer) => analyzer,
        Err(e) => error!("Cannot configure providers: {}", e),
    };

    let aggregator = CollectionAggregator::new(analyzer)
        .with_concurrency(config::concurrency())
        .with_progress(super::progress_bar());

    let cancel = super::cancel_on_ctrl_c();
    let (aggregate, breakdown) = match aggregator.aggregate(&tracks, &cancel).await {
        Ok(result) => result,
        Err(e) => error!("Cannot aggregate {}: {}", source.describe(), e),
    };

    if json {
        let out = serde_json::json!({
            "aggregate": aggregate,
            "tracks": breakdown,
        });
        match serde_json::to_string_pretty(&out) {
            Ok(out) => println!("{}", out),
            Err(e) => error!("Cannot serialize aggregate: {}", e),
        }
        return;
    }

    render(&aggregate, &breakdown);
}

/// Lists the user's playlists or saved albums with the ids that
/// `collection playlist <ID>` and `collection album <ID>` expect.
pub async fn list_collections(listing: CollectionListing, json: bool) {
    let spotify = match super::spotify_client() {
        Ok(client) => client,
        Err(e) => error!("Cannot configure Spotify: {}", e),
    };

    let pb = super::spinner("Fetching your collections...");
    let rows: Result<Vec<CollectionTableRow>, ProviderError> = match listing {
        CollectionListing::Playlists => spotify
            .user_playlists()
            .await
            .map(|playlists| playlists.iter().map(CollectionTableRow::from).collect()),
        CollectionListing::SavedAlbums => spotify
            .saved_albums()
            .await
            .map(|albums| albums.iter().map(CollectionTableRow::from).collect()),
    };
    pb.finish_and_clear();

    let mut rows = match rows {
        Ok(rows) => rows,
        Err(e) => error!("Cannot list collections: {}", e),
    };
    rows.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    if json {
        match serde_json::to_string_pretty(&rows) {
            Ok(out) => println!("{}", out),
            Err(e) => error!("Cannot serialize collections: {}", e),
        }
        return;
    }

    if rows.is_empty() {
        warning!("Nothing found.");
        return;
    }

    println!("{}", Table::new(rows));
}

fn render(aggregate: &CollectionAggregate, breakdown: &TrackBreakdown) {
    success!(
        "Analyzed {} tracks, {} with lyric analysis",
        breakdown.len(),
        aggregate.amount()
    );
    println!("{}\n", Table::new(utils::feature_rows(&aggregate.features)));

    match &aggregate.ai {
        Some(ai) => {
            let emotion_rows: Vec<FeatureTableRow> = EMOTION_NAMES
                .iter()
                .zip(ai.emotions.values())
                .map(|(name, value)| FeatureTableRow {
                    feature: name.to_string(),
                    value: format!("{:.3}", value),
                })
                .collect();
            println!("{}\n", Table::new(emotion_rows));

            let concepts = utils::top_concepts(&ai.concepts, 10);
            if !concepts.is_empty() {
                println!("{}\n", Table::new(concepts));
            }

            if !ai.concepts.singularities.is_empty() {
                info!("Singular concepts: {}", ai.concepts.singularities.join(", "));
            }

            for (title, artist) in &ai.watson_songs {
                info!("Lyrics analyzed: {} by {}", title, artist);
            }
        }
        None => warning!("No track had analyzable lyrics, showing audio features only."),
    }

    let mut rows: Vec<TrackTableRow> = breakdown.values().map(utils::track_row).collect();
    utils::sort_track_table_rows(&mut rows);
    println!("{}", Table::new(rows));
}

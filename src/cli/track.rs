use tabled::Table;

use crate::{
    error, info, success,
    types::{EMOTION_NAMES, FeatureTableRow, TrackRecord},
    utils, warning,
};

/// Analyzes one track, printing its features, lyric mood and concepts.
///
/// `title` and `artist` are only hints for the lyrics lookup: the canonical
/// values come from Spotify. A track already in the cache is shown without
/// any network call.
pub async fn track(id: String, title: Option<String>, artist: Option<String>, json: bool) {
    let spotify = match super::spotify_client() {
        Ok(client) => client,
        Err(e) => error!("Cannot configure Spotify: {}", e),
    };

    let analyzer = match super::build_analyzer(spotify).await {
        Ok(analyzer) => analyzer,
        Err(e) => error!("Cannot configure providers: {}", e),
    };

    let cancel = super::cancel_on_ctrl_c();
    let pb = super::spinner(&format!("Analyzing track {}...", id));
    let result = analyzer
        .analyze(
            &id,
            title.as_deref().unwrap_or_default(),
            artist.as_deref().unwrap_or_default(),
            &cancel,
        )
        .await;
    pb.finish_and_clear();

    let record = match result {
        Ok(record) => record,
        Err(e) => error!("Cannot analyze track {}: {}", id, e),
    };

    if json {
        match serde_json::to_string_pretty(&record) {
            Ok(out) => println!("{}", out),
            Err(e) => error!("Cannot serialize analysis: {}", e),
        }
        return;
    }

    render(&record);
}

fn render(record: &TrackRecord) {
    success!("{} by {}", record.title, record.artist);
    println!("{}\n", Table::new(utils::feature_rows(&record.features)));

    let Some(nlu) = &record.ai.nlu else {
        match &record.ai.lyrics {
            Some(_) => warning!("Lyrics found, but the text analysis is unavailable."),
            None => warning!("No lyrics found, the analysis covers audio features only."),
        }
        return;
    };

    let emotion_rows: Vec<FeatureTableRow> = EMOTION_NAMES
        .iter()
        .zip(nlu.emotions.values())
        .map(|(name, value)| FeatureTableRow {
            feature: name.to_string(),
            value: format!("{:.3}", value),
        })
        .collect();
    println!("{}\n", Table::new(emotion_rows));

    let (mood, intensity) = nlu.emotions.dominant();
    info!("Dominant emotion: {} ({:.2})", mood, intensity);

    if let Some(lines) = &record.ai.lyrics {
        info!("Lyric lines analyzed: {}", lines.len());
    }

    for (category, concepts) in &nlu.concepts {
        info!("Concept {}: {} entries", category, concepts.len());
    }
}

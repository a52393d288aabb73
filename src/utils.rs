use std::{cmp::Ordering, sync::LazyLock};

use regex::Regex;

use crate::types::{
    AUDIO_FEATURE_NAMES, AudioFeatures, ConceptTableRow, FeatureTableRow, MergedConcepts,
    TrackRecord, TrackTableRow,
};

static DIV_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(/?)div\b[^>]*>").expect("valid div regex"));
static ANY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag regex"));
static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)>").expect("valid script regex")
});

/// Text content of the `<div>` whose opening tag contains `marker`.
///
/// Tags are dropped without inserting separators, the same way a DOM
/// `get_text()` concatenates text nodes, so adjacent lyric lines run together
/// ("...end of lineStart of next").
pub fn extract_div_text(html: &str, marker: &str) -> Option<String> {
    let pos = html.find(marker)?;
    let start = html[..pos].rfind('<')?;

    let mut depth = 0usize;
    for tag in DIV_TAG.captures_iter(&html[start..]) {
        let whole = tag.get(0)?;
        if tag.get(1).is_some_and(|m| m.as_str() == "/") {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                let end = start + whole.end();
                return Some(html_to_text(&html[start..end]));
            }
        } else {
            depth += 1;
        }
    }

    None
}

/// Concatenated text of every `<div>` whose opening tag contains `marker`.
pub fn extract_all_div_text(html: &str, marker: &str) -> Option<String> {
    let mut text = String::new();
    let mut rest = html;
    while let Some(pos) = rest.find(marker) {
        let Some(block) = extract_div_text(rest, marker) else {
            break;
        };
        text.push_str(&block);
        rest = &rest[pos + marker.len()..];
    }

    if text.is_empty() { None } else { Some(text) }
}

pub fn html_to_text(html: &str) -> String {
    let without_scripts = SCRIPT_BLOCK.replace_all(html, "");
    let stripped = ANY_TAG.replace_all(&without_scripts, "");
    decode_entities(&stripped)
}

pub fn decode_entities(text: &str) -> String {
    text.replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

pub fn format_feature(name: &str, value: f64) -> String {
    match name {
        "duration_ms" => {
            let secs = (value / 1000.0).round() as u64;
            format!("{}:{:02}", secs / 60, secs % 60)
        }
        "loudness" => format!("{:.1} dB", value),
        "tempo" => format!("{:.0} BPM", value),
        _ => format!("{:.3}", value),
    }
}

pub fn feature_rows(features: &AudioFeatures) -> Vec<FeatureTableRow> {
    AUDIO_FEATURE_NAMES
        .iter()
        .zip(features.values())
        .map(|(name, value)| FeatureTableRow {
            feature: name.to_string(),
            value: format_feature(name, value),
        })
        .collect()
}

pub fn track_row(record: &TrackRecord) -> TrackTableRow {
    let mood = match &record.ai.nlu {
        Some(nlu) => nlu.emotions.dominant().0.to_string(),
        None if record.ai.lyrics.is_some() => "unanalyzed".to_string(),
        None => "no lyrics".to_string(),
    };

    TrackTableRow {
        title: record.title.clone(),
        artist: record.artist.clone(),
        energy: format_feature("energy", record.features.energy),
        valence: format_feature("valence", record.features.valence),
        tempo: format_feature("tempo", record.features.tempo),
        mood,
    }
}

pub fn sort_track_table_rows(rows: &mut Vec<TrackTableRow>) {
    rows.sort_by(|a, b| match a.artist.cmp(&b.artist) {
        Ordering::Equal => a.title.cmp(&b.title),
        other => other,
    });
}

/// Categories ordered by number of merged concepts, most mentioned first.
pub fn top_concepts(concepts: &MergedConcepts, limit: usize) -> Vec<ConceptTableRow> {
    let mut rows: Vec<ConceptTableRow> = concepts
        .categories
        .iter()
        .map(|(category, terms)| ConceptTableRow {
            category: category.clone(),
            mentions: terms.len(),
            sample: terms.iter().take(3).cloned().collect::<Vec<_>>().join(", "),
        })
        .collect();

    rows.sort_by(|a, b| match b.mentions.cmp(&a.mentions) {
        Ordering::Equal => a.category.cmp(&b.category),
        other => other,
    });
    rows.truncate(limit);
    rows
}

//! Merging of per-track natural-language analysis into one collection profile.
//!
//! Only records carrying an analysis take part. Emotions are averaged per
//! canonical emotion; concept categories are unioned with their concepts
//! concatenated; every other counter field is folded key by key through
//! [`Counter::absorb`].

use std::collections::BTreeMap;

use crate::types::{
    ConceptEntry, Counter, CounterFields, EmotionProfile, MergedAi, MergedConcepts, TrackRecord,
};

/// Returns `None` when no record has an analysis.
pub fn merge<'a>(records: impl IntoIterator<Item = &'a TrackRecord>) -> Option<MergedAi> {
    let mut emotion_sums = [0.0_f64; 5];
    let mut concepts = MergedConcepts::default();
    let mut counters = CounterFields::new();
    let mut watson_songs = Vec::new();

    for record in records {
        let Some(nlu) = &record.ai.nlu else {
            continue;
        };

        for (sum, value) in emotion_sums.iter_mut().zip(nlu.emotions.values()) {
            *sum += value;
        }

        for (category, entries) in &nlu.concepts {
            merge_category(&mut concepts, category, entries);
        }

        for (field, values) in &nlu.counters {
            merge_counters(counters.entry(field.clone()).or_default(), values);
        }

        watson_songs.push((record.title.clone(), record.artist.clone()));
    }

    if watson_songs.is_empty() {
        return None;
    }

    let amount = watson_songs.len();
    Some(MergedAi {
        emotions: EmotionProfile::from_values(emotion_sums.map(|s| s / amount as f64)),
        concepts,
        counters,
        amount,
        watson_songs,
    })
}

fn merge_category(concepts: &mut MergedConcepts, category: &str, entries: &[ConceptEntry]) {
    // a category without concepts is a singular label, not a bucket
    if entries.is_empty() {
        if !concepts.singularities.iter().any(|s| s == category) {
            concepts.singularities.push(category.to_string());
        }
        return;
    }

    let bucket = concepts.bucket(category);
    for entry in entries {
        match entry {
            ConceptEntry::Term(term) => bucket.push(term.clone()),
            ConceptEntry::Group(terms) => bucket.extend(terms.iter().cloned()),
        }
    }
}

fn merge_counters(merged: &mut BTreeMap<String, Counter>, incoming: &BTreeMap<String, Counter>) {
    for (key, value) in incoming {
        match merged.get_mut(key) {
            Some(existing) => existing.absorb(value),
            None => {
                merged.insert(key.clone(), value.clone());
            }
        }
    }
}

mod common;

use common::*;
use sonalyze::{
    analysis::merger::merge,
    types::{ConceptEntry, Counter, MergedConcepts, TrackRecord},
};

#[test]
fn test_merge_nothing() {
    assert_eq!(merge(&Vec::<TrackRecord>::new()), None);
}

#[test]
fn test_merge_without_any_analysis() {
    let records = vec![
        record("a", "Song A", "Band", None),
        record("b", "Song B", "Band", None),
    ];
    assert_eq!(merge(&records), None);
}

#[test]
fn test_single_record_keeps_its_emotions() {
    let records = vec![record("a", "Song A", "Band", Some(nlu(0.7, 0.3)))];
    let merged = merge(&records).unwrap();

    assert_eq!(merged.emotions, emotions(0.7, 0.3));
    assert_eq!(merged.amount, 1);
    assert_eq!(
        merged.watson_songs,
        vec![("Song A".to_string(), "Band".to_string())]
    );
}

#[test]
fn test_emotions_averaged_over_analyzed_records_only() {
    let records = vec![
        record("a", "Song A", "Band", Some(nlu(0.2, 0.8))),
        record("b", "Song B", "Band", None),
        record("c", "Song C", "Band", Some(nlu(0.6, 0.4))),
    ];
    let merged = merge(&records).unwrap();

    assert_eq!(merged.amount, 2);
    assert_eq!(merged.watson_songs.len(), merged.amount);
    assert!((merged.emotions.joy - 0.4).abs() < 1e-9);
    assert!((merged.emotions.sadness - 0.6).abs() < 1e-9);
    assert!((merged.emotions.anger - 0.1).abs() < 1e-9);
}

#[test]
fn test_disjoint_categories_are_unioned() {
    let records = vec![
        record(
            "a",
            "Song A",
            "Band",
            Some(nlu_with(0.5, &[("love", vec![term("romance")])], &[])),
        ),
        record(
            "b",
            "Song B",
            "Band",
            Some(nlu_with(
                0.5,
                &[
                    ("love", vec![term("heartbreak")]),
                    (
                        "travel",
                        vec![ConceptEntry::Group(vec!["road".to_string(), "car".to_string()])],
                    ),
                ],
                &[],
            )),
        ),
    ];
    let merged = merge(&records).unwrap();

    assert_eq!(
        merged.concepts.categories["love"],
        vec!["romance".to_string(), "heartbreak".to_string()]
    );
    // Nested groups are flattened into the bucket
    assert_eq!(
        merged.concepts.categories["travel"],
        vec!["road".to_string(), "car".to_string()]
    );
    assert!(merged.concepts.singularities.is_empty());
}

#[test]
fn test_empty_categories_become_singularities() {
    let records = vec![
        record("a", "Song A", "Band", Some(nlu_with(0.5, &[("sports", vec![])], &[]))),
        record("b", "Song B", "Band", Some(nlu_with(0.5, &[("sports", vec![])], &[]))),
    ];
    let merged = merge(&records).unwrap();

    assert_eq!(merged.concepts.singularities, vec!["sports".to_string()]);
    assert!(!merged.concepts.categories.contains_key("sports"));
}

#[test]
fn test_numeric_counters_are_summed() {
    let records = vec![
        record(
            "a",
            "Song A",
            "Band",
            Some(nlu_with(0.5, &[], &[("keywords", "night", Counter::Count(2))])),
        ),
        record(
            "b",
            "Song B",
            "Band",
            Some(nlu_with(
                0.5,
                &[],
                &[
                    ("keywords", "night", Counter::Count(3)),
                    ("keywords", "day", Counter::Count(1)),
                ],
            )),
        ),
    ];
    let merged = merge(&records).unwrap();

    let keywords = &merged.counters["keywords"];
    assert_eq!(keywords["night"], Counter::Count(5));
    assert_eq!(keywords["day"], Counter::Count(1));
}

#[test]
fn test_list_counters_are_concatenated() {
    let records = vec![
        record(
            "a",
            "Song A",
            "Band",
            Some(nlu_with(
                0.5,
                &[],
                &[("entities", "Person", Counter::Terms(vec!["Jolene".to_string()]))],
            )),
        ),
        record(
            "b",
            "Song B",
            "Band",
            Some(nlu_with(
                0.5,
                &[],
                &[("entities", "Person", Counter::Terms(vec!["Roxanne".to_string()]))],
            )),
        ),
    ];
    let merged = merge(&records).unwrap();

    assert_eq!(
        merged.counters["entities"]["Person"],
        Counter::Terms(vec!["Jolene".to_string(), "Roxanne".to_string()])
    );
}

#[test]
fn test_type_conflict_collapses_to_sentinel() {
    let numeric_then_list = vec![
        record(
            "a",
            "Song A",
            "Band",
            Some(nlu_with(0.5, &[], &[("extra", "mixed", Counter::Count(4))])),
        ),
        record(
            "b",
            "Song B",
            "Band",
            Some(nlu_with(
                0.5,
                &[],
                &[("extra", "mixed", Counter::Terms(vec!["x".to_string()]))],
            )),
        ),
    ];
    let merged = merge(&numeric_then_list).unwrap();
    assert_eq!(merged.counters["extra"]["mixed"], Counter::CONFLICT);

    let list_then_numeric: Vec<_> = numeric_then_list.into_iter().rev().collect();
    let merged = merge(&list_then_numeric).unwrap();
    assert_eq!(merged.counters["extra"]["mixed"], Counter::CONFLICT);
}

#[test]
fn test_overflowing_count_continues_as_score() {
    let mut counter = Counter::Count(i64::MAX);
    counter.absorb(&Counter::Count(1));
    assert_eq!(counter, Counter::Score(i64::MAX as f64 + 1.0));

    let records = vec![
        record(
            "a",
            "Song A",
            "Band",
            Some(nlu_with(0.5, &[], &[("keywords", "night", Counter::Count(i64::MAX))])),
        ),
        record(
            "b",
            "Song B",
            "Band",
            Some(nlu_with(0.5, &[], &[("keywords", "night", Counter::Count(i64::MAX))])),
        ),
    ];
    let merged = merge(&records).unwrap();

    assert_eq!(
        merged.counters["keywords"]["night"],
        Counter::Score(2.0 * i64::MAX as f64)
    );
}

#[test]
fn test_category_named_singularities_does_not_clobber_list() {
    let records = vec![
        record(
            "a",
            "Song A",
            "Band",
            Some(nlu_with(
                0.5,
                &[("singularities", vec![term("x")]), ("sports", vec![])],
                &[],
            )),
        ),
    ];
    let merged = merge(&records).unwrap();

    assert_eq!(
        merged.concepts.categories[MergedConcepts::RENAMED_SINGULARITIES],
        vec!["x".to_string()]
    );
    assert!(!merged.concepts.categories.contains_key(MergedConcepts::SINGULARITIES_KEY));
    assert_eq!(merged.concepts.singularities, vec!["sports".to_string()]);

    // Both survive serialization side by side
    let json = serde_json::to_value(&merged.concepts).unwrap();
    assert_eq!(json["singularities"], serde_json::json!(["sports"]));
    assert_eq!(json["singularities_category"], serde_json::json!(["x"]));
}

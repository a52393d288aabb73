//! Heuristic splitting of scraped lyric text into sung lines.
//!
//! Lyrics pages render each line in its own element, so once markup is
//! stripped the lines run together with no separator. A lowercase letter
//! directly followed by an uppercase one is taken as a line boundary. This is
//! a best-effort heuristic, not a tokenizer: lines ending in punctuation or a
//! capitalised word are not split, and names like "McCartney" are.

use std::sync::LazyLock;

use regex::Regex;

/// Site chrome that survives text extraction as a line of its own.
pub const SHARE_BOILERPLATE: &str = "Share URLCopy";
pub const EMBED_MARKERS: [&str; 2] = ["Embed", "1Embed"];

/// Anything with this many lines or fewer carries too little text to analyze.
pub const MIN_LINES: usize = 3;

static ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]").expect("valid annotation regex"));

/// Splits `text` at every lowercase -> uppercase transition.
///
/// Text without any transition comes back as a single line; empty text as no
/// lines at all.
pub fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut previous: Option<char> = None;

    for c in text.chars() {
        if previous.is_some_and(char::is_lowercase) && c.is_uppercase() {
            lines.push(std::mem::take(&mut current));
        }
        current.push(c);
        previous = Some(c);
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// Replaces every `[...]` song-structure annotation with a single space.
pub fn strip_annotations(line: &str) -> String {
    ANNOTATION.replace_all(line, " ").into_owned()
}

/// Turns a scraped lyrics blob into lyric lines, or `None` when too little
/// usable text remains after cleanup.
pub fn segment(text: &str) -> Option<Vec<String>> {
    let mut lines: Vec<String> = split_lines(text)
        .iter()
        .map(|line| strip_annotations(line))
        .filter(|line| line != SHARE_BOILERPLATE)
        .collect();

    if lines
        .last()
        .is_some_and(|last| EMBED_MARKERS.contains(&last.as_str()))
    {
        lines.pop();
    }

    if lines.len() <= MIN_LINES {
        return None;
    }

    Some(lines)
}

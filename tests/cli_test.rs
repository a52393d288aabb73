mod common;

use std::process::Command;

use common::*;
use serde_json::Value;
use sonalyze::management::TrackCache;
use tempfile::TempDir;

// Nothing listens on the discard port, so every network call fails fast.
const UNREACHABLE: &str = "http://127.0.0.1:9";

#[tokio::test]
async fn test_json_output_stays_parseable_when_tracks_are_skipped() {
    let dir = TempDir::new().unwrap();
    let cache_path = dir.path().join("song_db.json");
    let list_path = dir.path().join("tracks.json");

    let cache = TrackCache::open(&cache_path).await;
    cache.put("a", record("a", "Song A", "Band", None)).await;

    std::fs::write(
        &list_path,
        r#"[
            { "id": "a", "title": "Song A", "artists": ["Band"] },
            { "id": "gone", "title": "Gone", "artists": ["Band"] }
        ]"#,
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_sonalyze"))
        .args(["collection", "--json", "list"])
        .arg(&list_path)
        .env("XDG_DATA_HOME", dir.path())
        .env("SPOTIFY_ACCESS_TOKEN", "token")
        .env("SPOTIFY_API_URL", UNREACHABLE)
        .env("GENIUS_API_KEY", "key")
        .env("GENIUS_API_URL", UNREACHABLE)
        .env("NLU_API_KEY", "key")
        .env("NLU_SERVICE_URL", UNREACHABLE)
        .env("SONALYZE_CACHE_PATH", &cache_path)
        .env("SONALYZE_CONCURRENCY", "1")
        .env("NO_PROXY", "*")
        .env_remove("HTTP_PROXY")
        .env_remove("HTTPS_PROXY")
        .env_remove("ALL_PROXY")
        .env_remove("http_proxy")
        .env_remove("https_proxy")
        .env_remove("all_proxy")
        .output()
        .unwrap();

    assert!(output.status.success());

    // The skipped track is reported on stderr only
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Skipping Gone by Band"));

    let out: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(out["tracks"]["Song A"]["id"], "a");
    assert!(out["tracks"].get("Gone").is_none());
    assert!(out["aggregate"].is_object());
}

use crate::{config, error, info, management::TrackCache, warning};

/// Shows where the cache lives and how many tracks it holds, or prints a
/// single cached record as JSON.
pub async fn cache(show: Option<String>) {
    let path = config::cache_path();
    let cache = TrackCache::open(&path).await;

    let Some(id) = show else {
        info!("Track cache: {}", path.display());
        info!("Cached tracks: {}", cache.len().await);
        return;
    };

    match cache.get(&id).await {
        Some(record) => match serde_json::to_string_pretty(&record) {
            Ok(out) => println!("{}", out),
            Err(e) => error!("Cannot serialize record {}: {}", id, e),
        },
        None => warning!("Track {} is not cached.", id),
    }
}

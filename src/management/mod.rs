mod cache;

pub use cache::CacheError;
pub use cache::TrackCache;

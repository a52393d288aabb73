use serde::de::DeserializeOwned;

use crate::{
    provider::ProviderError,
    spotify::SpotifyClient,
    types::{
        Paging, PlayHistoryItem, SavedAlbum, SavedAlbumItem, SavedTrackItem, SimplifiedPlaylist,
        SpotifyTrack, TrackStub,
    },
};

/// Spotify caps `limit` on recently played at 50.
pub const RECENT_LIMIT_MAX: u32 = 50;

impl SpotifyClient {
    /// Follows `next` links until the last page.
    async fn paginate<T: DeserializeOwned>(&self, first_url: String) -> Result<Vec<T>, ProviderError> {
        let mut items = Vec::new();
        let mut next = Some(first_url);

        while let Some(url) = next {
            let page: Paging<T> = self.get_json(&url).await?;
            items.extend(page.items);
            next = page.next;
        }

        Ok(items)
    }

    pub async fn album_tracks(&self, album_id: &str) -> Result<Vec<TrackStub>, ProviderError> {
        let url = format!(
            "{uri}/albums/{id}/tracks?limit=50",
            uri = self.api_url(),
            id = album_id
        );
        let tracks: Vec<SpotifyTrack> = self.paginate(url).await?;
        Ok(tracks.into_iter().filter_map(SpotifyTrack::into_stub).collect())
    }

    pub async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<TrackStub>, ProviderError> {
        let url = format!(
            "{uri}/playlists/{id}/tracks?limit=100",
            uri = self.api_url(),
            id = playlist_id
        );
        let items: Vec<SavedTrackItem> = self.paginate(url).await?;
        Ok(playlist_item_stubs(items))
    }

    pub async fn liked_tracks(&self) -> Result<Vec<TrackStub>, ProviderError> {
        let url = format!("{uri}/me/tracks?limit=50", uri = self.api_url());
        let items: Vec<SavedTrackItem> = self.paginate(url).await?;
        Ok(playlist_item_stubs(items))
    }

    /// Only the latest page: the play history is not paginated backwards here.
    pub async fn recent_tracks(&self, limit: u32) -> Result<Vec<TrackStub>, ProviderError> {
        let url = format!(
            "{uri}/me/player/recently-played?limit={limit}",
            uri = self.api_url(),
            limit = limit.clamp(1, RECENT_LIMIT_MAX)
        );
        let page: Paging<PlayHistoryItem> = self.get_json(&url).await?;
        Ok(page
            .items
            .into_iter()
            .filter_map(|item| item.track.into_stub())
            .collect())
    }

    /// Albums saved in the user's library, each with the first page of its
    /// tracks embedded.
    pub async fn saved_albums(&self) -> Result<Vec<SavedAlbum>, ProviderError> {
        let url = format!("{uri}/me/albums?limit=50", uri = self.api_url());
        let items: Vec<SavedAlbumItem> = self.paginate(url).await?;
        Ok(items.into_iter().map(|item| item.album).collect())
    }

    /// Every track of every saved album, album by album. Album track lists
    /// are taken from the embedded first page.
    pub async fn saved_album_tracks(&self) -> Result<Vec<TrackStub>, ProviderError> {
        Ok(album_stubs(self.saved_albums().await?))
    }

    /// Playlists owned or followed by the user.
    pub async fn user_playlists(&self) -> Result<Vec<SimplifiedPlaylist>, ProviderError> {
        let url = format!("{uri}/me/playlists?limit=50", uri = self.api_url());
        self.paginate(url).await
    }

    /// Every track of every playlist of the user, playlist by playlist.
    /// Each playlist's track list is followed through its own pagination.
    pub async fn user_playlist_tracks(&self) -> Result<Vec<TrackStub>, ProviderError> {
        let mut stubs = Vec::new();
        for playlist in self.user_playlists().await? {
            let items: Vec<SavedTrackItem> = self.paginate(playlist.tracks.href).await?;
            stubs.extend(playlist_item_stubs(items));
        }
        Ok(stubs)
    }
}

/// Tracks of saved albums in album order, skipping tracks without an id.
pub fn album_stubs(albums: Vec<SavedAlbum>) -> Vec<TrackStub> {
    albums
        .into_iter()
        .flat_map(|album| album.tracks.items)
        .filter_map(SpotifyTrack::into_stub)
        .collect()
}

/// Playlist entries that still point at an available track.
pub fn playlist_item_stubs(items: Vec<SavedTrackItem>) -> Vec<TrackStub> {
    items
        .into_iter()
        .filter_map(|item| item.track.and_then(SpotifyTrack::into_stub))
        .collect()
}

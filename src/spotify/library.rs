use crate::{
    types::{SavedTracksResponse, Track},
    utils,
};

use super::SpotifyApi;

const PAGE_SIZE: u64 = 50;

impl SpotifyApi {
    /// Retrieves one page of the user's saved tracks.
    ///
    /// Returns the converted tracks, the total size of the library and
    /// whether another page follows.
    pub async fn liked_songs_page(
        &self,
        token: &str,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<Track>, u64, bool), reqwest::Error> {
        let url = self.url("/me/tracks");
        let response = self
            .send(|client| {
                client
                    .get(&url)
                    .query(&[("limit", limit), ("offset", offset)])
                    .bearer_auth(token)
            })
            .await?;

        let page = response.json::<SavedTracksResponse>().await?;
        let tracks = page
            .items
            .into_iter()
            .map(|saved| utils::to_track(saved.track))
            .collect();

        Ok((tracks, page.total, page.next.is_some()))
    }

    /// Retrieves the complete liked-songs library.
    ///
    /// Pages through `/me/tracks` until Spotify reports no further page.
    pub async fn liked_songs(&self, token: &str) -> Result<Vec<Track>, reqwest::Error> {
        let mut all_tracks: Vec<Track> = Vec::new();
        let mut offset = 0;

        loop {
            let (tracks, _total, has_next) =
                self.liked_songs_page(token, PAGE_SIZE, offset).await?;

            if tracks.is_empty() {
                break;
            }

            offset += tracks.len() as u64;
            all_tracks.extend(tracks);

            if !has_next {
                break;
            }
        }

        Ok(all_tracks)
    }
}

use crate::types::{Device, DevicesResponse, StartPlaybackRequest};

use super::SpotifyApi;

impl SpotifyApi {
    /// Lists the devices Spotify could currently play on.
    pub async fn devices(&self, token: &str) -> Result<Vec<Device>, reqwest::Error> {
        let url = self.url("/me/player/devices");
        let response = self
            .send(|client| client.get(&url).bearer_auth(token))
            .await?;

        let res = response.json::<DevicesResponse>().await?;
        Ok(res.devices)
    }

    /// Starts `track_uri` on the active device at `offset_secs`.
    pub async fn play(
        &self,
        token: &str,
        track_uri: &str,
        offset_secs: u64,
    ) -> Result<(), reqwest::Error> {
        let url = self.url("/me/player/play");
        let body = StartPlaybackRequest {
            uris: vec![track_uri.to_string()],
            position_ms: offset_secs * 1000,
        };

        self.send(|client| client.put(&url).bearer_auth(token).json(&body))
            .await?;
        Ok(())
    }
}

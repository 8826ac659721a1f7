use crate::types::UserProfile;

use super::SpotifyApi;

impl SpotifyApi {
    pub async fn profile(&self, token: &str) -> Result<UserProfile, reqwest::Error> {
        let url = self.url("/me");
        let response = self
            .send(|client| client.get(&url).bearer_auth(token))
            .await?;

        response.json::<UserProfile>().await
    }
}

impl UserProfile {
    /// Name to greet the user with; Spotify may omit the display name.
    pub fn greeting_name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.id)
    }
}

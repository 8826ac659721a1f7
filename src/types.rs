use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// An access token as handed out by Spotify's token endpoint.
#[derive(Debug, Clone)]
pub struct Token {
    pub access_token: String,
    pub expires_in: u64,
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

/// Read-only session context, created once per successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
}

impl Session {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }
}

/// A liked song as the radio engine sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub uri: String,
    pub name: String,
    pub artist: String,
    pub duration_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTracksResponse {
    pub items: Vec<SavedTrack>,
    pub next: Option<String>,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTrack {
    pub track: ApiTrack,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiTrack {
    pub uri: String,
    pub name: String,
    pub duration_ms: u64,
    pub artists: Vec<ApiArtist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiArtist {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikedSongs {
    pub items: Vec<Track>,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevicesResponse {
    pub devices: Vec<Device>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: Option<String>,
    pub name: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartPlaybackRequest {
    pub uris: Vec<String>,
    pub position_ms: u64,
}

/// Body accepted by the relay's `PUT /play`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayPlayRequest {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub track_uri: String,
    #[serde(default)]
    pub offset_seconds: u64,
}

/// A remote play command issued by the selected radio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackRequest {
    pub token: String,
    pub track_uri: String,
    pub offset_secs: u64,
}

#[derive(Tabled)]
pub struct RadioTableRow {
    #[tabled(rename = "")]
    pub selected: String,
    pub radio: usize,
    pub track: String,
    pub artist: String,
    pub progress: String,
    pub state: String,
}

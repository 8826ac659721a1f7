use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};
use url::Url;

use crate::types::{ApiTrack, Track};

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Builds the Spotify authorization URL for the authorization code flow.
///
/// Pass a code challenge to request the PKCE variant (S256).
pub fn build_authorize_url(
    auth_url: &str,
    client_id: &str,
    redirect_uri: &str,
    scope: &str,
    code_challenge: Option<&str>,
) -> Result<Url, url::ParseError> {
    let mut params = vec![
        ("client_id", client_id),
        ("response_type", "code"),
        ("redirect_uri", redirect_uri),
        ("scope", scope),
    ];
    if let Some(challenge) = code_challenge {
        params.push(("code_challenge", challenge));
        params.push(("code_challenge_method", "S256"));
    }

    Url::parse_with_params(auth_url, &params)
}

/// Splits `tracks` into consecutive groups of `group_size`.
///
/// The last group may be shorter and is never dropped. A `group_size` of
/// zero yields no groups.
pub fn partition(tracks: Vec<Track>, group_size: usize) -> Vec<Vec<Track>> {
    if group_size == 0 {
        return Vec::new();
    }

    tracks
        .chunks(group_size)
        .map(|chunk| chunk.to_vec())
        .collect()
}

/// Whole simulated seconds needed to play `duration_ms`.
///
/// A partial last second still takes a full tick.
pub fn duration_secs_from_ms(duration_ms: u64) -> u64 {
    duration_ms.div_ceil(1000)
}

pub fn to_track(track: ApiTrack) -> Track {
    Track {
        uri: track.uri,
        name: track.name,
        artist: track
            .artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        duration_secs: duration_secs_from_ms(track.duration_ms),
    }
}

/// Formats seconds as `m:ss`.
pub fn format_secs(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

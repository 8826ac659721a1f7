use std::{collections::HashMap, sync::Arc};

use axum::{
    Extension, Json,
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;
use url::Url;

use crate::{
    config,
    error::RadioError,
    info,
    spotify::{SpotifyApi, auth::exchange_code_with_secret},
    types::{LikedSongs, RelayPlayRequest},
    utils, warning,
};

/// Everything the relay needs to talk to Spotify on behalf of a browser.
#[derive(Debug, Clone)]
pub struct RelayState {
    pub api: SpotifyApi,
    pub auth_url: String,
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub frontend_uri: String,
}

impl RelayState {
    pub fn from_config() -> Result<Self, RadioError> {
        Ok(Self {
            api: SpotifyApi::from_config(),
            auth_url: config::spotify_apiauth_url(),
            token_url: config::spotify_apitoken_url(),
            client_id: config::spotify_client_id()?,
            client_secret: config::spotify_client_secret()?,
            redirect_uri: config::spotify_redirect_uri(),
            scope: config::spotify_scope(),
            frontend_uri: config::frontend_uri(),
        })
    }
}

fn error_json(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Sends the browser to Spotify's consent page.
pub async fn login(Extension(state): Extension<Arc<RelayState>>) -> Response {
    match utils::build_authorize_url(
        &state.auth_url,
        &state.client_id,
        &state.redirect_uri,
        &state.scope,
        None,
    ) {
        Ok(url) => Redirect::to(url.as_str()).into_response(),
        Err(e) => {
            warning!("Cannot build authorization URL: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Authentication failed").into_response()
        }
    }
}

/// Exchanges the authorization code and hands the access token to the frontend.
pub async fn relay_callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<Arc<RelayState>>,
) -> Response {
    let Some(code) = params.get("code") else {
        return (StatusCode::BAD_REQUEST, "Missing authorization code").into_response();
    };

    let token = match exchange_code_with_secret(
        &state.token_url,
        code,
        &state.client_id,
        &state.client_secret,
        &state.redirect_uri,
    )
    .await
    {
        Ok(token) => token,
        Err(e) => {
            warning!("Error getting token: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Authentication failed").into_response();
        }
    };

    let target = format!("{}/", state.frontend_uri.trim_end_matches('/'));
    match Url::parse_with_params(&target, &[("access_token", token.access_token.as_str())]) {
        Ok(url) => Redirect::to(url.as_str()).into_response(),
        Err(e) => {
            warning!("Invalid FRONTEND_URI {}: {}", state.frontend_uri, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Authentication failed").into_response()
        }
    }
}

pub async fn liked_songs(
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<Arc<RelayState>>,
) -> Response {
    let Some(token) = params.get("access_token").filter(|t| !t.is_empty()) else {
        return error_json(StatusCode::BAD_REQUEST, "Missing access_token");
    };

    match state.api.liked_songs(token).await {
        Ok(items) => {
            let total = items.len() as u64;
            Json(LikedSongs { items, total }).into_response()
        }
        Err(e) => {
            warning!("Error fetching liked songs: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch liked songs",
            )
                .into_response()
        }
    }
}

/// Plays a track at an offset on the caller's active device.
///
/// Checks for an available device first and answers `409 no_device` when
/// there is none, without sending the play command.
pub async fn play(
    Extension(state): Extension<Arc<RelayState>>,
    Json(request): Json<RelayPlayRequest>,
) -> Response {
    if request.token.is_empty() || request.track_uri.is_empty() {
        return error_json(StatusCode::BAD_REQUEST, "Missing token or trackUri");
    }

    match state.api.devices(&request.token).await {
        Ok(devices) if devices.is_empty() => {
            return error_json(StatusCode::CONFLICT, "no_device");
        }
        Ok(_) => {}
        Err(e) => {
            warning!("Error checking devices: {}", e);
            return error_json(StatusCode::BAD_GATEWAY, &e.to_string());
        }
    }

    info!(
        "Now playing {} at position {} ms",
        request.track_uri,
        request.offset_seconds * 1000
    );

    match state
        .api
        .play(&request.token, &request.track_uri, request.offset_seconds)
        .await
    {
        Ok(()) => (StatusCode::OK, "Playing song").into_response(),
        Err(e) => {
            warning!("Error playing song: {}", e);
            error_json(StatusCode::BAD_GATEWAY, &e.to_string())
        }
    }
}

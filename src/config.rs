//! Configuration management for Liked Songs Radio.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. It provides a centralized way to manage application
//! configuration including Spotify API credentials, server settings, and the
//! radio simulation parameters.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory, then in the working directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf, time::Duration};

use crate::error::RadioError;

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:3001";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:3001/callback";
pub const DEFAULT_FRONTEND_URI: &str = "http://localhost:5173";
pub const DEFAULT_SCOPE: &str =
    "user-library-read user-modify-playback-state user-read-playback-state streaming";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_GROUP_SIZE: usize = 10;
pub const DEFAULT_TICK_MILLIS: u64 = 1000;

/// Loads environment variables from a `.env` file.
///
/// Looks in the platform-specific local data directory under
/// `likedradio/.env` first and falls back to a `.env` file in the working
/// directory. A missing file is not an error; variables already present in
/// the process environment are never overridden.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/likedradio/.env`
/// - macOS: `~/Library/Application Support/likedradio/.env`
/// - Windows: `%LOCALAPPDATA%/likedradio/.env`
///
/// # Errors
///
/// This function will return an error if:
/// - The parent directory cannot be created
/// - An existing `.env` file cannot be read or parsed
///
/// # Example
///
/// ```
/// use likedradio::config;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = config::load_env().await {
///         eprintln!("Configuration error: {}", e);
///     }
/// }
/// ```
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("likedradio/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    } else if let Err(e) = dotenv::dotenv() {
        if !e.not_found() {
            return Err(e.to_string());
        }
    }
    Ok(())
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn required(key: &'static str) -> Result<String, RadioError> {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(RadioError::MissingConfig(key))
}

/// Returns the address for the local HTTP server.
///
/// Retrieves the `SERVER_ADDRESS` environment variable which specifies the
/// address and port the login callback server and the relay bind to.
/// Defaults to `127.0.0.1:3001`.
///
/// # Example
///
/// ```
/// let addr = server_addr(); // e.g., "127.0.0.1:3001"
/// ```
pub fn server_addr() -> String {
    var_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS)
}

/// Returns the Spotify API client ID for authentication.
///
/// Retrieves the `SPOTIFY_API_AUTH_CLIENT_ID` environment variable which
/// contains the client ID obtained when registering the application with
/// Spotify's developer platform.
///
/// # Errors
///
/// Returns [`RadioError::MissingConfig`] if the variable is not set.
pub fn spotify_client_id() -> Result<String, RadioError> {
    required("SPOTIFY_API_AUTH_CLIENT_ID")
}

/// Returns the Spotify API client secret for authentication.
///
/// Retrieves the `SPOTIFY_API_AUTH_CLIENT_SECRET` environment variable. Only
/// the relay server needs it, for its server-side code exchange.
///
/// # Errors
///
/// Returns [`RadioError::MissingConfig`] if the variable is not set.
///
/// # Security Note
///
/// The client secret should be kept confidential and never exposed in logs
/// or version control.
pub fn spotify_client_secret() -> Result<String, RadioError> {
    required("SPOTIFY_API_AUTH_CLIENT_SECRET")
}

/// Returns the Spotify OAuth redirect URI.
///
/// Retrieves the `SPOTIFY_API_REDIRECT_URI` environment variable which specifies
/// the callback URL that Spotify should redirect to after user authorization.
/// This must match the redirect URI registered in the Spotify application settings.
///
/// Defaults to `http://127.0.0.1:3001/callback`.
///
/// # Example
///
/// ```
/// let redirect_uri = spotify_redirect_uri(); // e.g., "http://127.0.0.1:3001/callback"
/// ```
pub fn spotify_redirect_uri() -> String {
    var_or("SPOTIFY_API_REDIRECT_URI", DEFAULT_REDIRECT_URI)
}

/// Returns the Spotify API scope permissions.
///
/// Retrieves the `SPOTIFY_API_AUTH_SCOPE` environment variable which defines
/// the scope of permissions requested during OAuth authentication. The scope
/// determines what API operations the application can perform on behalf of the user.
///
/// Defaults to the scopes needed to read the library and control playback.
///
/// # Example
///
/// ```
/// let scope = spotify_scope(); // e.g., "user-library-read user-modify-playback-state"
/// ```
pub fn spotify_scope() -> String {
    var_or("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SCOPE)
}

/// Returns the Spotify OAuth authorization URL.
///
/// Retrieves the `SPOTIFY_API_AUTH_URL` environment variable which contains
/// the base URL for Spotify's OAuth authorization endpoint. This is where
/// users are redirected to grant permissions to the application.
///
/// Defaults to Spotify's public authorization endpoint.
///
/// # Example
///
/// ```
/// let auth_url = spotify_apiauth_url(); // e.g., "https://accounts.spotify.com/authorize"
/// ```
pub fn spotify_apiauth_url() -> String {
    var_or("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL)
}

/// Returns the Spotify Web API base URL.
///
/// Retrieves the `SPOTIFY_API_URL` environment variable which contains the
/// base URL for Spotify's Web API endpoints. This is used for all API
/// operations after authentication.
///
/// Defaults to `https://api.spotify.com/v1`.
///
/// # Example
///
/// ```
/// let api_url = spotify_apiurl(); // e.g., "https://api.spotify.com/v1"
/// ```
pub fn spotify_apiurl() -> String {
    var_or("SPOTIFY_API_URL", DEFAULT_API_URL)
}

/// Returns the Spotify OAuth token exchange URL.
///
/// Retrieves the `SPOTIFY_API_TOKEN_URL` environment variable which contains
/// the URL for exchanging authorization codes for access tokens during the
/// OAuth flow. This is used in the final step of authentication.
///
/// Defaults to Spotify's public token endpoint.
///
/// # Example
///
/// ```
/// let token_url = spotify_apitoken_url(); // e.g., "https://accounts.spotify.com/api/token"
/// ```
pub fn spotify_apitoken_url() -> String {
    var_or("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL)
}

/// Returns the frontend URL the relay redirects to after login.
///
/// Retrieves the `FRONTEND_URI` environment variable. The access token is
/// appended as the `access_token` query parameter.
pub fn frontend_uri() -> String {
    var_or("FRONTEND_URI", DEFAULT_FRONTEND_URI)
}

/// Returns how many liked songs make up one radio.
///
/// Reads `RADIO_GROUP_SIZE`; unparsable or zero values fall back to 10.
pub fn radio_group_size() -> usize {
    env::var("RADIO_GROUP_SIZE")
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|size| *size > 0)
        .unwrap_or(DEFAULT_GROUP_SIZE)
}

/// Returns the length of one simulated second.
///
/// Reads `RADIO_TICK_MILLIS` (default 1000). Shorter ticks fast-forward all
/// radios, which is handy for trying things out.
pub fn radio_tick_period() -> Duration {
    let millis = env::var("RADIO_TICK_MILLIS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|ms| *ms > 0)
        .unwrap_or(DEFAULT_TICK_MILLIS);
    Duration::from_millis(millis)
}

/// Returns the relay server that play commands should go through, if any.
///
/// Reads `RADIO_RELAY_URL`. Without it the radio talks to the Spotify API
/// directly.
pub fn radio_relay_url() -> Option<String> {
    env::var("RADIO_RELAY_URL")
        .ok()
        .filter(|v| !v.trim().is_empty())
}

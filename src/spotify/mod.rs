//! # Spotify Integration Module
//!
//! This module provides the interface to the Spotify Web API used by the
//! radio: authentication, the liked-songs library, the user profile and the
//! player endpoints that the playback gateway drives.
//!
//! ## Architecture
//!
//! ```text
//! Application Layer (CLI, Radio, Relay)
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (OAuth 2.0 PKCE)
//!     ├── Library (Liked Songs)
//!     ├── User (Profile)
//!     └── Player (Devices, Play at Offset)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Core Modules
//!
//! - [`auth`] - Authorization code flow with PKCE for the interactive session
//! - [`library`] - Paginated retrieval of the user's saved tracks
//! - [`player`] - Available devices and the play command
//! - [`user`] - Current user profile
//!
//! All endpoint methods live on [`SpotifyApi`], which carries the HTTP client
//! and the API base URL so the same code can be pointed at a test server.
//!
//! ## Error Handling
//!
//! - **Bad Gateway**: 502 responses are retried after a short delay, a
//!   bounded number of times
//! - **Rate Limits**: 429 responses honour the `Retry-After` header up to
//!   two minutes
//! - Every other non-success status is returned as a `reqwest::Error`

pub mod auth;
pub mod library;
pub mod player;
pub mod user;

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tokio::time::sleep;

use crate::{config, warning};

const MAX_ATTEMPTS: u32 = 3;
const BAD_GATEWAY_DELAY: Duration = Duration::from_secs(10);
const MAX_RETRY_AFTER_SECS: u64 = 120;

/// Thin typed client for the Spotify Web API.
#[derive(Debug, Clone)]
pub struct SpotifyApi {
    client: Client,
    base_url: String,
}

impl SpotifyApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Client for the API URL from the configuration.
    pub fn from_config() -> Self {
        Self::new(config::spotify_apiurl())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends a request built by `build`, retrying on 502 and 429.
    async fn send<F>(&self, build: F) -> Result<Response, reqwest::Error>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let mut attempt = 1;

        loop {
            let response = build(&self.client).send().await?;
            let status = response.status();

            if attempt < MAX_ATTEMPTS {
                if status == StatusCode::BAD_GATEWAY {
                    attempt += 1;
                    sleep(BAD_GATEWAY_DELAY).await;
                    continue; // retry
                }

                if status == StatusCode::TOO_MANY_REQUESTS {
                    let retry_after = response
                        .headers()
                        .get("retry-after")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|v| v.parse::<u64>().ok())
                        .unwrap_or(1);

                    if retry_after <= MAX_RETRY_AFTER_SECS {
                        attempt += 1;
                        sleep(Duration::from_secs(retry_after)).await;
                        continue; // retry
                    }

                    warning!(
                        "Spotify asks to retry after {} seconds, giving up.",
                        retry_after
                    );
                }
            }

            return response.error_for_status(); // propagate other errors
        }
    }
}

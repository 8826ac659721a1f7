use std::{future::Future, sync::Arc};

use reqwest::{Client, StatusCode};
use serde_json::Value;
use tokio::{sync::mpsc::UnboundedReceiver, task::JoinHandle};

use crate::{
    error::GatewayError,
    info,
    spotify::SpotifyApi,
    types::{PlaybackRequest, RelayPlayRequest},
    warning,
};

/// Delivers "play track X at offset T" to the listener's device.
pub trait PlaybackGateway: Send + Sync + 'static {
    fn play(
        &self,
        request: PlaybackRequest,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;
}

/// Talks to the Spotify Web API directly.
pub struct SpotifyGateway {
    api: SpotifyApi,
}

impl SpotifyGateway {
    pub fn new(api: SpotifyApi) -> Self {
        Self { api }
    }
}

impl PlaybackGateway for SpotifyGateway {
    async fn play(&self, request: PlaybackRequest) -> Result<(), GatewayError> {
        let devices = self.api.devices(&request.token).await?;
        if devices.is_empty() {
            return Err(GatewayError::NoDevice);
        }

        self.api
            .play(&request.token, &request.track_uri, request.offset_secs)
            .await?;
        Ok(())
    }
}

/// Forwards play commands to a relay server's `PUT /play`.
pub struct RelayGateway {
    client: Client,
    base_url: String,
}

impl RelayGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl PlaybackGateway for RelayGateway {
    async fn play(&self, request: PlaybackRequest) -> Result<(), GatewayError> {
        let body = RelayPlayRequest {
            token: request.token,
            track_uri: request.track_uri,
            offset_seconds: request.offset_secs,
        };

        let response = self
            .client
            .put(format!("{}/play", self.base_url))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        if status == StatusCode::CONFLICT {
            return Err(GatewayError::NoDevice);
        }

        let message = match response.json::<Value>().await {
            Ok(json) => json["error"].as_str().unwrap_or_default().to_string(),
            Err(_) => String::new(),
        };
        Err(GatewayError::Relay {
            status: status.as_u16(),
            message,
        })
    }
}

/// The gateway picked at startup.
pub enum Gateway {
    Direct(SpotifyGateway),
    Relay(RelayGateway),
}

impl PlaybackGateway for Gateway {
    async fn play(&self, request: PlaybackRequest) -> Result<(), GatewayError> {
        match self {
            Gateway::Direct(gateway) => gateway.play(request).await,
            Gateway::Relay(gateway) => gateway.play(request).await,
        }
    }
}

/// Drains playback requests and sends each one through `gateway`.
///
/// Requests are delivered one at a time. Whatever queued up while a command
/// was in flight collapses to the newest request, so the device always ends
/// up on the latest intent. Failures are reported to the user, never
/// retried, and never reach the players.
pub fn spawn_dispatcher<G: PlaybackGateway>(
    gateway: Arc<G>,
    mut requests: UnboundedReceiver<PlaybackRequest>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(mut request) = requests.recv().await {
            while let Ok(newer) = requests.try_recv() {
                request = newer;
            }

            let uri = request.track_uri.clone();
            let offset = request.offset_secs;
            match gateway.play(request).await {
                Ok(()) => info!("Now playing {} at {}s", uri, offset),
                Err(GatewayError::NoDevice) => {
                    warning!("No available Spotify devices found.")
                }
                Err(e) => warning!("Failed to play {}: {}", uri, e),
            }
        }
    })
}

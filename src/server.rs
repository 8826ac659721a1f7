use axum::{
    Extension, Router,
    routing::{get, put},
};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::sync::Mutex;

use crate::{
    Res,
    api::{self, RelayState},
    config, info,
    types::PkceToken,
};

/// Router of the short-lived login callback server.
pub fn callback_router(state: Arc<Mutex<Option<PkceToken>>>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback).layer(Extension(state)))
}

/// Router of the playback relay.
pub fn relay_router(state: Arc<RelayState>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/login", get(api::login))
        .route("/callback", get(api::relay_callback))
        .route("/liked-songs", get(api::liked_songs))
        .route("/play", put(api::play))
        .layer(Extension(state))
}

pub async fn start_callback_server(state: Arc<Mutex<Option<PkceToken>>>) -> Res<()> {
    serve(callback_router(state)).await
}

pub async fn start_relay_server(state: Arc<RelayState>) -> Res<()> {
    serve(relay_router(state)).await
}

async fn serve(app: Router) -> Res<()> {
    let addr = SocketAddr::from_str(&config::server_addr())
        .map_err(|e| format!("Failed to parse server address: {}", e))?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

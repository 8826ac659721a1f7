use std::{sync::Arc, time::Duration};

use reqwest::Client;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::{
    Res, config, info,
    server::start_callback_server,
    types::{PkceToken, Token},
    utils, warning,
};

/// Runs the OAuth 2.0 authorization code flow with PKCE against Spotify.
///
/// This function orchestrates the entire authentication process including:
/// 1. Generating PKCE code verifier and challenge
/// 2. Starting a local callback server
/// 3. Opening the authorization URL in the user's browser
/// 4. Waiting for the OAuth callback
///
/// The token is only handed back to the caller. Nothing is written to disk;
/// a new session means a new login.
///
/// # Arguments
///
/// * `shared_state` - Thread-safe shared state for storing PKCE information
///   and the resulting token between the auth flow and callback handler
///
/// # Returns
///
/// - `Ok(Token)` - The user authorized the application within 60 seconds
/// - `Err(_)` - Missing configuration, or the login failed or timed out
///
/// # Error Handling
///
/// - Browser launch failures result in a warning with manual URL instructions
/// - A missing client ID is returned as an error before anything starts
pub async fn login(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Res<Token> {
    let client_id = config::spotify_client_id()?;

    // generate PKCE verifier and challenge
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);

    // Construct the authorization URL
    let auth_url = utils::build_authorize_url(
        &config::spotify_apiauth_url(),
        &client_id,
        &config::spotify_redirect_uri(),
        &config::spotify_scope(),
        Some(&code_challenge),
    )?;

    // Store verifier in shared state before redirect
    {
        let mut lock = shared_state.lock().await;
        *lock = Some(PkceToken {
            code_verifier,
            token: None,
        });
    }

    // start API server
    let server_state = Arc::clone(&shared_state);
    let server = tokio::spawn(async move {
        if let Err(e) = start_callback_server(server_state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    // Open the authorization URL in the default browser
    info!("Waiting for Spotify authorization...");
    if webbrowser::open(auth_url.as_str()).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    // wait for callback to be hit
    let token = wait_for_token(shared_state).await;
    server.abort();

    token.ok_or_else(|| "Authentication failed or timed out.".into())
}

/// Waits for the OAuth callback to complete and return a token.
///
/// Polls the shared state once per second for at most 60 seconds.
async fn wait_for_token(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Option<Token> {
    use std::time::Instant;

    let max_wait = Duration::from_secs(60);
    let start = Instant::now();

    while start.elapsed() < max_wait {
        let lock = shared_state.lock().await;
        if let Some(pkce_token) = lock.as_ref() {
            if let Some(token) = &pkce_token.token {
                return Some(token.clone());
            }
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

/// Exchanges an authorization code for an access token using PKCE.
///
/// Completes the flow started by [`login`]. The verifier must be the one
/// whose challenge was sent with the authorization request.
///
/// # Errors
///
/// - Invalid or expired authorization code
/// - Code verifier doesn't match the challenge
/// - Network connectivity issues or Spotify API service errors
pub async fn exchange_code_pkce(code: &str, verifier: &str) -> Res<Token> {
    let client_id = config::spotify_client_id()?;
    let redirect_uri = config::spotify_redirect_uri();

    let client = Client::new();
    let res = client
        .post(config::spotify_apitoken_url())
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", client_id.as_str()),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", redirect_uri.as_str()),
        ])
        .send()
        .await?
        .error_for_status()?;

    let json: Value = res.json().await?;
    token_from_json(&json)
}

/// Exchanges an authorization code using the client secret.
///
/// This is the server-side variant used by the relay, which keeps the
/// secret and hands only the access token to the browser.
pub async fn exchange_code_with_secret(
    token_url: &str,
    code: &str,
    client_id: &str,
    client_secret: &str,
    redirect_uri: &str,
) -> Res<Token> {
    let client = Client::new();
    let res = client
        .post(token_url)
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("client_id", client_id),
            ("client_secret", client_secret),
        ])
        .send()
        .await?
        .error_for_status()?;

    let json: Value = res.json().await?;
    token_from_json(&json)
}

fn token_from_json(json: &Value) -> Res<Token> {
    let access_token = json["access_token"]
        .as_str()
        .ok_or("token response has no access_token")?;

    Ok(Token {
        access_token: access_token.to_string(),
        expires_in: json["expires_in"].as_u64().unwrap_or(3600),
    })
}

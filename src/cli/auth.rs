use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{error, info, spotify, success, types::PkceToken};

/// Logs in and prints the access token.
///
/// The token is not stored anywhere; pass it to `likedradio radio --token`
/// or to a relay frontend to skip the browser round trip.
pub async fn auth(shared_state: Arc<Mutex<Option<PkceToken>>>) {
    match spotify::auth::login(shared_state).await {
        Ok(token) => {
            success!("Authentication successful!");
            info!("Access token (valid for {}s):", token.expires_in);
            println!("{}", token.access_token);
        }
        Err(e) => error!("{}", e),
    }
}

use std::sync::Arc;

use crate::{api::RelayState, error, server::start_relay_server};

pub async fn serve() {
    let state = match RelayState::from_config() {
        Ok(state) => state,
        Err(e) => error!("Cannot start relay. Err: {}", e),
    };

    if let Err(e) = start_relay_server(Arc::new(state)).await {
        error!("Relay server failed. Err: {}", e);
    }
}

use thiserror::Error;

/// Errors raised by the radio engine and its configuration.
#[derive(Debug, Error)]
pub enum RadioError {
    /// `select_player` was called with an index that names no player.
    #[error("radio {index} is out of range ({players} radios available)")]
    SelectionOutOfRange { index: usize, players: usize },

    #[error("group size must be at least 1, got {0}")]
    InvalidGroupSize(usize),

    #[error("{0} must be set")]
    MissingConfig(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures of a single remote play command.
///
/// None of these ever reach the tick/advance state machine; the dispatcher
/// reports them to the user and drops the request.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("No available Spotify devices found.")]
    NoDevice,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("relay rejected the request: {status} - {message}")]
    Relay { status: u16, message: String },
}

//! # API Module
//!
//! This module provides the HTTP handlers of Liked Songs Radio's two small
//! web servers: the login callback used by the interactive session, and the
//! playback relay that browser frontends talk to.
//!
//! ## Endpoints
//!
//! ### Session Login
//!
//! - [`callback`] - Completes the OAuth 2.0 PKCE flow started by
//!   `likedradio auth` / `likedradio radio` and stores the token in shared state.
//!
//! ### Relay
//!
//! - [`login`] - Redirects to Spotify's authorization page.
//! - [`relay_callback`] - Exchanges the code with the client secret and
//!   redirects to the frontend with `?access_token=`.
//! - [`liked_songs`] - Returns the complete liked-songs library for a token.
//! - [`play`] - Checks for an available device, then plays a track at an
//!   offset. Answers `409` with `{"error": "no_device"}` when no device is
//!   available.
//!
//! ### Monitoring
//!
//! - [`health`] - Returns application status and version information.
//!
//! ## Security Considerations
//!
//! - The client secret never leaves the relay; browsers only see access tokens
//! - The session login uses PKCE and needs no secret at all
//! - Upstream failures are logged and answered with generic messages

mod callback;
mod health;
mod relay;

pub use callback::callback;
pub use health::health;
pub use relay::RelayState;
pub use relay::liked_songs;
pub use relay::login;
pub use relay::play;
pub use relay::relay_callback;

//! # CLI Module
//!
//! This module provides the command-line interface layer for Liked Songs
//! Radio. It implements all user-facing commands and wires the Spotify
//! client, the radio engine and the servers together.
//!
//! ## Commands
//!
//! - [`auth`] - Runs the Spotify login (OAuth 2.0 PKCE) and prints the access token
//! - [`radio`] - Interactive session: every radio plays in the background,
//!   the one you tune in to plays on your Spotify device
//! - [`serve`] - Runs the playback relay for browser frontends
//!
//! ## Session Flow
//!
//! ```text
//! login (or --token)
//!     ↓
//! fetch liked songs
//!     ↓
//! shuffle + split into radios, start all
//!     ↓
//! event loop: ticks ⟷ listener commands (select, pause, status, shuffle)
//! ```
//!
//! ## Usage Patterns
//!
//! ```bash
//! likedradio radio                       # log in and start listening
//! likedradio radio --group-size 5        # smaller radios
//! likedradio radio --relay http://127.0.0.1:3001
//! likedradio serve                       # run the relay
//! ```
//!
//! ## Error Handling
//!
//! Fatal setup problems (login, loading the library) end the program with an
//! error message. Everything that happens once the radios are running,
//! including failed play commands, is reported as a warning and the session
//! goes on.

mod auth;
mod radio;
mod serve;

pub use auth::auth;
pub use radio::RadioCommand;
pub use radio::RadioOptions;
pub use radio::radio;
pub use serve::serve;

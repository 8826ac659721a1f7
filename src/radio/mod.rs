//! # Radio Module
//!
//! Simulated playback of many "radios" at once, and the coordination that
//! lets exactly one of them drive the listener's real Spotify device.
//!
//! ## Overview
//!
//! The liked-songs library is shuffled and cut into fixed-size groups. Each
//! group is played by a [`SongPlayer`], which counts simulated seconds and
//! moves on to the next track when the current one is over. Nothing is
//! decoded or played locally; a player is just a timeline.
//!
//! The [`SongHandler`] owns all players and tracks which one is selected.
//! The selected player additionally issues remote play commands: once when
//! it is selected (at its current simulated offset) and whenever it advances
//! to a new track (at offset 0).
//!
//! ## Data Flow
//!
//! ```text
//! Ticker (one timer task per running player)
//!     ↓ Tick { generation, player }
//! SongHandler::dispatch → SongPlayer::tick → advance
//!     ↓ (selected player only)
//! RemoteControl::request_playback
//!     ↓ PlaybackRequest
//! gateway dispatcher → Spotify API or relay server
//! ```
//!
//! ## Design Notes
//!
//! - Players receive a narrow [`PlayerContext`] capability instead of a
//!   reference to the handler.
//! - The transition functions (`start`, `tick`, `advance`) are plain
//!   synchronous methods; time only enters through the [`Ticker`], so the
//!   state machine can be driven by hand in tests.
//! - Replacing the player set bumps the ticker generation; ticks of an older
//!   generation are dropped on dispatch and their timers are aborted.
//! - Remote failures are reported by the dispatcher and never reach the
//!   players.

mod control;
mod gateway;
mod handler;
mod player;
mod ticker;

pub use control::PlayerContext;
pub use control::RemoteControl;
pub use gateway::Gateway;
pub use gateway::PlaybackGateway;
pub use gateway::RelayGateway;
pub use gateway::SpotifyGateway;
pub use gateway::spawn_dispatcher;
pub use handler::SongHandler;
pub use player::PlayerEvent;
pub use player::PlayerState;
pub use player::SongPlayer;
pub use ticker::Tick;
pub use ticker::Ticker;

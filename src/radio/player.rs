use std::sync::Arc;

use crate::types::Track;

use super::PlayerContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    Running,
    Terminal,
}

/// What a single transition of a [`SongPlayer`] produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    /// The player left `Idle` and wants ticks.
    Started,
    /// One simulated second passed within the current track.
    TimeUpdate { elapsed_secs: u64 },
    /// The next track of the group is now current, at elapsed 0.
    Advanced { position: usize },
    /// The group is exhausted; no more ticks must be delivered.
    Finished,
}

/// Simulated playback of one radio (a fixed group of liked songs).
pub struct SongPlayer {
    index: usize,
    tracks: Vec<Track>,
    position: usize,
    elapsed_secs: u64,
    state: PlayerState,
    context: Arc<dyn PlayerContext>,
}

impl SongPlayer {
    pub fn new(index: usize, tracks: Vec<Track>, context: Arc<dyn PlayerContext>) -> Self {
        Self {
            index,
            tracks,
            position: 0,
            elapsed_secs: 0,
            state: PlayerState::Idle,
            context,
        }
    }

    /// Moves an idle, non-empty player to `Running`.
    ///
    /// Returns `None` for an empty group (not an error) and for a player that
    /// was already started.
    pub fn start(&mut self) -> Option<PlayerEvent> {
        if self.tracks.is_empty() || self.state != PlayerState::Idle {
            return None;
        }

        self.state = PlayerState::Running;
        Some(PlayerEvent::Started)
    }

    /// Applies one simulated second.
    ///
    /// Exactly one of time-update or advance happens per tick. Ticks reaching
    /// a player that is not running are ignored.
    pub fn tick(&mut self) -> Option<PlayerEvent> {
        if self.state != PlayerState::Running {
            return None;
        }

        let duration = self.current_track()?.duration_secs;
        self.elapsed_secs += 1;

        if self.elapsed_secs >= duration {
            self.advance()
        } else {
            Some(PlayerEvent::TimeUpdate {
                elapsed_secs: self.elapsed_secs,
            })
        }
    }

    /// Moves on to the next track of the group.
    ///
    /// While this player is selected the new track is played remotely from
    /// offset 0. Running past the last track makes the player terminal.
    pub fn advance(&mut self) -> Option<PlayerEvent> {
        if self.state != PlayerState::Running {
            return None;
        }

        self.position += 1;
        self.elapsed_secs = 0;

        let Some(track) = self.tracks.get(self.position) else {
            self.state = PlayerState::Terminal;
            return Some(PlayerEvent::Finished);
        };

        if self.context.is_selected(self.index) {
            self.context.request_playback(&track.uri, 0);
        }

        Some(PlayerEvent::Advanced {
            position: self.position,
        })
    }

    /// Plays the current track remotely at the simulated offset.
    ///
    /// Returns `false` when there is nothing to play (terminal player).
    pub fn play_from_current_time(&self) -> bool {
        match self.current_track() {
            Some(track) => {
                self.context
                    .request_playback(&track.uri, self.elapsed_secs);
                true
            }
            None => false,
        }
    }

    pub fn current_track(&self) -> Option<&Track> {
        if self.state == PlayerState::Terminal {
            return None;
        }
        self.tracks.get(self.position)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlayerState::Running
    }

    pub fn is_terminal(&self) -> bool {
        self.state == PlayerState::Terminal
    }
}

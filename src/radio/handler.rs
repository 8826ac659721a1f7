use std::{sync::Arc, time::Duration};

use rand::{Rng, seq::SliceRandom};
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    error::RadioError,
    types::{PlaybackRequest, Session, Track},
    utils,
};

use super::{PlayerContext, PlayerEvent, RemoteControl, SongPlayer, Tick, Ticker};

/// Owns every radio of a session and decides which one is heard.
///
/// All players simulate concurrently. Only the selected one (if any) turns
/// its track changes into remote play commands, and those commands all leave
/// through [`SongHandler::request_playback`].
pub struct SongHandler {
    tracks: Vec<Track>,
    players: Vec<SongPlayer>,
    control: Arc<RemoteControl>,
    ticker: Ticker,
}

impl SongHandler {
    pub fn new(
        session: Session,
        tracks: Vec<Track>,
        requests: UnboundedSender<PlaybackRequest>,
        tick_period: Duration,
    ) -> Self {
        Self {
            tracks,
            players: Vec::new(),
            control: Arc::new(RemoteControl::new(session, requests)),
            ticker: Ticker::new(tick_period),
        }
    }

    /// Shuffles the liked songs and splits them into radios of `group_size`.
    ///
    /// Any previous radios are stopped first and the selection is cleared.
    /// Returns the number of radios created.
    pub fn create_song_players(&mut self, group_size: usize) -> Result<usize, RadioError> {
        self.create_song_players_with_rng(group_size, &mut rand::rng())
    }

    pub fn create_song_players_with_rng<R: Rng + ?Sized>(
        &mut self,
        group_size: usize,
        rng: &mut R,
    ) -> Result<usize, RadioError> {
        if group_size == 0 {
            return Err(RadioError::InvalidGroupSize(group_size));
        }

        self.ticker.reset();
        self.control.select(None);

        let mut shuffled = self.tracks.clone();
        shuffled.shuffle(rng);

        let context: Arc<dyn PlayerContext> = self.control.clone();
        self.players = utils::partition(shuffled, group_size)
            .into_iter()
            .enumerate()
            .map(|(index, group)| SongPlayer::new(index, group, Arc::clone(&context)))
            .collect();

        Ok(self.players.len())
    }

    /// Starts every radio, selected or not.
    pub fn start_all_song_players(&mut self) {
        for player in self.players.iter_mut() {
            if player.start().is_some() {
                self.ticker.schedule(player.index());
            }
        }
    }

    /// Tunes in to radio `index` and plays its current track from the
    /// simulated offset.
    pub fn select_player(&mut self, index: usize) -> Result<(), RadioError> {
        let Some(player) = self.players.get(index) else {
            return Err(RadioError::SelectionOutOfRange {
                index,
                players: self.players.len(),
            });
        };

        self.control.select(Some(index));
        player.play_from_current_time();
        Ok(())
    }

    /// Stops issuing remote commands. Every radio keeps simulating.
    pub fn pause_playback(&mut self) {
        self.control.select(None);
    }

    /// Queues a remote play command with the session token.
    ///
    /// Players reach the same outbox through their [`PlayerContext`], so
    /// [`RemoteControl::request_playback`] is the single point every remote
    /// command passes. Rate limiting or single-flight belongs there.
    pub fn request_playback(&self, track_uri: &str, offset_secs: u64) {
        self.control.request_playback(track_uri, offset_secs);
    }

    /// Applies one tick to the player with `player_index`.
    pub fn on_tick(&mut self, player_index: usize) -> Option<PlayerEvent> {
        let player = self
            .players
            .iter_mut()
            .find(|p| p.index() == player_index)?;

        let event = player.tick();
        if event == Some(PlayerEvent::Finished) {
            self.ticker.cancel(player_index);
        }
        event
    }

    /// Routes a tick from the tick source, dropping ticks of replaced radios.
    pub fn dispatch(&mut self, tick: Tick) -> Option<PlayerEvent> {
        if tick.generation != self.ticker.generation() {
            return None;
        }
        self.on_tick(tick.player)
    }

    pub async fn next_tick(&mut self) -> Option<Tick> {
        self.ticker.recv().await
    }

    /// Cancels all outstanding tick schedules.
    pub fn stop(&mut self) {
        self.ticker.reset();
    }

    pub fn players(&self) -> &[SongPlayer] {
        &self.players
    }

    pub fn player(&self, index: usize) -> Option<&SongPlayer> {
        self.players.get(index)
    }

    pub fn selected(&self) -> Option<usize> {
        self.control.selected()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn session(&self) -> &Session {
        self.control.session()
    }

    pub fn generation(&self) -> u64 {
        self.ticker.generation()
    }

    pub fn active_timers(&self) -> usize {
        self.ticker.active()
    }
}

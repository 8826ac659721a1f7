use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::mpsc::UnboundedSender;

use crate::{
    types::{PlaybackRequest, Session},
    warning,
};

const NO_SELECTION: usize = usize::MAX;

/// What a [`SongPlayer`](super::SongPlayer) may ask of its owner.
///
/// Players never see each other or the handler itself; they only learn
/// whether they are the selected radio and hand play commands over to the
/// single choke point.
pub trait PlayerContext: Send + Sync {
    fn is_selected(&self, player_index: usize) -> bool;

    fn request_playback(&self, track_uri: &str, offset_secs: u64);
}

/// Selection state and the outbound side of the playback gateway.
///
/// The selected index is only written by the handler (UI events), and read
/// by every player when a tick is processed.
pub struct RemoteControl {
    session: Session,
    selected: AtomicUsize,
    requests: UnboundedSender<PlaybackRequest>,
}

impl RemoteControl {
    pub fn new(session: Session, requests: UnboundedSender<PlaybackRequest>) -> Self {
        Self {
            session,
            selected: AtomicUsize::new(NO_SELECTION),
            requests,
        }
    }

    pub fn select(&self, player_index: Option<usize>) {
        self.selected
            .store(player_index.unwrap_or(NO_SELECTION), Ordering::SeqCst);
    }

    pub fn selected(&self) -> Option<usize> {
        match self.selected.load(Ordering::SeqCst) {
            NO_SELECTION => None,
            index => Some(index),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

impl PlayerContext for RemoteControl {
    fn is_selected(&self, player_index: usize) -> bool {
        self.selected() == Some(player_index)
    }

    /// Every remote command of a session passes through here, whether it
    /// comes from a player or from the handler.
    fn request_playback(&self, track_uri: &str, offset_secs: u64) {
        let request = PlaybackRequest {
            token: self.session.access_token.clone(),
            track_uri: track_uri.to_string(),
            offset_secs,
        };

        if self.requests.send(request).is_err() {
            warning!("Playback gateway is gone, cannot play {}", track_uri);
        }
    }
}

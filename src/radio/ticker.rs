use std::{collections::HashMap, time::Duration};

use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};

/// One simulated second for one player of one generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub generation: u64,
    pub player: usize,
}

/// Background tick source.
///
/// Each scheduled player gets its own timer task; all of them report through
/// a single channel, tagged with the player index and the generation of the
/// player set they were scheduled for.
pub struct Ticker {
    period: Duration,
    generation: u64,
    tx: UnboundedSender<Tick>,
    rx: UnboundedReceiver<Tick>,
    timers: HashMap<usize, JoinHandle<()>>,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            period,
            generation: 0,
            tx,
            rx,
            timers: HashMap::new(),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Starts ticking for `player`, replacing any timer it already had.
    ///
    /// The first tick arrives one period after scheduling.
    pub fn schedule(&mut self, player: usize) {
        self.cancel(player);

        let tx = self.tx.clone();
        let period = self.period;
        let generation = self.generation;

        let handle = tokio::spawn(async move {
            let mut timer = interval(period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // the first tick of a tokio interval completes immediately
            timer.tick().await;

            loop {
                timer.tick().await;
                if tx.send(Tick { generation, player }).is_err() {
                    break;
                }
            }
        });

        self.timers.insert(player, handle);
    }

    pub fn cancel(&mut self, player: usize) {
        if let Some(handle) = self.timers.remove(&player) {
            handle.abort();
        }
    }

    /// Stops every timer and starts a new generation.
    ///
    /// Ticks of the old generation that are still queued are recognisable by
    /// their generation tag and must be dropped by the consumer.
    pub fn reset(&mut self) -> u64 {
        for (_, handle) in self.timers.drain() {
            handle.abort();
        }
        self.generation += 1;
        self.generation
    }

    pub fn is_scheduled(&self, player: usize) -> bool {
        self.timers.contains_key(&player)
    }

    pub fn active(&self) -> usize {
        self.timers.len()
    }

    pub async fn recv(&mut self) -> Option<Tick> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<Tick> {
        self.rx.try_recv().ok()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        for (_, handle) in self.timers.drain() {
            handle.abort();
        }
    }
}

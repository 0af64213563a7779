//! Timed play session driving a [`MatchEngine`].

use crate::engine::{Continuation, EngineEvent, MatchEngine, Phase, Selection, Step};
use crate::puzzle::{GroupId, PuzzleData, Tile};
use derive_new::new;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, broadcast};
use tracing::{Instrument, debug, info, info_span, instrument};

const EVENT_CAPACITY: usize = 64;

/// Presentation delays between resolution steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, new)]
pub struct Timing {
    /// Delay before a matched group locks in.
    pub confirm_delay: Duration,
    /// Delay before a mistake is announced, and again before it clears.
    pub mistake_delay: Duration,
}

impl Timing {
    /// Creates timing from millisecond delays.
    pub fn from_millis(confirm_delay_ms: u64, mistake_delay_ms: u64) -> Self {
        Self::new(
            Duration::from_millis(confirm_delay_ms),
            Duration::from_millis(mistake_delay_ms),
        )
    }

    /// No delays; steps run as soon as the driver task is polled.
    pub fn immediate() -> Self {
        Self::from_millis(0, 0)
    }

    /// Delay to wait before running `step`.
    pub fn delay_for(&self, step: Step) -> Duration {
        match step {
            Step::LockInMatch => self.confirm_delay,
            Step::RevealMistake | Step::ClearMistake => self.mistake_delay,
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::from_millis(200, 500)
    }
}

/// A game in play, shared between the presentation layer and timer tasks.
///
/// Selecting the third tile spawns a task that sleeps through each
/// resolution step. The engine stays locked until the last step runs.
/// Resetting bumps the engine generation, so a sleeping task wakes to a
/// stale continuation and does nothing.
#[derive(Debug, Clone)]
pub struct PlaySession {
    engine: Arc<Mutex<MatchEngine>>,
    timing: Timing,
    events: broadcast::Sender<EngineEvent>,
}

impl PlaySession {
    /// Starts a session with a shuffled board.
    pub fn start(puzzle: PuzzleData, timing: Timing) -> Self {
        Self::start_with_rng(puzzle, timing, &mut rand::rng())
    }

    /// Starts a session shuffling with the given randomness source.
    #[instrument(skip(puzzle, rng), fields(theme = %puzzle.theme()))]
    pub fn start_with_rng<R: Rng + ?Sized>(puzzle: PuzzleData, timing: Timing, rng: &mut R) -> Self {
        info!(?timing, "Starting play session");
        Self::from_engine(MatchEngine::with_deal(puzzle, rng), timing)
    }

    /// Wraps an already dealt engine.
    pub fn from_engine(engine: MatchEngine, timing: Timing) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            engine: Arc::new(Mutex::new(engine)),
            timing,
            events,
        }
    }

    /// Subscribes to engine events.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }

    /// Forwards a tile click to the engine.
    ///
    /// Must be called within a tokio runtime: a third selection schedules
    /// its resolution on a spawned task.
    #[instrument(skip(self))]
    pub async fn select_tile(&self, tile_id: &str) -> Selection {
        let selection = self.engine.lock().await.select_tile(tile_id);
        if let Selection::Evaluating(continuation) = &selection {
            self.spawn_resolution(*continuation);
        }
        selection
    }

    /// Clears the board. Pending resolutions are discarded.
    #[instrument(skip(self))]
    pub async fn reset(&self) {
        self.engine.lock().await.reset();
        info!("Play session reset");
    }

    /// Resets and deals a freshly shuffled board of the same puzzle.
    pub async fn redeal(&self) {
        let mut engine = self.engine.lock().await;
        engine.deal(&mut rand::rng());
    }

    /// Resets and deals using the given randomness source.
    #[instrument(skip(self, rng))]
    pub async fn redeal_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) {
        self.engine.lock().await.deal(rng);
    }

    /// Reorders the board, keeping solved groups and the selection.
    pub async fn shuffle(&self) {
        let mut engine = self.engine.lock().await;
        engine.shuffle(&mut rand::rng());
    }

    /// Snapshot of the tiles in board order.
    pub async fn tiles(&self) -> Vec<Tile> {
        self.engine.lock().await.tiles().to_vec()
    }

    /// Snapshot of the solved groups.
    pub async fn solved_groups(&self) -> Vec<GroupId> {
        self.engine.lock().await.solved_groups().to_vec()
    }

    /// Returns true once every group is solved.
    pub async fn is_complete(&self) -> bool {
        self.engine.lock().await.is_complete()
    }

    /// Current engine phase.
    pub async fn phase(&self) -> Phase {
        self.engine.lock().await.phase().clone()
    }

    /// The puzzle being played.
    pub async fn puzzle(&self) -> PuzzleData {
        self.engine.lock().await.puzzle().clone()
    }

    fn spawn_resolution(&self, continuation: Continuation) {
        let engine = Arc::clone(&self.engine);
        let events = self.events.clone();
        let timing = self.timing;
        let span = info_span!("resolution", generation = continuation.generation());

        tokio::spawn(
            async move {
                let mut next = Some(continuation);
                while let Some(continuation) = next {
                    tokio::time::sleep(timing.delay_for(continuation.step())).await;
                    let mut engine = engine.lock().await;
                    next = engine.resume(continuation);
                    for event in engine.drain_events() {
                        debug!(?event, "Publishing event");
                        // No subscribers is fine; events are fire-once.
                        let _ = events.send(event);
                    }
                }
            }
            .instrument(span),
        );
    }
}

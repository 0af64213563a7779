//! Application flow from setup to a finished game.

use crate::engine::EngineEvent;
use crate::generator::{ContentGenerator, GenerationError, GenerationRequest};
use crate::puzzle::PuzzleData;
use crate::review::ReviewSession;
use crate::session::{PlaySession, Timing};
use derive_more::{Display, Error};
use tracing::{info, instrument, warn};

/// Stage of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum Stage {
    /// Entering theme and terms.
    Setup,
    /// Waiting for the generator.
    Generating,
    /// Editing the generated puzzle.
    Review,
    /// Playing.
    Playing,
    /// All groups found.
    Finished,
}

/// Handle for one outstanding generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GenerationTicket(u64);

/// Flow operation rejected.
#[derive(Debug, Clone, Display, Error)]
pub enum FlowError {
    /// The operation is not valid in the current stage.
    #[display("Expected stage {}, but flow is in {}", expected, actual)]
    WrongStage {
        /// Stage the operation needs.
        expected: Stage,
        /// Current stage.
        actual: Stage,
    },
    /// A generation request is already in flight.
    #[display("A puzzle is already being generated")]
    AlreadyGenerating,
    /// The generation was cancelled before its result arrived.
    #[display("Generation was cancelled")]
    Cancelled,
    /// The generator failed; the flow is back in setup.
    #[display("{}", _0)]
    Generation(GenerationError),
}

/// Owns the review draft and play session of the current puzzle.
///
/// Only one generation can be in flight. Cancelling or resetting invalidates
/// its ticket, so a late result is dropped instead of replacing newer state.
#[derive(Debug)]
pub struct PuzzleFlow {
    stage: Stage,
    ticket: u64,
    review: Option<ReviewSession>,
    play: Option<PlaySession>,
    last_error: Option<String>,
}

impl PuzzleFlow {
    /// Creates a flow in the setup stage.
    pub fn new() -> Self {
        Self {
            stage: Stage::Setup,
            ticket: 0,
            review: None,
            play: None,
            last_error: None,
        }
    }

    /// Current stage.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Message of the last failed generation, cleared on the next request.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The review draft, while in review.
    pub fn review(&self) -> Option<&ReviewSession> {
        self.review.as_ref()
    }

    /// The review draft for editing, while in review.
    pub fn review_mut(&mut self) -> Option<&mut ReviewSession> {
        self.review.as_mut()
    }

    /// The play session, while playing or finished.
    pub fn play(&self) -> Option<&PlaySession> {
        self.play.as_ref()
    }

    /// Marks a request as in flight.
    #[instrument(skip(self, request))]
    pub fn begin_generation(&mut self, request: &GenerationRequest) -> Result<GenerationTicket, FlowError> {
        match self.stage {
            Stage::Setup => {}
            Stage::Generating => {
                warn!("Generation already in flight");
                return Err(FlowError::AlreadyGenerating);
            }
            actual => return Err(self.wrong_stage(Stage::Setup, actual)),
        }

        self.ticket += 1;
        self.last_error = None;
        self.stage = Stage::Generating;
        info!(ticket = self.ticket, theme = %request.theme(), "Generation started");
        Ok(GenerationTicket(self.ticket))
    }

    /// Delivers a generation result.
    ///
    /// Success moves to review. Failure returns to setup with the message
    /// kept in [`last_error`](Self::last_error) and no puzzle retained.
    #[instrument(skip(self, result))]
    pub fn complete_generation(
        &mut self,
        ticket: GenerationTicket,
        result: Result<PuzzleData, GenerationError>,
    ) -> Result<(), FlowError> {
        if self.stage != Stage::Generating || ticket.0 != self.ticket {
            warn!(?ticket, current = self.ticket, "Dropping result of cancelled generation");
            return Err(FlowError::Cancelled);
        }

        match result {
            Ok(puzzle) => {
                self.review = Some(ReviewSession::new(puzzle));
                self.stage = Stage::Review;
                info!("Generation finished, reviewing");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Generation failed, back to setup");
                self.last_error = Some(err.message.clone());
                self.stage = Stage::Setup;
                Err(FlowError::Generation(err))
            }
        }
    }

    /// Abandons the outstanding generation.
    #[instrument(skip(self))]
    pub fn cancel_generation(&mut self) -> Result<(), FlowError> {
        if self.stage != Stage::Generating {
            return Err(self.wrong_stage(Stage::Generating, self.stage));
        }
        self.ticket += 1;
        self.stage = Stage::Setup;
        info!("Generation cancelled");
        Ok(())
    }

    /// Runs a generator for the request and delivers its result.
    pub async fn generate_with<G>(&mut self, generator: &G, request: &GenerationRequest) -> Result<(), FlowError>
    where
        G: ContentGenerator + ?Sized,
    {
        let ticket = self.begin_generation(request)?;
        let result = generator.generate(request).await;
        self.complete_generation(ticket, result)
    }

    /// Skips generation and reviews a ready-made puzzle.
    #[instrument(skip(self, puzzle))]
    pub fn review_puzzle(&mut self, puzzle: PuzzleData) -> Result<(), FlowError> {
        if self.stage != Stage::Setup {
            return Err(self.wrong_stage(Stage::Setup, self.stage));
        }
        self.review = Some(ReviewSession::new(puzzle));
        self.stage = Stage::Review;
        Ok(())
    }

    /// Leaves review without playing, discarding the draft.
    #[instrument(skip(self))]
    pub fn back_to_setup(&mut self) -> Result<(), FlowError> {
        if self.stage != Stage::Review {
            return Err(self.wrong_stage(Stage::Review, self.stage));
        }
        self.review = None;
        self.stage = Stage::Setup;
        Ok(())
    }

    /// Confirms the draft and starts a shuffled game.
    #[instrument(skip(self))]
    pub fn start_play(&mut self, timing: Timing) -> Result<PlaySession, FlowError> {
        if self.stage != Stage::Review {
            return Err(self.wrong_stage(Stage::Review, self.stage));
        }
        let Some(review) = self.review.take() else {
            return Err(self.wrong_stage(Stage::Review, self.stage));
        };
        let session = PlaySession::start(review.confirm(), timing);
        self.play = Some(session.clone());
        self.stage = Stage::Playing;
        info!("Play started");
        Ok(session)
    }

    /// Feeds an engine event back into the flow.
    pub fn observe(&mut self, event: &EngineEvent) {
        if *event == EngineEvent::PuzzleComplete && self.stage == Stage::Playing {
            info!("Puzzle finished");
            self.stage = Stage::Finished;
        }
    }

    /// Returns to setup from any stage.
    ///
    /// The play session is reset so pending resolutions are discarded, and
    /// any outstanding generation ticket is invalidated.
    #[instrument(skip(self))]
    pub async fn reset(&mut self) {
        if let Some(play) = self.play.take() {
            play.reset().await;
        }
        self.review = None;
        self.last_error = None;
        self.ticket += 1;
        self.stage = Stage::Setup;
        info!("Flow reset");
    }

    fn wrong_stage(&self, expected: Stage, actual: Stage) -> FlowError {
        warn!(%expected, %actual, "Operation in wrong stage");
        FlowError::WrongStage { expected, actual }
    }
}

impl Default for PuzzleFlow {
    fn default() -> Self {
        Self::new()
    }
}

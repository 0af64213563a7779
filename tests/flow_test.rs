//! Tests for the setup → review → play flow.

mod common;

use async_trait::async_trait;
use puzzle_round::{
    ContentGenerator, EngineEvent, FlowError, GenerationError, GenerationErrorKind, GenerationRequest,
    InvalidInput, PuzzleData, PuzzleFlow, Stage, TermInput, Timing,
};

/// Generator returning a canned result.
struct Canned(Result<PuzzleData, GenerationErrorKind>);

#[async_trait]
impl ContentGenerator for Canned {
    async fn generate(&self, _request: &GenerationRequest) -> Result<PuzzleData, GenerationError> {
        self.0
            .clone()
            .map_err(|kind| GenerationError::new(kind, "canned failure"))
    }
}

fn request() -> GenerationRequest {
    GenerationRequest::new(
        "",
        ["Paris", "Rome", "Berlin", "Madrid"].map(|term| TermInput::new(term, term)),
    )
    .expect("valid request")
}

#[test]
fn test_blank_term_is_rejected() {
    let terms = [
        TermInput::new("1", "Paris"),
        TermInput::new("2", "   "),
        TermInput::new("3", "Berlin"),
        TermInput::new("4", ""),
    ];
    assert_eq!(
        GenerationRequest::new("Capitals", terms),
        Err(InvalidInput::EmptyTerm { index: 1 })
    );
}

#[test]
fn test_term_input_parses_hints() {
    let input: TermInput = "Paris: Eiffel | Seine".parse().unwrap();
    assert_eq!(input.term, "Paris");
    assert_eq!(input.user_clues, ["Eiffel", "Seine", ""].map(String::from));
    assert_eq!(input.suggestions().collect::<Vec<_>>(), ["Eiffel", "Seine"]);

    let plain: TermInput = "Rome".parse().unwrap();
    assert_eq!(plain.term, "Rome");
    assert_eq!(plain.suggestions().count(), 0);
}

#[tokio::test]
async fn test_successful_generation_reaches_review_then_play() {
    let mut flow = PuzzleFlow::new();
    flow.generate_with(&Canned(Ok(common::letters())), &request())
        .await
        .expect("generation succeeds");
    assert_eq!(flow.stage(), Stage::Review);

    flow.review_mut().expect("draft").set_theme("Edited");
    let session = flow.start_play(Timing::immediate()).expect("start");
    assert_eq!(flow.stage(), Stage::Playing);
    assert!(flow.review().is_none());

    let puzzle = session.puzzle().await;
    assert_eq!(puzzle.theme(), "Edited");
    assert_eq!(session.tiles().await.len(), puzzle_round::TILE_COUNT);

    flow.observe(&EngineEvent::Mistake);
    assert_eq!(flow.stage(), Stage::Playing);
    flow.observe(&EngineEvent::PuzzleComplete);
    assert_eq!(flow.stage(), Stage::Finished);

    flow.reset().await;
    assert_eq!(flow.stage(), Stage::Setup);
    assert!(flow.play().is_none());
    assert!(session.tiles().await.is_empty());
}

#[tokio::test]
async fn test_failed_generation_returns_to_setup() {
    let mut flow = PuzzleFlow::new();
    let result = flow
        .generate_with(&Canned(Err(GenerationErrorKind::MissingCredential)), &request())
        .await;

    match result {
        Err(FlowError::Generation(err)) => assert_eq!(err.kind, GenerationErrorKind::MissingCredential),
        other => panic!("Expected generation failure, got {:?}", other),
    }
    assert_eq!(flow.stage(), Stage::Setup);
    assert_eq!(flow.last_error(), Some("canned failure"));
    assert!(flow.review().is_none());

    // Retrying clears the error
    flow.generate_with(&Canned(Ok(common::letters())), &request())
        .await
        .expect("retry succeeds");
    assert_eq!(flow.last_error(), None);
    assert_eq!(flow.stage(), Stage::Review);
}

#[test]
fn test_one_generation_in_flight() {
    let mut flow = PuzzleFlow::new();
    let ticket = flow.begin_generation(&request()).expect("first request");

    assert!(matches!(flow.begin_generation(&request()), Err(FlowError::AlreadyGenerating)));

    flow.complete_generation(ticket, Ok(common::letters())).expect("delivered");
    assert_eq!(flow.stage(), Stage::Review);
}

#[test]
fn test_cancelled_generation_drops_late_result() {
    let mut flow = PuzzleFlow::new();
    let stale = flow.begin_generation(&request()).expect("first request");
    flow.cancel_generation().expect("cancel");
    assert_eq!(flow.stage(), Stage::Setup);

    let fresh = flow.begin_generation(&request()).expect("second request");
    assert!(matches!(
        flow.complete_generation(stale, Ok(common::letters())),
        Err(FlowError::Cancelled)
    ));
    assert_eq!(flow.stage(), Stage::Generating);

    flow.complete_generation(fresh, Ok(common::letters())).expect("delivered");
    assert_eq!(flow.stage(), Stage::Review);
}

#[test]
fn test_back_from_review_discards_draft() {
    let mut flow = PuzzleFlow::new();
    flow.review_puzzle(common::letters()).expect("review");
    flow.back_to_setup().expect("back");

    assert_eq!(flow.stage(), Stage::Setup);
    assert!(flow.review().is_none());
    assert!(matches!(
        flow.start_play(Timing::immediate()),
        Err(FlowError::WrongStage { expected: Stage::Review, actual: Stage::Setup })
    ));
}

#[tokio::test]
async fn test_reset_while_generating_drops_late_result() {
    let mut flow = PuzzleFlow::new();
    let ticket = flow.begin_generation(&request()).expect("request");

    flow.reset().await;
    assert_eq!(flow.stage(), Stage::Setup);

    assert!(matches!(
        flow.complete_generation(ticket, Ok(common::letters())),
        Err(FlowError::Cancelled)
    ));
    assert_eq!(flow.stage(), Stage::Setup);
    assert!(flow.review().is_none());
}

/// Theme source without a `Debug` impl.
struct Label(&'static str);

impl From<Label> for String {
    fn from(label: Label) -> Self {
        label.0.to_string()
    }
}

#[test]
fn test_request_accepts_any_theme_source() {
    let request = GenerationRequest::new(
        Label("Capitals"),
        ["Paris", "Rome", "Berlin", "Madrid"].map(|term| TermInput::new(term, term)),
    )
    .expect("valid request");
    assert_eq!(request.theme(), "Capitals");
}

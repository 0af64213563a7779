//! Tests for timed play sessions.

mod common;

use puzzle_round::{
    EngineEvent, GroupId, IgnoreReason, MatchEngine, Phase, PlaySession, Selection, Timing, deal,
};
use std::time::Duration;
use tokio::sync::broadcast::error::TryRecvError;

fn canonical_session(timing: Timing) -> PlaySession {
    let puzzle = common::letters();
    let tiles = deal(&puzzle);
    let mut engine = MatchEngine::new(puzzle);
    engine.deal_tiles(tiles).expect("board matches");
    PlaySession::from_engine(engine, timing)
}

#[test]
fn test_timing_defaults() {
    let timing = Timing::default();
    assert_eq!(timing.confirm_delay, Duration::from_millis(200));
    assert_eq!(timing.mistake_delay, Duration::from_millis(500));
}

#[tokio::test(start_paused = true)]
async fn test_match_resolves_after_confirm_delay() {
    let session = canonical_session(Timing::default());
    let mut events = session.subscribe();

    session.select_tile("a-0").await;
    session.select_tile("a-1").await;
    assert!(matches!(session.select_tile("a-2").await, Selection::Evaluating(_)));

    // Locked until the timer fires
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(session.phase().await.is_locked());
    assert_eq!(session.select_tile("b-0").await, Selection::Ignored(IgnoreReason::Locked));
    assert!(session.solved_groups().await.is_empty());

    assert_eq!(events.recv().await.unwrap(), EngineEvent::MatchResolved(GroupId::new("a")));
    assert_eq!(session.phase().await, Phase::Idle);
    assert_eq!(session.solved_groups().await, [GroupId::new("a")]);
    assert!(session.tiles().await.iter().filter(|t| t.group_id == GroupId::new("a")).all(|t| t.is_solved));
}

#[tokio::test(start_paused = true)]
async fn test_mistake_clears_after_second_delay() {
    let session = canonical_session(Timing::default());
    let mut events = session.subscribe();

    session.select_tile("a-0").await;
    session.select_tile("b-0").await;
    session.select_tile("c-0").await;

    assert_eq!(events.recv().await.unwrap(), EngineEvent::Mistake);
    // Announced but not yet cleared
    assert!(session.phase().await.is_locked());
    assert_eq!(session.tiles().await.iter().filter(|t| t.is_selected).count(), 3);

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(session.phase().await, Phase::Idle);
    let tiles = session.tiles().await;
    assert!(tiles.iter().all(|t| !t.is_selected && !t.is_solved));
    assert_eq!(session.select_tile("a-0").await, Selection::Toggled { selected: 1 });
}

#[tokio::test(start_paused = true)]
async fn test_reset_mid_evaluation_discards_pending_step() {
    let session = canonical_session(Timing::default());
    let mut events = session.subscribe();

    session.select_tile("a-0").await;
    session.select_tile("a-1").await;
    session.select_tile("a-2").await;
    session.reset().await;
    session.redeal().await;

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(session.solved_groups().await.is_empty());
    assert!(session.tiles().await.iter().all(|t| !t.is_solved && !t.is_selected));
    assert_eq!(session.phase().await, Phase::Idle);
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_full_game_with_immediate_timing() {
    let session = canonical_session(Timing::immediate());
    let mut events = session.subscribe();

    for group in ["a", "b", "c", "d"] {
        for clue in 0..3 {
            session.select_tile(&format!("{}-{}", group, clue)).await;
        }
        assert_eq!(events.recv().await.unwrap(), EngineEvent::MatchResolved(GroupId::new(group)));
    }

    assert_eq!(events.recv().await.unwrap(), EngineEvent::PuzzleComplete);
    assert!(session.is_complete().await);
    assert_eq!(session.phase().await, Phase::Complete);
    assert_eq!(session.select_tile("a-0").await, Selection::Ignored(IgnoreReason::Complete));
}

#[tokio::test]
async fn test_reset_twice_matches_reset_once() {
    let session = canonical_session(Timing::immediate());
    session.select_tile("a-0").await;

    session.reset().await;
    let once = (session.tiles().await, session.solved_groups().await, session.phase().await);
    session.reset().await;
    let twice = (session.tiles().await, session.solved_groups().await, session.phase().await);

    assert_eq!(once, twice);
    assert!(once.0.is_empty());
    assert!(!session.is_complete().await);
}

#[tokio::test]
async fn test_shuffle_keeps_solved_groups() {
    let session = canonical_session(Timing::immediate());
    let mut events = session.subscribe();

    session.select_tile("d-0").await;
    session.select_tile("d-1").await;
    session.select_tile("d-2").await;
    assert_eq!(events.recv().await.unwrap(), EngineEvent::MatchResolved(GroupId::new("d")));

    session.shuffle().await;
    assert_eq!(session.solved_groups().await, [GroupId::new("d")]);
    assert_eq!(session.tiles().await.iter().filter(|t| t.is_solved).count(), 3);

    // Restarting is the way to clear progress
    session.redeal().await;
    assert!(session.solved_groups().await.is_empty());
}

//! Shared fixtures for integration tests.

#![allow(dead_code)]

use puzzle_round::{Group, MatchEngine, PuzzleData, Selection, deal};

/// Puzzle with groups a, b, c, d whose clues are a1..a3, b1..b3, ...
pub fn letters() -> PuzzleData {
    let group = |id: &str| {
        Group::new(id, format!("term {}", id), [1, 2, 3].map(|n| format!("{}{}", id, n)))
    };
    PuzzleData::new("Letters".to_string(), [group("a"), group("b"), group("c"), group("d")])
        .expect("unique ids")
}

/// Engine with the board in canonical order (a-0, a-1, a-2, b-0, ...).
pub fn canonical_engine() -> MatchEngine {
    let puzzle = letters();
    let tiles = deal(&puzzle);
    let mut engine = MatchEngine::new(puzzle);
    engine.deal_tiles(tiles).expect("board matches");
    engine
}

/// Selects three tiles and settles the resulting evaluation.
pub fn pick(engine: &mut MatchEngine, ids: [&str; 3]) {
    engine.select_tile(ids[0]);
    engine.select_tile(ids[1]);
    match engine.select_tile(ids[2]) {
        Selection::Evaluating(next) => engine.settle(next),
        other => panic!("Third selection should evaluate, got {:?}", other),
    }
}

//! Dealing and shuffling tiles.

use super::tile::Tile;
use super::types::{PuzzleData, TILE_COUNT};
use rand::Rng;
use tracing::{debug, instrument};

/// Flattens the puzzle into tiles in canonical order (group, then clue).
#[instrument(skip(puzzle))]
pub fn deal(puzzle: &PuzzleData) -> Vec<Tile> {
    let mut tiles = Vec::with_capacity(TILE_COUNT);
    for group in puzzle.groups() {
        for (index, clue) in group.clues.iter().enumerate() {
            tiles.push(Tile::new(group.id.clone(), index, clue.clone()));
        }
    }
    tiles
}

/// Fisher–Yates shuffle in place.
///
/// Walks from the last index down to 1 and swaps each element with a
/// uniformly chosen element at or below it, so every permutation is equally
/// likely.
pub fn shuffle_tiles<R: Rng + ?Sized>(tiles: &mut [Tile], rng: &mut R) {
    for i in (1..tiles.len()).rev() {
        let j = rng.random_range(0..=i);
        tiles.swap(i, j);
    }
}

/// Deals the puzzle and shuffles the result.
#[instrument(skip(puzzle, rng))]
pub fn shuffled_tiles<R: Rng + ?Sized>(puzzle: &PuzzleData, rng: &mut R) -> Vec<Tile> {
    let mut tiles = deal(puzzle);
    shuffle_tiles(&mut tiles, rng);
    debug!(count = tiles.len(), "Shuffled tiles");
    tiles
}

//! Board shape invariant: each clue appears on exactly one tile.

use super::super::MatchEngine;
use super::Invariant;
use crate::puzzle::{PuzzleData, TILE_COUNT, Tile, TileId};

/// Invariant: the board is empty or holds one tile per (group, clue) pair.
///
/// The tile for clue `i` of a group has id `"{group}-{i}"` and shows
/// `clues[i]`, so every group is referenced by exactly three tiles.
pub struct TilesPerGroupInvariant;

impl Invariant<MatchEngine> for TilesPerGroupInvariant {
    fn holds(engine: &MatchEngine) -> bool {
        engine.tiles().is_empty() || board_matches(engine.puzzle(), engine.tiles())
    }

    fn description() -> &'static str {
        "Each clue appears on exactly one tile of its group"
    }
}

/// Returns true if `tiles` is a full board for `puzzle`, in any order.
pub(crate) fn board_matches(puzzle: &PuzzleData, tiles: &[Tile]) -> bool {
    if tiles.len() != TILE_COUNT {
        return false;
    }

    puzzle.groups().iter().all(|group| {
        group.clues.iter().enumerate().all(|(index, clue)| {
            let id = TileId::for_clue(&group.id, index);
            let mut matching = tiles.iter().filter(|t| t.id == id);
            matches!(
                (matching.next(), matching.next()),
                (Some(tile), None) if tile.group_id == group.id && tile.text == *clue
            )
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::{Group, PuzzleData, deal};

    fn engine() -> MatchEngine {
        let group = |id: &str| Group::new(id, id, [1, 2, 3].map(|n| format!("{}{}", id, n)));
        let puzzle = PuzzleData::new(String::new(), [group("a"), group("b"), group("c"), group("d")])
            .expect("unique ids");
        let mut engine = MatchEngine::new(puzzle);
        engine.deal_tiles(deal(engine.puzzle())).expect("board matches");
        engine
    }

    #[test]
    fn test_dealt_board_holds() {
        assert!(TilesPerGroupInvariant::holds(&engine()));
    }

    #[test]
    fn test_empty_board_holds() {
        let mut engine = engine();
        engine.reset();
        assert!(TilesPerGroupInvariant::holds(&engine));
    }

    #[test]
    fn test_swapped_text_violates() {
        let mut engine = engine();
        engine.tiles[0].text = "b1".to_string();
        assert!(!TilesPerGroupInvariant::holds(&engine));
    }

    #[test]
    fn test_foreign_board_does_not_match() {
        let other = engine();
        let group = |id: &str| Group::new(id, id, [1, 2, 3].map(|n| format!("{}{}", id, n)));
        let puzzle = PuzzleData::new(String::new(), [group("w"), group("x"), group("y"), group("z")])
            .expect("unique ids");
        assert!(!board_matches(&puzzle, other.tiles()));
        assert!(!board_matches(other.puzzle(), &other.tiles()[..3]));
        assert!(board_matches(other.puzzle(), other.tiles()));
    }

    #[test]
    fn test_duplicate_tile_violates() {
        let mut engine = engine();
        engine.tiles[1] = engine.tiles[0].clone();
        assert!(!TilesPerGroupInvariant::holds(&engine));
    }
}

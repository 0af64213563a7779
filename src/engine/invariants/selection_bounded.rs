//! Selection invariant: at most three tiles are ever selected.

use super::super::{MatchEngine, Phase};
use super::Invariant;
use crate::puzzle::CLUES_PER_GROUP;

/// Invariant: the selection never exceeds three tiles.
///
/// Solved tiles are never selected, exactly three tiles are selected while
/// evaluating, and a step is pending exactly while evaluating.
pub struct SelectionBoundedInvariant;

impl Invariant<MatchEngine> for SelectionBoundedInvariant {
    fn holds(engine: &MatchEngine) -> bool {
        if engine.tiles().iter().any(|t| t.is_solved && t.is_selected) {
            return false;
        }

        let selected = engine.selected().count();
        let evaluating = matches!(engine.phase(), Phase::Evaluating(_));

        selected <= CLUES_PER_GROUP
            && (selected == CLUES_PER_GROUP) == evaluating
            && engine.pending.is_some() == evaluating
    }

    fn description() -> &'static str {
        "At most three tiles selected, exactly three while evaluating"
    }
}

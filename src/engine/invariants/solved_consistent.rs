//! Solved-set invariant: tiles and the solved set agree.

use super::super::{MatchEngine, Phase};
use super::Invariant;
use crate::puzzle::GROUP_COUNT;
use std::collections::HashSet;

/// Invariant: a tile is solved exactly when its group is in the solved set.
///
/// The solved set holds no duplicates, and the engine is `Complete`
/// exactly when it holds every group.
pub struct SolvedConsistentInvariant;

impl Invariant<MatchEngine> for SolvedConsistentInvariant {
    fn holds(engine: &MatchEngine) -> bool {
        let solved: HashSet<_> = engine.solved_groups().iter().collect();
        if solved.len() != engine.solved_groups().len() {
            return false;
        }

        let tiles_agree = engine
            .tiles()
            .iter()
            .all(|t| t.is_solved == solved.contains(&t.group_id));
        let complete = solved.len() == GROUP_COUNT;

        tiles_agree && complete == matches!(engine.phase(), Phase::Complete)
    }

    fn description() -> &'static str {
        "Solved tiles match the solved set"
    }
}

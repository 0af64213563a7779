//! Turning a model answer into a puzzle.

use super::GenerationError;
use crate::puzzle::{CLUES_PER_GROUP, GROUP_COUNT, Group, GroupId, PuzzleData};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

#[derive(Debug, Deserialize)]
struct RawResponse {
    #[serde(default)]
    theme: String,
    groups: Vec<RawGroup>,
}

#[derive(Debug, Deserialize)]
struct RawGroup {
    term: String,
    clues: Vec<String>,
}

/// Strips a surrounding markdown code fence, if any.
fn strip_fence(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string ("json"), which may share a line with the body.
    let rest = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };
    let rest = rest.trim_end();
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Parses a model answer into a puzzle.
///
/// Groups get ids `group-0` .. `group-3`. Extra groups and extra clues are
/// dropped; fewer than four groups or three clues is an error. An empty
/// theme falls back to `requested_theme`.
#[instrument(skip(text), fields(length = text.len()))]
pub fn normalize_response(text: &str, requested_theme: &str) -> Result<PuzzleData, GenerationError> {
    let raw: RawResponse = serde_json::from_str(strip_fence(text))
        .map_err(|e| GenerationError::malformed(format!("Response is not puzzle JSON: {}", e)))?;

    if raw.groups.len() < GROUP_COUNT {
        return Err(GenerationError::malformed(format!(
            "Expected {} groups, got {}",
            GROUP_COUNT,
            raw.groups.len()
        )));
    }
    if raw.groups.len() > GROUP_COUNT {
        warn!(count = raw.groups.len(), "Dropping extra groups");
    }

    let mut groups = Vec::with_capacity(GROUP_COUNT);
    for (index, group) in raw.groups.into_iter().take(GROUP_COUNT).enumerate() {
        let count = group.clues.len();
        if count < CLUES_PER_GROUP {
            return Err(GenerationError::malformed(format!(
                "Term \"{}\" has {} clues, expected {}",
                group.term, count, CLUES_PER_GROUP
            )));
        }
        if count > CLUES_PER_GROUP {
            debug!(term = %group.term, count, "Truncating clues");
        }

        let mut clues = group.clues.into_iter();
        let clues: [String; CLUES_PER_GROUP] = std::array::from_fn(|_| clues.next().unwrap_or_default());
        groups.push(Group::new(GroupId::for_index(index), group.term, clues));
    }

    let groups: [Group; GROUP_COUNT] = groups
        .try_into()
        .map_err(|_| GenerationError::malformed("Wrong number of groups"))?;

    let theme = match raw.theme.trim() {
        "" => requested_theme.trim().to_string(),
        theme => theme.to_string(),
    };

    PuzzleData::new(theme, groups).map_err(|e| GenerationError::malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GenerationErrorKind;

    const ANSWER: &str = r#"{
        "theme": "Capitals",
        "groups": [
            {"term": "Paris", "clues": ["Eiffel", "Seine", "Louvre"]},
            {"term": "Rome", "clues": ["Colosseum", "Tiber", "Vatican", "Pasta"]},
            {"term": "Berlin", "clues": ["Wall", "Spree", "Brandenburg"]},
            {"term": "Madrid", "clues": ["Prado", "Real", "Retiro"]}
        ]
    }"#;

    #[test]
    fn test_assigns_ids_and_truncates_clues() {
        let puzzle = normalize_response(ANSWER, "").expect("valid answer");
        assert_eq!(puzzle.theme(), "Capitals");
        let rome = &puzzle.groups()[1];
        assert_eq!(rome.id, GroupId::new("group-1"));
        assert_eq!(rome.clues, ["Colosseum", "Tiber", "Vatican"].map(String::from));
    }

    #[test]
    fn test_short_clue_list_is_malformed() {
        let answer = ANSWER.replace(r#"["Wall", "Spree", "Brandenburg"]"#, r#"["Wall"]"#);
        let err = normalize_response(&answer, "").unwrap_err();
        assert_eq!(err.kind, GenerationErrorKind::Malformed);
        assert!(err.message.contains("Berlin"));
    }

    #[test]
    fn test_missing_group_is_malformed() {
        let answer = r#"{"theme": "x", "groups": [{"term": "a", "clues": ["1", "2", "3"]}]}"#;
        let err = normalize_response(answer, "").unwrap_err();
        assert_eq!(err.kind, GenerationErrorKind::Malformed);
    }

    #[test]
    fn test_fenced_answer_and_theme_fallback() {
        let answer = format!("```json\n{}\n```", ANSWER.replace("Capitals", ""));
        let puzzle = normalize_response(&answer, " Cities ").expect("valid answer");
        assert_eq!(puzzle.theme(), "Cities");
    }

    #[test]
    fn test_single_line_fence() {
        let compact: String = ANSWER.split_whitespace().collect::<Vec<_>>().join(" ");
        for answer in [format!("```{}```", compact), format!("```json {}```", compact)] {
            let puzzle = normalize_response(&answer, "").expect("valid answer");
            assert_eq!(puzzle.groups()[3].term, "Madrid");
        }
    }

    #[test]
    fn test_extra_groups_are_dropped() {
        let answer = ANSWER.replace(
            r#"{"term": "Madrid", "clues": ["Prado", "Real", "Retiro"]}"#,
            r#"{"term": "Madrid", "clues": ["Prado", "Real", "Retiro"]},
            {"term": "Lisbon", "clues": ["Tram", "Tagus", "Fado"]}"#,
        );
        let puzzle = normalize_response(&answer, "").expect("valid answer");
        let terms: Vec<_> = puzzle.groups().iter().map(|g| g.term.as_str()).collect();
        assert_eq!(terms, ["Paris", "Rome", "Berlin", "Madrid"]);
        assert_eq!(puzzle.groups()[3].id, GroupId::new("group-3"));
    }

    #[test]
    fn test_not_json_is_malformed() {
        let err = normalize_response("Sorry, I can't help with that.", "").unwrap_err();
        assert_eq!(err.kind, GenerationErrorKind::Malformed);
    }
}

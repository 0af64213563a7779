//! Line-based terminal front end: review prompt and game board.

use crate::engine::{EngineEvent, IgnoreReason, Selection};
use crate::flow::{FlowError, PuzzleFlow};
use crate::generator::{ContentGenerator, GenerationRequest};
use crate::puzzle::{GroupId, PuzzleData, Tile};
use crate::session::PlaySession;
use std::fmt::Write;
use std::time::Duration;
use tokio::io::{AsyncBufRead, Lines};
use tokio::sync::broadcast::error::TryRecvError;
use tracing::{debug, instrument, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(20);
const TILE_WIDTH: usize = 22;

/// A command typed during review. Indices are zero-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewCommand {
    /// `theme <text>`
    Theme(String),
    /// `term <group> <text>`
    Term(usize, String),
    /// `clue <group> <clue> <text>`
    Clue(usize, usize, String),
    /// `show`
    Show,
    /// `start`
    Start,
    /// `back`
    Back,
}

/// Parses a 1-based index.
fn index(word: &str) -> Option<usize> {
    word.parse::<usize>().ok()?.checked_sub(1)
}

impl ReviewCommand {
    /// Parses a review command; `None` if it is not one.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
        match word {
            "theme" => Some(Self::Theme(rest.trim().to_string())),
            "term" => {
                let (group, text) = rest.trim().split_once(' ').unwrap_or((rest.trim(), ""));
                Some(Self::Term(index(group)?, text.trim().to_string()))
            }
            "clue" => {
                let mut parts = rest.trim().splitn(3, ' ');
                let group = index(parts.next()?)?;
                let clue = index(parts.next()?)?;
                Some(Self::Clue(group, clue, parts.next().unwrap_or("").trim().to_string()))
            }
            "show" => Some(Self::Show),
            "start" => Some(Self::Start),
            "back" => Some(Self::Back),
            _ => None,
        }
    }
}

/// A command typed during play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayCommand {
    /// Select the tile at this zero-based board position.
    Tile(usize),
    /// Reorder the tiles, keeping progress.
    Shuffle,
    /// Start over with a fresh board, clearing solved groups.
    Restart,
    /// Leave the game.
    Quit,
}

impl PlayCommand {
    /// Parses a play command; `None` if it is not one.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "shuffle" => Some(Self::Shuffle),
            "restart" => Some(Self::Restart),
            "quit" | "q" => Some(Self::Quit),
            other => index(other).map(Self::Tile),
        }
    }
}

/// Renders the draft with 1-based group and clue numbers.
pub fn render_draft(puzzle: &PuzzleData) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Theme: {}", puzzle.theme());
    for (g, group) in puzzle.groups().iter().enumerate() {
        let _ = writeln!(out, "Term {}: {}", g + 1, group.term);
        for (c, clue) in group.clues.iter().enumerate() {
            let _ = writeln!(out, "    {}. {}", c + 1, clue);
        }
    }
    out
}

/// Renders the board as numbered tiles, three per row, followed by the terms.
///
/// Selected tiles are wrapped in `[ ]`, solved tiles in `( )`. Unsolved
/// terms are hidden.
pub fn render_board(tiles: &[Tile], puzzle: &PuzzleData, solved: &[GroupId]) -> String {
    let mut out = String::new();
    if !puzzle.theme().is_empty() {
        let _ = writeln!(out, "{}", puzzle.theme().to_uppercase());
    }
    for (row, chunk) in tiles.chunks(3).enumerate() {
        for (col, tile) in chunk.iter().enumerate() {
            let number = row * 3 + col + 1;
            let label = if tile.is_solved {
                format!("({})", tile.text)
            } else if tile.is_selected {
                format!("[{}]", tile.text)
            } else {
                tile.text.clone()
            };
            let _ = write!(out, "{:>2}. {:<width$}", number, label, width = TILE_WIDTH);
        }
        out.push('\n');
    }

    let terms: Vec<_> = puzzle
        .groups()
        .iter()
        .map(|g| if solved.contains(&g.id) { g.term.to_uppercase() } else { "???".to_string() })
        .collect();
    let _ = writeln!(out, "\n{}", terms.join(" | "));
    out
}

/// Answer key: every term with its clues.
pub fn answer_key(puzzle: &PuzzleData) -> String {
    let mut out = String::from("Answer key\n");
    for group in puzzle.groups() {
        let _ = writeln!(out, "  {}: {}", group.term.to_uppercase(), group.clues.join(" • "));
    }
    out
}

/// Generates the puzzle, offering a retry from setup after each failure.
///
/// Returns `false` if the user gave up instead of retrying.
#[instrument(skip_all)]
pub async fn generate_loop<G, R>(
    flow: &mut PuzzleFlow,
    generator: &G,
    request: &GenerationRequest,
    lines: &mut Lines<R>,
) -> Result<bool, std::io::Error>
where
    G: ContentGenerator + ?Sized,
    R: AsyncBufRead + Unpin,
{
    loop {
        println!("Generating...");
        match flow.generate_with(generator, request).await {
            Ok(()) => return Ok(true),
            Err(FlowError::Generation(err)) => {
                warn!(kind = %err.kind, "Generation failed");
                println!(
                    "Could not generate the puzzle, check your API key and try again: {}",
                    flow.last_error().unwrap_or_default()
                );
                println!("Press Enter to retry or type 'quit'.");
                match lines.next_line().await? {
                    Some(line) if line.trim().is_empty() => {}
                    _ => return Ok(false),
                }
            }
            Err(err) => {
                warn!(error = %err, "Generation not started");
                println!("{}", err);
                return Ok(false);
            }
        }
    }
}

/// Reads review commands until the user starts or goes back.
///
/// Returns `true` if the user chose to start playing.
#[instrument(skip_all)]
pub async fn review_loop<R>(flow: &mut PuzzleFlow, lines: &mut Lines<R>) -> std::io::Result<bool>
where
    R: AsyncBufRead + Unpin,
{
    let Some(review) = flow.review_mut() else {
        return Ok(false);
    };
    println!("{}", render_draft(review.snapshot()));
    println!("Edit with: theme <text> | term <n> <text> | clue <n> <m> <text> | show | start | back");

    while let Some(line) = lines.next_line().await? {
        let Some(command) = ReviewCommand::parse(&line) else {
            println!("Unknown command: {}", line.trim());
            continue;
        };
        debug!(?command, "Review command");
        let result = match command {
            ReviewCommand::Theme(text) => {
                review.set_theme(text);
                Ok(())
            }
            ReviewCommand::Term(group, text) => review.set_term(group, text),
            ReviewCommand::Clue(group, clue, text) => review.set_clue(group, clue, text),
            ReviewCommand::Show => {
                println!("{}", render_draft(review.snapshot()));
                Ok(())
            }
            ReviewCommand::Start => return Ok(true),
            ReviewCommand::Back => return Ok(false),
        };
        if let Err(e) = result {
            println!("{}", e);
        }
    }
    Ok(false)
}

/// Waits for a pending resolution to finish.
async fn wait_until_unlocked(session: &PlaySession) {
    while session.phase().await.is_locked() {
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

/// Plays until the puzzle is solved, the user quits or input ends.
#[instrument(skip_all)]
pub async fn play_loop<R>(
    flow: &mut PuzzleFlow,
    session: &PlaySession,
    lines: &mut Lines<R>,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut events = session.subscribe();
    let puzzle = session.puzzle().await;
    println!("Which 4 terms are we looking for? Type a tile number, 'shuffle', 'restart' or 'quit'.\n");

    loop {
        let tiles = session.tiles().await;
        println!("{}", render_board(&tiles, &puzzle, &session.solved_groups().await));
        if session.is_complete().await {
            println!("*** Puzzle complete! ***\n");
            println!("{}", answer_key(&puzzle));
            return Ok(());
        }

        let Some(line) = lines.next_line().await? else {
            return Ok(());
        };
        match PlayCommand::parse(&line) {
            Some(PlayCommand::Quit) => return Ok(()),
            Some(PlayCommand::Shuffle) => session.shuffle().await,
            Some(PlayCommand::Restart) => {
                session.redeal().await;
                println!("Board restarted; solved groups cleared.");
            }
            Some(PlayCommand::Tile(position)) => {
                let Some(tile) = tiles.get(position) else {
                    println!("No tile {}", position + 1);
                    continue;
                };
                match session.select_tile(tile.id.as_str()).await {
                    Selection::Evaluating(_) => wait_until_unlocked(session).await,
                    Selection::Ignored(IgnoreReason::AlreadySolved) => println!("Already solved"),
                    Selection::Ignored(_) | Selection::Toggled { .. } => {}
                }
            }
            None => println!("Unknown command: {}", line.trim()),
        }

        loop {
            match events.try_recv() {
                Ok(event) => {
                    match &event {
                        EngineEvent::MatchResolved(group) => {
                            if let Some(group) = puzzle.group(group) {
                                println!("Correct: {}", group.term.to_uppercase());
                            }
                        }
                        // Terminal bell stands in for the buzzer.
                        EngineEvent::Mistake => println!("\x07Wrong!"),
                        EngineEvent::PuzzleComplete => {}
                    }
                    flow.observe(&event);
                }
                Err(TryRecvError::Lagged(skipped)) => debug!(skipped, "Missed events"),
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::Stage;
    use crate::generator::{GenerationError, GenerationErrorKind};
    use crate::puzzle::{Group, TermInput, deal};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::io::AsyncBufReadExt;

    /// Fails a set number of times, then succeeds.
    struct Flaky {
        failures: usize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ContentGenerator for Flaky {
        async fn generate(&self, _request: &GenerationRequest) -> Result<PuzzleData, GenerationError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) < self.failures {
                Err(GenerationError::new(GenerationErrorKind::Unreachable, "offline"))
            } else {
                Ok(puzzle())
            }
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest::new("", ["w", "x", "y", "z"].map(|t| TermInput::new(t, t))).expect("valid request")
    }

    fn puzzle() -> PuzzleData {
        let group = |id: &str| Group::new(id, format!("term {}", id), [1, 2, 3].map(|n| format!("{}{}", id, n)));
        PuzzleData::new("Letters".to_string(), [group("a"), group("b"), group("c"), group("d")])
            .expect("unique ids")
    }

    #[tokio::test]
    async fn test_generate_loop_retries_after_failure() {
        let generator = Flaky { failures: 1, calls: AtomicUsize::new(0) };
        let mut flow = PuzzleFlow::new();
        let mut lines = (&b"\n"[..]).lines();

        let ready = generate_loop(&mut flow, &generator, &request(), &mut lines).await.unwrap();
        assert!(ready);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
        assert_eq!(flow.stage(), Stage::Review);
    }

    #[tokio::test]
    async fn test_generate_loop_gives_up_on_quit() {
        let generator = Flaky { failures: usize::MAX, calls: AtomicUsize::new(0) };
        let mut flow = PuzzleFlow::new();
        let mut lines = (&b"quit\n"[..]).lines();

        let ready = generate_loop(&mut flow, &generator, &request(), &mut lines).await.unwrap();
        assert!(!ready);
        assert_eq!(flow.stage(), Stage::Setup);
        assert_eq!(flow.last_error(), Some("offline"));
    }

    #[test]
    fn test_parse_review_commands() {
        assert_eq!(ReviewCommand::parse("theme Big cities"), Some(ReviewCommand::Theme("Big cities".into())));
        assert_eq!(ReviewCommand::parse("term 2 Rome"), Some(ReviewCommand::Term(1, "Rome".into())));
        assert_eq!(
            ReviewCommand::parse("clue 1 3 Eiffel tower"),
            Some(ReviewCommand::Clue(0, 2, "Eiffel tower".into()))
        );
        assert_eq!(ReviewCommand::parse("clue 1"), None);
        assert_eq!(ReviewCommand::parse("term 0 x"), None);
        assert_eq!(ReviewCommand::parse("start"), Some(ReviewCommand::Start));
    }

    #[test]
    fn test_parse_play_commands() {
        assert_eq!(PlayCommand::parse(" 12 "), Some(PlayCommand::Tile(11)));
        assert_eq!(PlayCommand::parse("q"), Some(PlayCommand::Quit));
        assert_eq!(PlayCommand::parse("shuffle"), Some(PlayCommand::Shuffle));
        assert_eq!(PlayCommand::parse("restart"), Some(PlayCommand::Restart));
        assert_eq!(PlayCommand::parse("0"), None);
        assert_eq!(PlayCommand::parse("abc"), None);
    }

    #[test]
    fn test_board_hides_unsolved_terms() {
        let puzzle = puzzle();
        let mut tiles = deal(&puzzle);
        tiles[0].is_solved = true;
        tiles[4].is_selected = true;
        let board = render_board(&tiles, &puzzle, &[GroupId::new("a")]);

        assert!(board.starts_with("LETTERS\n"));
        assert!(board.contains("(a1)"));
        assert!(board.contains("[b2]"));
        assert!(board.contains("TERM A | ??? | ??? | ???"));
    }

    #[test]
    fn test_answer_key_lists_all_clues() {
        let key = answer_key(&puzzle());
        assert!(key.contains("TERM C: c1 • c2 • c3"));
    }
}

//! Command-line interface for puzzle_round.

use clap::{Args, Parser, Subcommand};
use puzzle_round::TermInput;
use std::path::PathBuf;

/// Puzzle Round - find the four groups of three
#[derive(Parser, Debug)]
#[command(name = "puzzle_round")]
#[command(about = "Generate and play find-the-groups puzzles", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to game config (TOML). Defaults are used if omitted.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Theme and terms for a new puzzle.
#[derive(Args, Debug)]
pub struct SetupArgs {
    /// Theme of the puzzle (the model picks one if empty)
    #[arg(short, long, default_value = "")]
    pub theme: String,

    /// A term, optionally with clue hints: "term:hint|hint|hint". Give exactly four.
    #[arg(long = "term", required = true, num_args = 1)]
    pub terms: Vec<TermInput>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a puzzle and write it as JSON
    Generate {
        #[command(flatten)]
        setup: SetupArgs,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Review and play a puzzle from a JSON file
    Play {
        /// Puzzle JSON file
        #[arg(short, long)]
        puzzle: PathBuf,
    },

    /// Generate a puzzle, review it and play it
    New {
        #[command(flatten)]
        setup: SetupArgs,
    },
}

//! Puzzle Round - CLI
//!
//! Generates puzzles with an LLM, lets the user review them and plays them in
//! the terminal.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command, SetupArgs};
use puzzle_round::{
    ContentGenerator, GROUP_COUNT, GameConfig, GenerationRequest, LlmGenerator, PuzzleData, PuzzleFlow,
    TermInput, terminal,
};
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = GameConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Generate { setup, output } => run_generate(&config, setup, output.as_deref()).await,
        Command::Play { puzzle } => run_play(&config, &puzzle).await,
        Command::New { setup } => run_new(&config, setup).await,
    }
}

fn stdin_lines() -> Lines<BufReader<Stdin>> {
    BufReader::new(tokio::io::stdin()).lines()
}

/// Builds a validated request from the command line.
fn build_request(setup: SetupArgs) -> Result<GenerationRequest> {
    let count = setup.terms.len();
    let terms: [TermInput; GROUP_COUNT] = setup
        .terms
        .try_into()
        .map_err(|_| anyhow::anyhow!("Expected {} terms, got {}", GROUP_COUNT, count))?;
    let terms = terms.map(|mut t| {
        t.id = t.term.clone();
        t
    });
    Ok(GenerationRequest::new(setup.theme, terms)?)
}

/// Generate a puzzle and write it as JSON
#[instrument(skip(config, setup))]
async fn run_generate(config: &GameConfig, setup: SetupArgs, output: Option<&Path>) -> Result<()> {
    let request = build_request(setup)?;
    let generator = LlmGenerator::from_config(config)?;
    eprintln!("Generating...");
    let puzzle = generator.generate(&request).await?;
    let json = serde_json::to_string_pretty(&puzzle)?;

    match output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "Puzzle written");
        }
        None => println!("{}", json),
    }
    Ok(())
}

/// Review and play a puzzle from a JSON file
#[instrument(skip(config))]
async fn run_play(config: &GameConfig, path: &Path) -> Result<()> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let puzzle: PuzzleData = serde_json::from_str(&content).context("Invalid puzzle file")?;

    let mut flow = PuzzleFlow::new();
    flow.review_puzzle(puzzle)?;
    review_and_play(config, &mut flow, &mut stdin_lines()).await
}

/// Generate, review and play
#[instrument(skip(config, setup))]
async fn run_new(config: &GameConfig, setup: SetupArgs) -> Result<()> {
    let request = build_request(setup)?;
    let generator = LlmGenerator::from_config(config)?;

    let mut flow = PuzzleFlow::new();
    let mut lines = stdin_lines();
    if !terminal::generate_loop(&mut flow, &generator, &request, &mut lines).await? {
        return Ok(());
    }
    review_and_play(config, &mut flow, &mut lines).await
}

async fn review_and_play<R>(config: &GameConfig, flow: &mut PuzzleFlow, lines: &mut Lines<R>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    if !terminal::review_loop(flow, lines).await? {
        flow.back_to_setup()?;
        eprintln!("Back to setup; nothing to play.");
        return Ok(());
    }

    let session = flow.start_play(config.timing())?;
    terminal::play_loop(flow, &session, lines).await?;
    info!(stage = %flow.stage(), "Game over");
    flow.reset().await;
    Ok(())
}

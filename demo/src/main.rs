//! QUILL Writing Studio demo CLI
//!
//! Runs one or all of the three studio scenarios. Each scenario uses real
//! QUILL components (config, executor, journal, verifier) wired to a scripted
//! offline model.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- first-draft
//!   cargo run -p demo -- revision
//!   cargo run -p demo -- autopilot --config path/to/engine.toml

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use quill_config::EngineConfig;
use quill_contracts::error::QuillResult;
use quill_ref_studio::scenarios::{autopilot, first_draft, revision, studio_config};

// ── CLI definition ───────────────────────────────────────────────────────────

/// QUILL: goal-oriented action planning for AI-assisted novel writing.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "QUILL writing-studio reference demo",
    long_about = "Runs QUILL studio scenarios showing action availability, parallel\n\
                  chapter drafting with failure isolation, revision tools, and the autopilot."
)]
struct Cli {
    /// Engine configuration TOML. Defaults to the studio's bundled config.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all three studio scenarios in sequence.
    RunAll,
    /// Scenario 1: First Draft (outline, planning, parallel batch with retry).
    FirstDraft,
    /// Scenario 2: Revision Pass (dialogue doctor, refine, continue, review).
    Revision,
    /// Scenario 3: Autopilot (cheapest legal action until the limit).
    Autopilot,
}

// ── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    // Initialize structured logging. Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    match run(cli).await {
        Ok(()) => {
            println!("All selected scenarios completed successfully.");
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

// ── Scenario dispatch ────────────────────────────────────────────────────────

async fn run(cli: Cli) -> QuillResult<()> {
    let config = load_config(cli.config)?;

    match cli.command {
        Command::RunAll => {
            first_draft::run_scenario(&config).await?;
            revision::run_scenario(&config).await?;
            autopilot::run_scenario(&config).await
        }
        Command::FirstDraft => first_draft::run_scenario(&config).await,
        Command::Revision => revision::run_scenario(&config).await,
        Command::Autopilot => autopilot::run_scenario(&config).await,
    }
}

fn load_config(path: Option<PathBuf>) -> QuillResult<EngineConfig> {
    match path {
        Some(path) => {
            println!("Using engine config: {}", path.display());
            println!();
            EngineConfig::from_file(&path)
        }
        None => studio_config(),
    }
}

// ── Banner ───────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("QUILL — Goal-Oriented Writing Engine");
    println!("Writing Studio Reference Demo");
    println!("====================================");
    println!();
    println!("QUILL execution per action:");
    println!("  [1] Availability: world-state preconditions + dynamic predicates");
    println!("  [2] Engine lock taken; a second request while busy is a silent no-op");
    println!("  [3] Story model called (chapters fan out with a bounded cap)");
    println!("  [4] Output verified against JSON Schema + semantic rules");
    println!("  [5] Project updated, effects applied, entry appended to the SHA-256 journal");
    println!();
}

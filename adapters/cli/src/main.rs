#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Gene-Link in a terminal.

mod audio;
mod config;
mod input;
mod session;
mod terminal;

use std::{
    io::{self, BufRead},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::tty::IsTty;
use gene_link_rendering::{Presentation, RenderingBackend, Scene, BACKGROUND};
use gene_link_system_dealer::Dealer;
use gene_link_system_unlocks::{JsonFileStore, Unlocks};
use gene_link_core::WELCOME_BANNER;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::{
    config::{Overrides, Settings},
    session::{Flow, Session},
    terminal::TerminalBackend,
};

/// Link four clues to the diagnosis they describe.
#[derive(Debug, Parser)]
#[command(name = "gene-link", version, about)]
struct Args {
    /// TOML settings file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// JSON content pool replacing the built-in diagnoses.
    #[arg(long, value_name = "PATH")]
    pool: Option<PathBuf>,
    /// File holding the unlocked collection.
    #[arg(long, value_name = "PATH")]
    store: Option<PathBuf>,
    /// Seed for reproducible deals.
    #[arg(long)]
    seed: Option<u64>,
    /// Empty the selection after a wrong submission.
    #[arg(long)]
    clear_on_miss: bool,
    /// Disable the terminal bell.
    #[arg(long)]
    mute: bool,
    /// Log filter, for example `debug` or `gene_link_world=trace`.
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,
    #[command(subcommand)]
    mode: Option<Mode>,
}

/// What the binary should do.
#[derive(Clone, Copy, Debug, Subcommand)]
enum Mode {
    /// Play interactively (default).
    Play,
    /// Print the unlocked collection and exit.
    Bank,
    /// Check the content pool and exit.
    Validate,
}

/// Entry point for the Gene-Link command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_level.as_deref());

    let settings = Settings::resolve(
        args.config.as_deref(),
        Overrides {
            pool: args.pool,
            store: args.store,
            seed: args.seed,
            clear_on_miss: args.clear_on_miss,
            mute: args.mute,
        },
    )?;

    match args.mode.unwrap_or(Mode::Play) {
        Mode::Play => play(&settings),
        Mode::Bank => print_bank(&settings),
        Mode::Validate => {
            let pool = settings.load_pool()?;
            println!("content pool ok: {} diagnoses", pool.len());
            Ok(())
        }
    }
}

fn init_logging(filter: Option<&str>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(filter) = filter {
        let _ = builder.parse_filters(filter);
    }
    let _ = builder
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .try_init();
}

fn play(settings: &Settings) -> Result<()> {
    let pool = settings.load_pool()?;
    let rng = match settings.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let unlocks = Unlocks::load(JsonFileStore::new(&settings.store));
    let mut session = Session::new(
        pool,
        Dealer::new(rng),
        unlocks,
        settings.selection_after_miss,
    );

    let stdout = io::stdout();
    let colors = stdout.is_tty();
    let mut backend = TerminalBackend::new(stdout.lock())
        .with_colors(colors)
        .with_sound(settings.sound);
    backend.present(&session.presentation())?;

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read player input")?;
        let flow = match input::parse(&line) {
            Ok(Some(action)) => session.handle(action),
            Ok(None) => Flow::Continue,
            Err(error) => {
                session.notify(error.to_string());
                Flow::Continue
            }
        };
        if flow == Flow::Quit {
            break;
        }
        for cue in session.take_cues() {
            backend.play(cue)?;
        }
        backend.present(&session.presentation())?;
    }

    Ok(())
}

fn print_bank(settings: &Settings) -> Result<()> {
    let unlocks = Unlocks::load(JsonFileStore::new(&settings.store));
    let presentation = Presentation::new(
        WELCOME_BANNER,
        BACKGROUND,
        Scene::study_bank(unlocks.collection().iter()),
    );
    let mut backend = TerminalBackend::new(io::stdout().lock());
    backend.present(&presentation)?;
    println!();
    Ok(())
}

//! Headless runner: plays a level to its end tick with a scripted action
//! list, prints the result and verifies determinism.
//!
//! Run with: `cargo run -p pdogs-headless -- --level levels/primes.ron --actions actions.txt`

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use pdogs_core::action_log::{ActionLog, parse_history};
use pdogs_core::config::{Level, SimConfig};
use pdogs_core::manager::Manager;
use pdogs_core::replay::{record_game, replay_and_verify};
use pdogs_core::strategy::{ScriptedStrategy, Strategy};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "pdogs-headless",
    version,
    about = "Run a PDOGS level without rendering"
)]
struct Cli {
    /// Level file (.ron, .toml or .json). Overrides --divisor and --seed.
    #[arg(long)]
    level: Option<PathBuf>,

    /// Scoring divisor when no level file is given.
    #[arg(long, default_value_t = 1)]
    divisor: u32,

    /// World seed when no level file is given.
    #[arg(long, default_value_t = 20)]
    seed: u32,

    /// Action history (`row col ordinal` per line), played back-to-back.
    #[arg(long)]
    actions: Option<PathBuf>,

    /// Override the end tick.
    #[arg(long)]
    ticks: Option<u64>,

    /// Write the action history of the run here.
    #[arg(long)]
    save_history: Option<PathBuf>,

    /// Record a bitcode replay of the run here, then verify it.
    #[arg(long)]
    replay_out: Option<PathBuf>,

    /// Ticks between replay hash checkpoints.
    #[arg(long, default_value_t = 500)]
    checkpoint_interval: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let cli = Cli::parse();

    let (name, level, mut config) = match &cli.level {
        Some(path) => {
            let loaded = pdogs_data::load_level(path)
                .with_context(|| format!("loading level {}", path.display()))?;
            (loaded.name, loaded.level, loaded.config)
        }
        None => (String::new(), Level::new(cli.divisor, cli.seed), SimConfig::default()),
    };
    if let Some(ticks) = cli.ticks {
        config.end_tick = ticks;
    }

    let actions = match &cli.actions {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading actions {}", path.display()))?;
            parse_history(&text).with_context(|| format!("parsing actions {}", path.display()))?
        }
        None => Vec::new(),
    };
    info!(actions = actions.len(), "action script loaded");

    let strategy = || -> Box<dyn Strategy> { Box::new(ScriptedStrategy::new(actions.clone())) };

    println!("=== PDOGS {name} ({}) ===", level.divisor);
    println!("Seed: {}", level.seed);

    // Run 1
    let mut first = Manager::new(config.clone(), level, strategy()).context("invalid configuration")?;
    let world = first.world_summary();
    println!(
        "World: {} deposits, {}/{} walls",
        world.deposits, world.walls_placed, world.walls_attempted
    );

    let score = first.run_to_end();
    let hash1 = first.state_hash();
    let history = first.history();
    println!(
        "After {} ticks: score = {score}, actions = {} ({} applied), state hash = {hash1:#018x}",
        first.elapsed_ticks(),
        history.len(),
        history.applied_count()
    );

    if let Some(path) = &cli.save_history {
        save_history(history, path)?;
        println!("History written to {}", path.display());
    }

    // Run 2: determinism check
    let mut second = Manager::new(config.clone(), level, strategy())?;
    second.run_to_end();
    check_rerun((hash1, score), (second.state_hash(), second.score()))?;
    println!("Determinism: PASS (hashes match)");

    if let Some(path) = &cli.replay_out {
        let log = record_game(config, level, strategy(), cli.checkpoint_interval)?;
        let bytes = log.serialize()?;
        fs::write(path, &bytes).with_context(|| format!("writing {}", path.display()))?;
        let result = replay_and_verify(&log)?;
        if !result.is_verified {
            bail!("replay verification failed: {:?}", result.first_mismatch);
        }
        println!(
            "Replay: {} bytes, {} checkpoints verified",
            bytes.len(),
            log.checkpoints.len()
        );
    }

    Ok(())
}

/// Write `history` in the text format, flushing before returning so a full
/// disk is reported instead of silently truncating the file.
fn save_history(history: &ActionLog, path: &Path) -> Result<()> {
    let file = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    history
        .write_history(&mut writer)
        .with_context(|| format!("writing {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}

/// Fail unless two runs of the same game ended with the same (hash, score).
fn check_rerun(first: (u64, u64), second: (u64, u64)) -> Result<()> {
    let ((hash1, score1), (hash2, score2)) = (first, second);
    if hash1 != hash2 || score1 != score2 {
        bail!(
            "determinism check failed: hash1={hash1:#018x} score1={score1} \
             != hash2={hash2:#018x} score2={score2}"
        );
    }
    Ok(())
}

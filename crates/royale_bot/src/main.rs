//! Royale queen bot.
//!
//! Reads the game referee's snapshots on stdin and answers with two
//! command lines per turn on stdout.
//!
//! # Usage
//!
//! ```bash
//! # Play (default)
//! cargo run -p royale_bot
//!
//! # Play with a tuning override
//! cargo run -p royale_bot -- --tuning aggressive.ron
//!
//! # Feed a recorded transcript through the engine
//! cargo run -p royale_bot -- replay --file match.txt
//!
//! # Print the effective tuning
//! cargo run -p royale_bot -- tuning
//! ```
//!
//! Logs go to stderr; `RUST_LOG` overrides the level chosen by `--verbose`.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use royale_bot::runner::BotRunner;
use royale_core::tuning::Tuning;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "royale_bot")]
#[command(about = "Queen bot speaking the snapshot line protocol")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// RON file overriding the built-in tuning
    #[arg(short, long, global = true)]
    tuning: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one match on stdin/stdout
    Play,

    /// Run a recorded transcript and print the commands
    Replay {
        /// Transcript file: startup block followed by turn blocks
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Print the effective tuning as RON
    Tuning,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging to stderr (stdout is for protocol)
    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(false),
        )
        .with(filter)
        .init();

    let tuning = load_tuning(cli.tuning.as_ref());

    match cli.command {
        Some(Commands::Replay { file }) => cmd_replay(&file, tuning),
        Some(Commands::Tuning) => cmd_tuning(&tuning),
        Some(Commands::Play) | None => cmd_play(tuning),
    }
}

fn load_tuning(path: Option<&PathBuf>) -> Tuning {
    let Some(path) = path else {
        return Tuning::default();
    };
    match Tuning::load(path) {
        Ok(tuning) => {
            tracing::info!("Loaded tuning from {}", path.display());
            tuning
        }
        Err(e) => {
            tracing::error!("Failed to load tuning: {}", e);
            std::process::exit(1);
        }
    }
}

/// Play against the referee on stdin/stdout.
fn cmd_play(tuning: Tuning) {
    tracing::info!("Starting match");

    let stdin = io::stdin();
    let stdout = io::stdout();
    if let Err(e) = BotRunner::new(tuning).run(stdin.lock(), stdout.lock()) {
        tracing::error!("Match aborted: {}", e);
        std::process::exit(1);
    }
}

/// Run a transcript file through the engine.
fn cmd_replay(file: &PathBuf, tuning: Tuning) {
    tracing::info!("Replaying {}", file.display());

    let input = match File::open(file) {
        Ok(f) => BufReader::new(f),
        Err(e) => {
            tracing::error!("Failed to open {}: {}", file.display(), e);
            std::process::exit(1);
        }
    };

    match BotRunner::new(tuning).run(input, io::stdout().lock()) {
        Ok(summary) => {
            for (rule, count) in &summary.rules {
                tracing::info!("  {:<16} {}", rule, count);
            }
        }
        Err(e) => {
            tracing::error!("Replay failed: {}", e);
            std::process::exit(1);
        }
    }
}

/// Print the tuning in effect.
fn cmd_tuning(tuning: &Tuning) {
    match tuning.to_ron_string() {
        Ok(text) => println!("{text}"),
        Err(e) => {
            tracing::error!("Failed to serialize tuning: {}", e);
            std::process::exit(1);
        }
    }
}

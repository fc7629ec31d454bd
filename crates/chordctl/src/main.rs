//! chordctl - command-line chord analysis
//!
//! Subcommands:
//! - `chordctl analyze <pitches...>` - Identify and describe a chord
//! - `chordctl arp <pitches...>` - Walk the chord as an arpeggio

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "chordctl")]
#[command(about = "Chord analysis from the command line")]
#[command(version)]
struct Cli {
    /// Explicit config file (overrides the local chordscope.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Identify a chord from absolute pitches (MIDI note numbers)
    Analyze {
        /// Sounding pitches, e.g. 60 64 67
        #[arg(required = true)]
        pitches: Vec<i32>,

        /// Resolve this candidate instead of the top-ranked one
        #[arg(short, long, default_value = "0")]
        option: usize,

        /// Treat the lowest note as the root (no inversion detection)
        #[arg(long)]
        bass_root: bool,

        /// Strict diatonic spelling (keeps double accidentals)
        #[arg(long)]
        strict: bool,

        /// Emit the full response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print an arpeggio walk over the identified chord
    Arp {
        /// Sounding pitches, e.g. 60 64 67
        #[arg(required = true)]
        pitches: Vec<i32>,

        /// Number of arpeggio steps to print
        #[arg(short, long, default_value = "8")]
        steps: i64,

        /// Walk downward from the bass instead of upward
        #[arg(long)]
        down: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = scopeconf::ScopeConfig::load_from(cli.config.as_deref())?;

    // RUST_LOG wins; the config file supplies the default level.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.telemetry.log_level)),
        )
        .init();

    match cli.command {
        Commands::Analyze {
            pitches,
            option,
            bass_root,
            strict,
            json,
        } => {
            commands::analyze(&config, pitches, option, bass_root, strict, json)?;
        }
        Commands::Arp {
            pitches,
            steps,
            down,
        } => {
            commands::arp(&config, pitches, steps, down)?;
        }
    }

    Ok(())
}

//! Command line arguments.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// What the application does with tracked faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Head circles, crosshairs and distance read-out
    Detector,
    /// Pong against an AI opponent
    #[value(name = "single")]
    SinglePlayer,
    /// Pong for two players side by side
    #[value(name = "two")]
    TwoPlayer,
}

/// Multi-target head tracker with head-controlled Pong
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Application mode (detector, single, two)
    #[arg(short, long, value_enum, default_value = "detector")]
    pub mode: Mode,

    /// Replay a recorded landmark stream (YAML) instead of a live provider
    #[arg(short, long)]
    pub replay: Option<PathBuf>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Override the assignment policy (positional, nearest_centroid)
    #[arg(short, long)]
    pub assignment: Option<String>,

    /// Seed for serve angles
    #[arg(long)]
    pub seed: Option<u64>,

    /// Start the game as soon as the players are ready
    #[arg(long)]
    pub autostart: bool,

    /// Capture frames on a separate thread
    #[arg(long)]
    pub threaded_capture: bool,

    /// Enable debug output
    #[arg(short, long)]
    pub debug: bool,
}

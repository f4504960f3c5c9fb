//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "linesim", version, about = "Line-follower robot simulator")]
pub struct Cli {
    /// Path to config TOML
    #[arg(long, value_name = "FILE", default_value = "etc/linesim.toml")]
    pub config: PathBuf,

    /// Emit JSON lines (stdout records, stderr logs) instead of text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); overrides [logging] level
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Drive the robot around a layout
    Run {
        /// Number of ticks; defaults to simulation.ticks
        #[arg(long, value_name = "N")]
        ticks: Option<u64>,
        /// Built-in layout (oval, cross, gap); defaults to simulation.layout
        #[arg(long, value_name = "NAME")]
        layout: Option<String>,
    },
    /// Read a single light sensor at a world point
    Probe {
        #[arg(long, allow_negative_numbers = true)]
        x: f64,
        #[arg(long, allow_negative_numbers = true)]
        y: f64,
        /// Sensor radius; defaults to the first configured sensor
        #[arg(long)]
        radius: Option<f64>,
        #[arg(long, value_name = "NAME")]
        layout: Option<String>,
    },
    /// Validate the config and build every component without running
    SelfCheck,
}

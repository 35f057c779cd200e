//! Command line definition.

use std::path::PathBuf;

use cbmap_shared::MissingPropertyPolicy;
use clap::{Parser, Subcommand, ValueEnum};

/// Missing property handling selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Fail when a placeholder names an absent property.
    Error,
    /// Substitute an empty string.
    Blank,
}

impl From<PolicyArg> for MissingPropertyPolicy {
    fn from(value: PolicyArg) -> Self {
        match value {
            PolicyArg::Error => MissingPropertyPolicy::Error,
            PolicyArg::Blank => MissingPropertyPolicy::Blank,
        }
    }
}

/// Top-level arguments.
#[derive(Parser)]
#[command(name = "cbmap-cli", version, about = "Map config authoring tools")]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Parse and validate a map config.
    Check {
        /// Map config JSON file.
        #[arg(long)]
        config: PathBuf,
    },
    /// Preview the popup shown for a feature of one layer.
    Popup {
        /// Map config JSON file.
        #[arg(long)]
        config: PathBuf,
        /// Id of the clicked layer.
        #[arg(long)]
        layer: String,
        /// GeoJSON feature (or bare properties object) JSON file.
        #[arg(long)]
        feature: PathBuf,
        /// Missing property handling (defaults to the config's setting).
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,
        /// Print the popup HTML instead of plain lines.
        #[arg(long)]
        html: bool,
    },
}

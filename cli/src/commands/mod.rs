pub mod check;
pub mod popup;

use anyhow::Result;

use crate::cli::{Cli, Commands};

/// Dispatches a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Check { config } => check::run(&config),
        Commands::Popup {
            config,
            layer,
            feature,
            policy,
            html,
        } => popup::run(&config, &layer, &feature, policy.map(Into::into), html),
    }
}

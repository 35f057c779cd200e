use std::path::Path;

use anyhow::{bail, Result};

use crate::utils::load_config;

pub fn run(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let issues = config.validate();

    if issues.is_empty() {
        tracing::info!(
            sources = config.sources.len(),
            layers = config.layers.len(),
            popups = config.interactive_layers().count(),
            "{} is valid",
            config_path.display()
        );
        return Ok(());
    }

    for issue in &issues {
        tracing::error!("{issue}");
    }
    bail!("{} has {} problem(s)", config_path.display(), issues.len())
}

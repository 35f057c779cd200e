use std::path::Path;

use anyhow::{anyhow, Context, Result};
use cbmap_shared::{feature_properties, MapConfig, MissingPropertyPolicy};
use serde_json::Value;

use crate::utils::{load_config, read_json};

pub fn run(
    config_path: &Path,
    layer: &str,
    feature_path: &Path,
    policy: Option<MissingPropertyPolicy>,
    html: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let issues = config.validate();
    if !issues.is_empty() {
        tracing::warn!(
            count = issues.len(),
            "config has problems; run `check` for details"
        );
    }

    let feature = read_json(feature_path)?;
    let output = render(&config, layer, &feature, policy, html)?;
    println!("{output}");
    Ok(())
}

/// Renders the popup a click on `feature` in `layer` would open.
pub fn render(
    config: &MapConfig,
    layer: &str,
    feature: &Value,
    policy: Option<MissingPropertyPolicy>,
    html: bool,
) -> Result<String> {
    let template = config
        .layer(layer)
        .ok_or_else(|| anyhow!("no layer named `{layer}`"))?
        .popup
        .as_ref()
        .ok_or_else(|| anyhow!("layer `{layer}` has no popup"))?;
    let properties = feature_properties(feature)
        .ok_or_else(|| anyhow!("feature must be a JSON object with properties"))?;

    let missing = template.missing_properties(properties);
    if !missing.is_empty() {
        tracing::warn!(
            layer,
            missing = missing.join(", "),
            "feature lacks properties referenced by the popup"
        );
    }

    let policy = policy.unwrap_or(config.missing_property);
    let content = template
        .render(properties, policy)
        .with_context(|| format!("failed to render popup for layer `{layer}`"))?;

    if html {
        return Ok(content.to_html());
    }

    let mut lines = vec![content.title];
    lines.extend(content.subtitle);
    lines.extend(content.properties);
    Ok(lines.join("\n"))
}

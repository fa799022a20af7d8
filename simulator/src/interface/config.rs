use std::path::Path;

use anyhow::Context;
use ocppsim_client::v16::ChargePointConfig;

/// Reads `path` when it exists. A missing file is only an error when the
/// caller asked for it explicitly.
pub fn load_config(path: &Path, required: bool) -> anyhow::Result<ChargePointConfig> {
    if !path.exists() {
        if required {
            anyhow::bail!("configuration file not found: {}", path.display());
        }
        log::warn!("{} not found, using defaults", path.display());
        return Ok(ChargePointConfig::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid configuration in {}", path.display()))
}

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use pageflow_core::AppConfig;

pub fn run(config: &AppConfig, path: Option<&Path>, default: bool, write: bool) -> Result<()> {
    let defaults = AppConfig::default();
    let shown = if default { &defaults } else { config };

    if write {
        let target = path
            .map(Path::to_path_buf)
            .unwrap_or_else(AppConfig::config_path);
        shown
            .save_to(&target)
            .with_context(|| format!("Failed to write config to {}", target.display()))?;
        info!(path = %target.display(), "Configuration written");
        println!("Wrote {}", target.display());
        return Ok(());
    }

    if default {
        print!("{}", shown.to_toml()?);
        return Ok(());
    }

    let location = match path {
        Some(path) => path.display().to_string(),
        None if AppConfig::config_path().exists() => AppConfig::config_path().display().to_string(),
        None => format!("{} (not found, using defaults)", AppConfig::config_path().display()),
    };

    println!("# {}", location);
    print!("{}", shown.to_toml()?);

    Ok(())
}

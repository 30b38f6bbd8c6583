use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::config::AppConfig;
use crate::core::error::ConfigError;

fn resolve_path(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf)
        .unwrap_or_else(AppConfig::default_path)
}

/// Write the template config, refusing to clobber an existing file.
pub fn init(path: Option<&Path>) -> Result<()> {
    let path = resolve_path(path);
    if path.exists() {
        eprintln!("Config file already exists at {}", path.display());
        eprintln!("Remove it first if you want to regenerate.");
        std::process::exit(1);
    }

    AppConfig::write_template(&path)?;
    println!("Generated config at {}", path.display());
    println!("Edit it to add your API keys and enable providers.");
    Ok(())
}

/// Load and validate the config, printing every issue found.
pub fn check(path: Option<&Path>) -> Result<()> {
    let resolved = resolve_path(path);
    let config = match AppConfig::load(path) {
        Ok(config) => config,
        Err(ConfigError::NotFound(_)) => {
            eprintln!("No config file found at {}", resolved.display());
            eprintln!("Run `plantrack config init` to create one.");
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    let issues = config.validate();
    if issues.is_empty() {
        let enabled = config.enabled_providers().len();
        println!("Config OK: {} provider(s) enabled.", enabled);
    } else {
        eprintln!("Config has {} issue(s):", issues.len());
        for issue in &issues {
            eprintln!("  - {}", issue);
        }
        std::process::exit(1);
    }
    Ok(())
}

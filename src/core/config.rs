use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::error::ConfigError;
use crate::core::providers::Provider;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_format")]
    pub default_format: String,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_format() -> String {
    "text".to_string()
}
fn default_color() -> String {
    "auto".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_format: default_format(),
            color: default_color(),
        }
    }
}

/// One configured provider. Entries keep their file order, which is also the
/// order results come back in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub id: String,
    pub api_key: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
}

/// Example config, printed to stderr when no config file exists and written
/// by `config init`.
pub const TEMPLATE: &str = r#"[settings]
default_format = "text"   # text | json
color = "auto"            # auto | always | never

[[providers]]
id = "kimi"
api_key = "your-api-key"
enabled = true

[[providers]]
id = "bigmodel"
api_key = "your-access-key"
enabled = false
"#;

impl AppConfig {
    /// Default config file path, respecting XDG_CONFIG_HOME.
    pub fn default_path() -> PathBuf {
        let config_dir = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("~"))
                    .join(".config")
            });
        config_dir.join("plantrack").join("config.toml")
    }

    /// Load from an explicit path, or the default path when none is given.
    /// A missing file is an error here; callers decide how loudly to fail.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Err(ConfigError::NotFound(path));
        }
        let content = std::fs::read_to_string(&path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Write the template config to `path`, creating parent directories.
    pub fn write_template(path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, TEMPLATE)
    }

    /// Providers that should actually be fetched.
    pub fn enabled_providers(&self) -> Vec<ProviderConfig> {
        self.providers.iter().filter(|p| p.enabled).cloned().collect()
    }

    /// Collect human-readable config issues; empty means valid.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if !["text", "json"].contains(&self.settings.default_format.as_str()) {
            issues.push(format!(
                "Invalid default_format: '{}' (must be 'text' or 'json')",
                self.settings.default_format
            ));
        }
        if !["auto", "always", "never"].contains(&self.settings.color.as_str()) {
            issues.push(format!(
                "Invalid color: '{}' (must be 'auto', 'always', or 'never')",
                self.settings.color
            ));
        }
        for p in &self.providers {
            if Provider::from_id(&p.id).is_none() {
                issues.push(format!("Unknown provider ID: '{}'", p.id));
            }
            if p.api_key.trim().is_empty() {
                issues.push(format!("Provider '{}': api_key is empty", p.id));
            }
        }
        issues
    }
}

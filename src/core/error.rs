use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to read config: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Per-provider failure. Contained at the aggregator boundary; a failing
/// provider never aborts its siblings.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("unknown provider: '{0}'")]
    UnknownProvider(String),
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("HTTP {status} from {url}: {body}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("malformed {provider} response: {source}")]
    Validation {
        provider: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{provider} fetch task failed: {reason}")]
    Task { provider: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_provider_message_names_the_id() {
        let err = ProviderError::UnknownProvider("copilot".to_string());
        assert_eq!(err.to_string(), "unknown provider: 'copilot'");
    }

    #[test]
    fn config_not_found_message_includes_path() {
        let err = ConfigError::NotFound(PathBuf::from("/tmp/missing.toml"));
        assert!(err.to_string().contains("/tmp/missing.toml"));
    }
}

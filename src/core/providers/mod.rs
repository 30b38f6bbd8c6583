pub mod bigmodel;
pub mod fetch;
pub mod kimi;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::ProviderError;
use crate::core::models::usage::UsageInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    Kimi,
    BigModel,
}

impl Provider {
    pub fn from_id(id: &str) -> Option<Self> {
        match id.to_lowercase().as_str() {
            "kimi" => Some(Self::Kimi),
            "bigmodel" | "big-model" | "zhipu" => Some(Self::BigModel),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Kimi => "kimi",
            Self::BigModel => "bigmodel",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Kimi => "Kimi",
            Self::BigModel => "BigModel",
        }
    }

    /// All provider variants in display order.
    pub fn all() -> &'static [Provider] {
        &[Provider::Kimi, Provider::BigModel]
    }
}

/// One usage-API vendor. Implementations are constructed per fetch cycle via
/// [`build`] and used by exactly one logical fetch, so no shared state.
///
/// `authenticate` must run before `fetch_usage`; it only populates request
/// headers and never touches the network. `parse_usage` is pure and must
/// tolerate any well-formed JSON that merely lacks optional fields.
#[async_trait]
pub trait UsageProvider: Send + Sync {
    fn name(&self) -> &'static str;
    fn authenticate(&mut self);
    async fn fetch_usage(&self) -> Result<Value, ProviderError>;
    fn parse_usage(&self, raw: &Value) -> Result<UsageInfo, ProviderError>;
}

/// Constructor lookup: adding a vendor means one new arm here and one new
/// module, nothing in the aggregator changes.
pub fn build(id: &str, api_key: &str) -> Result<Box<dyn UsageProvider>, ProviderError> {
    match Provider::from_id(id) {
        Some(Provider::Kimi) => Ok(Box::new(kimi::KimiProvider::new(api_key))),
        Some(Provider::BigModel) => Ok(Box::new(bigmodel::BigModelProvider::new(api_key))),
        None => Err(ProviderError::UnknownProvider(id.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_id_accepts_aliases() {
        assert_eq!(Provider::from_id("kimi"), Some(Provider::Kimi));
        assert_eq!(Provider::from_id("KIMI"), Some(Provider::Kimi));
        assert_eq!(Provider::from_id("bigmodel"), Some(Provider::BigModel));
        assert_eq!(Provider::from_id("zhipu"), Some(Provider::BigModel));
        assert_eq!(Provider::from_id("cursor"), None);
    }

    #[test]
    fn id_round_trips() {
        for p in Provider::all() {
            assert_eq!(Provider::from_id(p.id()), Some(*p));
        }
    }

    #[test]
    fn build_unknown_provider_errors() {
        let Err(err) = build("copilot", "key") else {
            panic!("expected UnknownProvider error");
        };
        assert!(matches!(
            err,
            ProviderError::UnknownProvider(ref id) if id == "copilot"
        ));
    }

    #[test]
    fn build_known_providers() {
        assert_eq!(build("kimi", "k").unwrap().name(), "kimi");
        assert_eq!(build("bigmodel", "k").unwrap().name(), "bigmodel");
    }
}

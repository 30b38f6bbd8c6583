use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Consumption attributed to one sub-resource (e.g. a single model) inside a
/// limit window. Only some providers break usage down this far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageDetail {
    pub model_code: String,
    pub usage: i64,
}

/// One rate/quota window, normalized across providers.
///
/// Quantities are carried as decimal-integer text because the upstream APIs
/// mix numeric and string representations; conversion to numbers happens only
/// at display time (`formatter::percentage`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitDetail {
    /// Window length in `time_unit` units; 0 when no window applies.
    pub duration: u64,
    /// Provider-defined unit name, or the sentinel `TOKENS_LIMIT` for a
    /// lifetime cap with no time window.
    pub time_unit: String,
    pub limit: String,
    pub used: String,
    pub remaining: String,
    /// Next reset instant, when the provider reports one.
    pub resets_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub usage_details: Vec<UsageDetail>,
}

/// Normalized usage for one provider, built once per fetch cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageInfo {
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub membership_level: Option<String>,
    /// Zero or more limit windows. Empty means "no limit data available",
    /// which renders differently from a fetch error.
    pub limits: Vec<LimitDetail>,
    /// Untouched provider payload, kept for diagnostics.
    #[serde(skip_serializing, default)]
    pub raw_response: serde_json::Value,
}

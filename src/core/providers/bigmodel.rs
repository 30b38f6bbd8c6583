use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::core::error::ProviderError;
use crate::core::models::usage::{LimitDetail, UsageDetail, UsageInfo};
use crate::core::providers::fetch::get_json;
use crate::core::providers::UsageProvider;

const QUOTA_URL: &str = "https://open.bigmodel.cn/api/monitor/usage/quota/limit";

#[derive(Deserialize)]
struct RawUsageDetail {
    #[serde(rename = "modelCode", default)]
    model_code: String,
    #[serde(default)]
    usage: i64,
}

#[derive(Deserialize)]
struct RawLimit {
    // "TOKENS_LIMIT" or "TIME_LIMIT"; both normalize the same way.
    #[serde(rename = "type", default)]
    #[allow(dead_code)]
    limit_type: String,
    #[serde(default)]
    unit: i64,
    #[serde(default = "default_number")]
    number: u64,
    usage: Option<serde_json::Number>,
    #[serde(rename = "currentValue")]
    current_value: Option<serde_json::Number>,
    remaining: Option<serde_json::Number>,
    #[serde(rename = "nextResetTime")]
    next_reset_time: Option<i64>,
    #[serde(rename = "usageDetails", default)]
    usage_details: Vec<RawUsageDetail>,
}

fn default_number() -> u64 {
    1
}

#[derive(Deserialize, Default)]
struct RawData {
    #[serde(default)]
    limits: Vec<RawLimit>,
    level: Option<String>,
}

#[derive(Deserialize, Default)]
struct BigModelResponse {
    data: Option<RawData>,
}

/// Unit-code vocabulary from the quota API. Total over all integers:
/// unmapped codes come back as "unit_<code>" instead of failing.
fn unit_name(unit: i64) -> String {
    match unit {
        1 => "second".to_string(),
        2 => "minute".to_string(),
        3 => "hour".to_string(),
        4 => "day".to_string(),
        5 => "month".to_string(),
        6 => "year".to_string(),
        other => format!("unit_{}", other),
    }
}

/// Epoch milliseconds to UTC; absent or zero means "no reset known".
fn parse_reset_time(timestamp_ms: Option<i64>) -> Option<DateTime<Utc>> {
    match timestamp_ms {
        None | Some(0) => None,
        Some(ms) => DateTime::from_timestamp_millis(ms),
    }
}

fn quantity(value: &Option<serde_json::Number>) -> String {
    value
        .as_ref()
        .map(|n| n.to_string())
        .unwrap_or_else(|| "0".to_string())
}

fn parse_limit(raw: &RawLimit) -> LimitDetail {
    let usage_details = raw
        .usage_details
        .iter()
        .map(|d| UsageDetail {
            model_code: d.model_code.clone(),
            usage: d.usage,
        })
        .collect();

    LimitDetail {
        duration: raw.number,
        time_unit: unit_name(raw.unit),
        limit: quantity(&raw.usage),
        used: quantity(&raw.current_value),
        remaining: quantity(&raw.remaining),
        resets_at: parse_reset_time(raw.next_reset_time),
        usage_details,
    }
}

pub struct BigModelProvider {
    api_key: String,
    headers: Vec<(&'static str, String)>,
}

impl BigModelProvider {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            headers: Vec::new(),
        }
    }
}

#[async_trait]
impl UsageProvider for BigModelProvider {
    fn name(&self) -> &'static str {
        "bigmodel"
    }

    fn authenticate(&mut self) {
        self.headers = vec![
            ("Authorization", format!("Bearer {}", self.api_key)),
            ("Content-Type", "application/json".to_string()),
        ];
    }

    async fn fetch_usage(&self) -> Result<Value, ProviderError> {
        get_json(QUOTA_URL, &self.headers).await
    }

    fn parse_usage(&self, raw: &Value) -> Result<UsageInfo, ProviderError> {
        let data: BigModelResponse =
            serde_json::from_value(raw.clone()).map_err(|source| ProviderError::Validation {
                provider: "bigmodel",
                source,
            })?;

        let data = data.data.unwrap_or_default();
        let limits = data.limits.iter().map(parse_limit).collect();

        Ok(UsageInfo {
            provider: self.name().to_string(),
            // The quota endpoint carries no user identifier.
            user_id: None,
            membership_level: data.level,
            limits,
            raw_response: raw.clone(),
        })
    }
}

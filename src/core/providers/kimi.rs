use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::core::error::ProviderError;
use crate::core::models::usage::{LimitDetail, UsageInfo};
use crate::core::providers::fetch::get_json;
use crate::core::providers::UsageProvider;

const USAGE_URL: &str = "https://api.kimi.com/coding/v1/usages";

#[derive(Deserialize, Default)]
struct Membership {
    level: Option<String>,
}

#[derive(Deserialize, Default)]
struct User {
    #[serde(rename = "userId")]
    user_id: Option<String>,
    membership: Option<Membership>,
}

#[derive(Deserialize, Default)]
struct Window {
    #[serde(default)]
    duration: u64,
    #[serde(rename = "timeUnit", default)]
    time_unit: String,
}

#[derive(Deserialize, Default)]
struct WindowDetail {
    #[serde(default)]
    limit: String,
    #[serde(default)]
    used: String,
    #[serde(default)]
    remaining: String,
    #[serde(rename = "resetTime")]
    reset_time: Option<String>,
}

#[derive(Deserialize)]
struct LimitEntry {
    window: Option<Window>,
    detail: Option<WindowDetail>,
}

#[derive(Deserialize, Default)]
struct KimiResponse {
    user: Option<User>,
    limits: Option<Vec<LimitEntry>>,
}

/// ISO-8601 with a `Z` suffix, e.g. "2026-02-06T08:31:59.863136Z".
/// Absent, empty, or unparseable strings yield None.
fn parse_reset_time(value: Option<&str>) -> Option<DateTime<Utc>> {
    value.and_then(|s| s.parse::<DateTime<Utc>>().ok())
}

fn parse_limit(entry: &LimitEntry) -> LimitDetail {
    let window = entry.window.as_ref();
    let detail = entry.detail.as_ref();
    LimitDetail {
        duration: window.map(|w| w.duration).unwrap_or(0),
        // Left in the provider's raw enumerated form (e.g. TIME_UNIT_MINUTE);
        // the formatter strips the prefix at display time.
        time_unit: window.map(|w| w.time_unit.clone()).unwrap_or_default(),
        limit: detail.map(|d| d.limit.clone()).unwrap_or_default(),
        used: detail.map(|d| d.used.clone()).unwrap_or_default(),
        remaining: detail.map(|d| d.remaining.clone()).unwrap_or_default(),
        resets_at: detail.and_then(|d| parse_reset_time(d.reset_time.as_deref())),
        usage_details: vec![],
    }
}

pub struct KimiProvider {
    api_key: String,
    headers: Vec<(&'static str, String)>,
}

impl KimiProvider {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            headers: Vec::new(),
        }
    }
}

#[async_trait]
impl UsageProvider for KimiProvider {
    fn name(&self) -> &'static str {
        "kimi"
    }

    fn authenticate(&mut self) {
        self.headers = vec![
            ("Authorization", format!("Bearer {}", self.api_key)),
            ("Content-Type", "application/json".to_string()),
        ];
    }

    async fn fetch_usage(&self) -> Result<Value, ProviderError> {
        get_json(USAGE_URL, &self.headers).await
    }

    fn parse_usage(&self, raw: &Value) -> Result<UsageInfo, ProviderError> {
        let data: KimiResponse =
            serde_json::from_value(raw.clone()).map_err(|source| ProviderError::Validation {
                provider: "kimi",
                source,
            })?;

        let user = data.user.unwrap_or_default();
        let limits = data
            .limits
            .unwrap_or_default()
            .iter()
            .map(parse_limit)
            .collect();

        Ok(UsageInfo {
            provider: self.name().to_string(),
            user_id: user.user_id,
            membership_level: user.membership.and_then(|m| m.level),
            limits,
            raw_response: raw.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_response() -> Value {
        serde_json::json!({
            "user": {
                "userId": "11111111111111111111",
                "region": "REGION_CN",
                "membership": {
                    "level": "LEVEL_TRIAL"
                },
                "businessId": ""
            },
            "usage": {
                "limit": "100",
                "used": "13",
                "remaining": "87",
                "resetTime": "2026-02-06T08:31:59.863136Z"
            },
            "limits": [
                {
                    "window": {
                        "duration": 300,
                        "timeUnit": "TIME_UNIT_MINUTE"
                    },
                    "detail": {
                        "limit": "100",
                        "used": "65",
                        "remaining": "35",
                        "resetTime": "2026-01-30T13:31:59.863136Z"
                    }
                }
            ]
        })
    }

    #[test]
    fn authenticate_sets_bearer_headers() {
        let mut provider = KimiProvider::new("test-key");
        provider.authenticate();
        assert_eq!(
            provider.headers,
            vec![
                ("Authorization", "Bearer test-key".to_string()),
                ("Content-Type", "application/json".to_string()),
            ]
        );
    }

    #[test]
    fn parse_usage_full_response() {
        let provider = KimiProvider::new("k");
        let raw = sample_response();
        let usage = provider.parse_usage(&raw).unwrap();

        assert_eq!(usage.provider, "kimi");
        assert_eq!(usage.user_id.as_deref(), Some("11111111111111111111"));
        assert_eq!(usage.membership_level.as_deref(), Some("LEVEL_TRIAL"));
        assert_eq!(usage.raw_response, raw);

        assert_eq!(usage.limits.len(), 1);
        let limit = &usage.limits[0];
        assert_eq!(limit.duration, 300);
        assert_eq!(limit.time_unit, "TIME_UNIT_MINUTE");
        assert_eq!(limit.limit, "100");
        assert_eq!(limit.used, "65");
        assert_eq!(limit.remaining, "35");
        let expected: DateTime<Utc> = "2026-01-30T13:31:59.863136+00:00".parse().unwrap();
        assert_eq!(limit.resets_at, Some(expected));
    }

    #[test]
    fn parse_reset_time_z_suffix_is_utc() {
        let parsed = parse_reset_time(Some("2026-02-06T08:31:59.863136Z")).unwrap();
        assert_eq!(parsed.timestamp(), 1770366719);
        assert_eq!(parsed.timestamp_subsec_micros(), 863136);
    }

    #[test]
    fn parse_reset_time_absent_or_empty_is_none() {
        assert!(parse_reset_time(None).is_none());
        assert!(parse_reset_time(Some("")).is_none());
        assert!(parse_reset_time(Some("not-a-date")).is_none());
    }

    #[test]
    fn parse_usage_empty_object_degrades_to_defaults() {
        let provider = KimiProvider::new("k");
        let usage = provider.parse_usage(&serde_json::json!({})).unwrap();
        assert_eq!(usage.provider, "kimi");
        assert!(usage.user_id.is_none());
        assert!(usage.membership_level.is_none());
        assert!(usage.limits.is_empty());
    }

    #[test]
    fn parse_usage_entry_without_detail() {
        let provider = KimiProvider::new("k");
        let raw = serde_json::json!({
            "limits": [
                {"window": {"duration": 5, "timeUnit": "TIME_UNIT_HOUR"}}
            ]
        });
        let usage = provider.parse_usage(&raw).unwrap();
        assert_eq!(usage.limits.len(), 1);
        let limit = &usage.limits[0];
        assert_eq!(limit.duration, 5);
        assert_eq!(limit.time_unit, "TIME_UNIT_HOUR");
        assert_eq!(limit.limit, "");
        assert!(limit.resets_at.is_none());
    }

    #[test]
    fn parse_usage_wrong_shape_is_validation_error() {
        let provider = KimiProvider::new("k");
        let raw = serde_json::json!({"limits": "not-an-array"});
        let err = provider.parse_usage(&raw).unwrap_err();
        assert!(matches!(err, ProviderError::Validation { provider: "kimi", .. }));
    }
}

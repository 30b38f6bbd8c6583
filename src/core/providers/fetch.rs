use serde_json::Value;

use crate::core::config::ProviderConfig;
use crate::core::error::ProviderError;
use crate::core::models::usage::UsageInfo;
use crate::core::providers::build;

/// Result of one provider's fetch pipeline, keyed by the configured id.
pub struct ProviderOutcome {
    pub id: String,
    pub result: Result<UsageInfo, ProviderError>,
}

/// GET a JSON document with bearer-auth headers.
///
/// Connection-level failures map to `Transport`, non-2xx responses to
/// `HttpStatus` with the body attached. Exactly one request, no retry.
pub async fn get_json(url: &str, headers: &[(&'static str, String)]) -> Result<Value, ProviderError> {
    let client = reqwest::Client::new();
    let mut request = client.get(url);
    for (name, value) in headers {
        request = request.header(*name, value);
    }

    let response = request.send().await.map_err(|source| ProviderError::Transport {
        url: url.to_string(),
        source,
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::HttpStatus {
            url: url.to_string(),
            status,
            body,
        });
    }

    response
        .json::<Value>()
        .await
        .map_err(|source| ProviderError::Transport {
            url: url.to_string(),
            source,
        })
}

/// Run one provider's full pipeline: construct, authenticate, fetch, parse.
pub async fn fetch_one(id: &str, api_key: &str) -> Result<UsageInfo, ProviderError> {
    let mut provider = build(id, api_key)?;
    provider.authenticate();
    let raw = provider.fetch_usage().await?;
    provider.parse_usage(&raw)
}

/// Fan out to every configured provider concurrently and wait for all of
/// them. Outcomes come back in the input order, not completion order, and a
/// failing provider never aborts its siblings; this function itself cannot
/// fail.
pub async fn fetch_all(entries: &[ProviderConfig]) -> Vec<ProviderOutcome> {
    let handles: Vec<(String, tokio::task::JoinHandle<Result<UsageInfo, ProviderError>>)> = entries
        .iter()
        .map(|entry| {
            let id = entry.id.clone();
            let api_key = entry.api_key.clone();
            let task_id = id.clone();
            let handle = tokio::spawn(async move { fetch_one(&task_id, &api_key).await });
            (id, handle)
        })
        .collect();

    let mut outcomes = Vec::with_capacity(handles.len());
    for (id, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(ProviderError::Task {
                provider: id.clone(),
                reason: e.to_string(),
            }),
        };
        outcomes.push(ProviderOutcome { id, result });
    }
    outcomes
}

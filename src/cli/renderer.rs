use colored::{control, Colorize};

use crate::core::formatter::{
    format_reset_countdown, format_reset_datetime, format_usage_bar, percentage, window_label,
};
use crate::core::models::usage::{LimitDetail, UsageInfo};
use crate::core::providers::fetch::ProviderOutcome;
use crate::core::providers::Provider;

const BAR_WIDTH: usize = 12;

fn pad(label: &str) -> String {
    format!("{:<12}", label)
}

fn display_name(id: &str) -> String {
    Provider::from_id(id)
        .map(|p| p.display_name().to_string())
        .unwrap_or_else(|| id.to_string())
}

/// Render a full provider block as a colored (or plain) string.
///
/// Layout:
/// ```text
///  Kimi
///   Account      11111111111111111111
///   Plan         LEVEL_TRIAL
///   300 minute   65% used [████████░░░░] 65/100 (35 left)
///                Resets in 2h 15m (2026-01-30 14:31:59 +01:00)
/// ```
pub fn render_provider(usage: &UsageInfo, use_color: bool) -> String {
    control::set_override(use_color);

    let mut lines: Vec<String> = Vec::new();
    lines.push(format!(" {}", display_name(&usage.provider)).bold().to_string());

    if let Some(user_id) = usage.user_id.as_deref().filter(|s| !s.is_empty()) {
        lines.push(format!("  {} {}", pad("Account").cyan(), user_id));
    }
    if let Some(level) = usage.membership_level.as_deref().filter(|s| !s.is_empty()) {
        lines.push(format!("  {} {}", pad("Plan").cyan(), level));
    }

    if usage.limits.is_empty() {
        // Distinct from a fetch error: the provider answered, just with no
        // limit data.
        lines.push("  No limit data available.".to_string());
    } else {
        for limit in &usage.limits {
            render_limit(&mut lines, limit);
        }
    }

    control::unset_override();
    lines.join("\n")
}

fn render_limit(lines: &mut Vec<String>, limit: &LimitDetail) {
    let label = window_label(limit);
    let quantities = if limit.limit.is_empty() && limit.used.is_empty() {
        String::new()
    } else {
        format!(" {}/{} ({} left)", limit.used, limit.limit, limit.remaining)
    };

    let line = match percentage(&limit.used, &limit.limit) {
        Some(pct) => format!(
            "  {} {}% used {}{}",
            pad(&label).cyan(),
            pct,
            format_usage_bar(pct, BAR_WIDTH),
            quantities
        ),
        None => format!("  {}{}", pad(&label).cyan(), quantities),
    };
    lines.push(line);

    if let Some(resets_at) = &limit.resets_at {
        lines.push(format!(
            "  {} {} ({})",
            pad(""),
            format_reset_countdown(resets_at),
            format_reset_datetime(resets_at)
        ));
    }

    for detail in &limit.usage_details {
        lines.push(format!("  {}   {} {}", pad(""), detail.model_code.dimmed(), detail.usage));
    }
}

/// Render one failed provider as an error block.
pub fn render_error(id: &str, message: &str, use_color: bool) -> String {
    control::set_override(use_color);
    let header = format!(" {} (error)", display_name(id)).bold().to_string();
    let body = format!("  {}", message).red().to_string();
    control::unset_override();
    format!("{}\n{}", header, body)
}

fn colorize_percent(pct: i64) -> String {
    let value = format!("{}%", pct);
    if pct >= 90 {
        value.red().to_string()
    } else if pct >= 70 {
        value.yellow().to_string()
    } else {
        value.green().to_string()
    }
}

/// Compact one-line status string, one segment per provider with every
/// computable limit percentage joined by "/":
/// "kimi 65%/12% | bigmodel 92% | zai !". Providers with no computable
/// percentage show "-", failed providers show "!".
pub fn render_status_line(outcomes: &[ProviderOutcome], use_color: bool) -> String {
    control::set_override(use_color);

    let segments: Vec<String> = outcomes
        .iter()
        .map(|outcome| match &outcome.result {
            Ok(usage) => {
                let percentages: Vec<String> = usage
                    .limits
                    .iter()
                    .filter_map(|l| percentage(&l.used, &l.limit))
                    .map(colorize_percent)
                    .collect();
                if percentages.is_empty() {
                    format!("{} -", outcome.id)
                } else {
                    format!("{} {}", outcome.id, percentages.join("/"))
                }
            }
            Err(_) => format!("{} {}", outcome.id, "!".red()),
        })
        .collect();

    control::unset_override();
    segments.join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ProviderError;
    use crate::core::models::usage::UsageDetail;

    fn usage(provider: &str, limits: Vec<LimitDetail>) -> UsageInfo {
        UsageInfo {
            provider: provider.to_string(),
            user_id: Some("u-123".to_string()),
            membership_level: Some("lite".to_string()),
            limits,
            raw_response: serde_json::json!({}),
        }
    }

    fn limit(used: &str, max: &str) -> LimitDetail {
        LimitDetail {
            duration: 5,
            time_unit: "hour".to_string(),
            limit: max.to_string(),
            used: used.to_string(),
            remaining: "8".to_string(),
            resets_at: None,
            usage_details: vec![],
        }
    }

    #[test]
    fn render_provider_plain_text() {
        let text = render_provider(&usage("bigmodel", vec![limit("92", "100")]), false);
        assert!(text.contains("BigModel"));
        assert!(text.contains("Account"));
        assert!(text.contains("u-123"));
        assert!(text.contains("Plan"));
        assert!(text.contains("5 hour"));
        assert!(text.contains("92% used"));
        assert!(text.contains("92/100 (8 left)"));
    }

    #[test]
    fn render_provider_no_limits_is_distinct_from_error() {
        let text = render_provider(&usage("kimi", vec![]), false);
        assert!(text.contains("No limit data available."));
        assert!(!text.contains("error"));
    }

    #[test]
    fn render_provider_usage_details() {
        let mut l = limit("92", "100");
        l.usage_details = vec![UsageDetail {
            model_code: "search-prime".to_string(),
            usage: 83,
        }];
        let text = render_provider(&usage("bigmodel", vec![l]), false);
        assert!(text.contains("search-prime"));
        assert!(text.contains("83"));
    }

    #[test]
    fn render_error_block() {
        let text = render_error("kimi", "HTTP 401 from ...", false);
        assert!(text.contains("Kimi (error)"));
        assert!(text.contains("HTTP 401"));
    }

    #[test]
    fn status_line_mixes_success_and_failure() {
        let outcomes = vec![
            ProviderOutcome {
                id: "kimi".to_string(),
                result: Ok(usage("kimi", vec![limit("65", "100")])),
            },
            ProviderOutcome {
                id: "bigmodel".to_string(),
                result: Err(ProviderError::UnknownProvider("bigmodel".to_string())),
            },
        ];
        let line = render_status_line(&outcomes, false);
        assert_eq!(line, "kimi 65% | bigmodel !");
    }

    #[test]
    fn status_line_joins_all_limit_percentages() {
        let mut monthly = limit("12", "100");
        monthly.time_unit = "month".to_string();
        let outcomes = vec![ProviderOutcome {
            id: "kimi".to_string(),
            result: Ok(usage("kimi", vec![limit("65", "100"), monthly])),
        }];
        assert_eq!(render_status_line(&outcomes, false), "kimi 65%/12%");
    }

    #[test]
    fn status_line_skips_uncomputable_limits() {
        let mut no_cap = limit("5", "0");
        no_cap.time_unit = "TOKENS_LIMIT".to_string();
        let outcomes = vec![ProviderOutcome {
            id: "bigmodel".to_string(),
            result: Ok(usage("bigmodel", vec![no_cap, limit("92", "100")])),
        }];
        assert_eq!(render_status_line(&outcomes, false), "bigmodel 92%");
    }

    #[test]
    fn status_line_no_percentage_renders_dash() {
        let outcomes = vec![ProviderOutcome {
            id: "kimi".to_string(),
            result: Ok(usage("kimi", vec![])),
        }];
        assert_eq!(render_status_line(&outcomes, false), "kimi -");
    }
}

use chrono::{DateTime, Local, Utc};

use crate::core::models::usage::LimitDetail;

const KNOWN_UNITS: [&str; 7] = ["second", "minute", "hour", "day", "week", "month", "year"];

/// Integer percent of a limit that has been consumed, or None when either
/// value fails to parse as a base-10 integer or the limit is zero.
///
/// Display-time derivation only; never written back into the model.
pub fn percentage(used: &str, limit: &str) -> Option<i64> {
    let used: i64 = used.trim().parse().ok()?;
    let limit: i64 = limit.trim().parse().ok()?;
    if limit == 0 {
        return None;
    }
    // Widened so a large token cap cannot overflow the multiply.
    let pct = (i128::from(used) * 100).div_euclid(i128::from(limit));
    i64::try_from(pct).ok()
}

/// Human label for a limit window, e.g. "5 hour" or "total".
///
/// Total over all inputs: the `TOKENS_LIMIT` sentinel means a lifetime cap,
/// known unit names render as "<duration> <unit>", and anything else falls
/// back to stripping a `TIME_UNIT_` style prefix and lowercasing.
pub fn window_label(limit: &LimitDetail) -> String {
    if limit.time_unit == "TOKENS_LIMIT" {
        return "total".to_string();
    }
    if KNOWN_UNITS.contains(&limit.time_unit.as_str()) {
        return format!("{} {}", limit.duration, limit.time_unit);
    }
    let unit = limit
        .time_unit
        .strip_prefix("TIME_UNIT_")
        .unwrap_or(&limit.time_unit)
        .to_lowercase();
    format!("{} {}", limit.duration, unit)
}

/// Local-timezone rendering of a reset instant, e.g. "2026-02-06 09:31:59 +01:00".
pub fn format_reset_datetime(resets_at: &DateTime<Utc>) -> String {
    resets_at
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S %:z")
        .to_string()
}

/// Returns "Resets in Xh Ym" relative to now; "Resets now" once past.
pub fn format_reset_countdown(resets_at: &DateTime<Utc>) -> String {
    let total_seconds = (*resets_at - Utc::now()).num_seconds();
    if total_seconds <= 0 {
        return "Resets now".to_string();
    }

    let total_minutes = total_seconds / 60;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours >= 24 {
        let days = hours / 24;
        let remaining_hours = hours % 24;
        if remaining_hours == 0 {
            format!("Resets in {}d", days)
        } else {
            format!("Resets in {}d {}h", days, remaining_hours)
        }
    } else if hours > 0 {
        format!("Resets in {}h {}m", hours, minutes)
    } else {
        format!("Resets in {}m", total_minutes.max(1))
    }
}

/// Returns "[████░░░░░░░░]" where █ = used portion, ░ = remaining portion.
pub fn format_usage_bar(used_percent: i64, width: usize) -> String {
    let used_percent = used_percent.clamp(0, 100) as f64;
    let used_blocks = ((used_percent / 100.0) * width as f64).round() as usize;
    let remaining_blocks = width.saturating_sub(used_blocks);

    let filled: String = "█".repeat(used_blocks);
    let empty: String = "░".repeat(remaining_blocks);

    format!("[{}{}]", filled, empty)
}

//! Display helpers: relative dates and display-safe strings

use chrono::{DateTime, Duration, Utc};

/// Format `then` relative to `now` in a compact human form.
///
/// Buckets, nearest first: minutes ago, `Today 14:30`, `Yest. 14:30`,
/// `Mon. 14:30` within a week, `May 21` within six months, and the plain
/// ISO date beyond that.
pub fn relative_date(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(then);

    if delta < Duration::zero() {
        return "the future".to_string();
    }
    if delta > Duration::days(180) {
        return then.format("%F").to_string();
    }
    if delta < Duration::hours(1) {
        return format!("{} mins. ago", delta.num_minutes());
    }
    if then.date_naive() == now.date_naive() {
        return then.format("Today %R").to_string();
    }
    if delta < Duration::days(7) {
        if now.date_naive().pred_opt() == Some(then.date_naive()) {
            return then.format("Yest. %R").to_string();
        }
        return then.format("%a. %R").to_string();
    }
    then.format("%B %d").to_string()
}

/// Replace control characters with `?` so untrusted header values cannot
/// break the one-record-per-line text formats.
pub fn sanitize(input: &str) -> String {
    input
        .chars()
        .map(|c| if c.is_control() { '?' } else { c })
        .collect()
}

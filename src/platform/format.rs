//! Time and date text shown in the status line, prompts and slot list

/// Status clock, `mm:ss` (minutes are not wrapped into hours)
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Slot and prompt duration, `Xm YYs`
pub fn format_duration(secs: u64) -> String {
    format!("{}m {:02}s", secs / 60, secs % 60)
}

/// Relative date between two epoch-millisecond timestamps.
///
/// Older than a week falls back to a calendar date, which needs the platform.
pub fn format_relative(now_ms: u64, timestamp_ms: u64) -> Option<String> {
    let diff_secs = now_ms.saturating_sub(timestamp_ms) / 1000;
    let mins = diff_secs / 60;
    let hours = mins / 60;
    let days = hours / 24;

    let text = if days >= 7 {
        return None;
    } else if days >= 1 {
        if days == 1 {
            "Yesterday".to_string()
        } else {
            format!("{} days ago", days)
        }
    } else if hours >= 1 {
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if mins >= 1 {
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "Just now".to_string()
    };
    Some(text)
}

/// Format a timestamp as a relative date string
#[cfg(target_arch = "wasm32")]
pub fn format_date(now_ms: u64, timestamp_ms: u64) -> String {
    format_relative(now_ms, timestamp_ms).unwrap_or_else(|| {
        let date = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(timestamp_ms as f64));
        format!(
            "{}/{}/{}",
            date.get_month() + 1,
            date.get_date(),
            date.get_full_year() % 100
        )
    })
}

#[cfg(not(target_arch = "wasm32"))]
pub fn format_date(now_ms: u64, timestamp_ms: u64) -> String {
    format_relative(now_ms, timestamp_ms).unwrap_or_else(|| short_date_utc(timestamp_ms))
}

/// `M/D/YY` of an epoch-millisecond timestamp, in UTC
pub fn short_date_utc(timestamp_ms: u64) -> String {
    let (year, month, day) = civil_from_days(timestamp_ms / 86_400_000);
    format!("{}/{}/{}", month, day, year % 100)
}

/// Gregorian (year, month, day) for a count of days since 1970-01-01
fn civil_from_days(days: u64) -> (u64, u64, u64) {
    // Eras of 400 years, counted from 0000-03-01
    let z = days + 719_468;
    let era = z / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + u64::from(month <= 2);
    (year, month, day)
}

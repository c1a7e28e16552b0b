//! Dashboard utility functions
//!
//! Contains helper functions used across dashboard components

use crate::api::types::ProcessingStatus;
use crate::events::Worker;
use chrono::{DateTime, NaiveDateTime, NaiveTime};
use ratatui::prelude::Color;
use std::time::Duration;

/// Get a ratatui color for a worker based on its type
pub fn get_worker_color(worker: &Worker) -> Color {
    match worker {
        Worker::Coordinator => Color::Cyan,
        Worker::Refresher => Color::Gray,
        Worker::LivePoller => Color::LightBlue,
        Worker::Editor => Color::Green,
    }
}

pub fn get_status_color(status: ProcessingStatus) -> Color {
    match status {
        ProcessingStatus::Done => Color::Green,
        ProcessingStatus::InProcess => Color::Yellow,
        ProcessingStatus::NotStarted => Color::DarkGray,
        ProcessingStatus::Unknown => Color::Gray,
    }
}

/// Format compact timestamp with date and time from full timestamp
pub fn format_compact_timestamp(timestamp: &str) -> String {
    // Extract from "YYYY-MM-DD HH:MM:SS" format
    let mut parts = timestamp.split(' ');
    if let (Some(date_part), Some(time_part)) = (parts.next(), parts.next()) {
        if let (Some(month_day), Some(hour_min)) = (date_part.get(5..10), time_part.get(0..5)) {
            return format!("{} {}", month_day, hour_min);
        }
    }
    // Fallback to original timestamp if parsing fails
    timestamp.to_string()
}

/// Whole euros with thousands separators, e.g. `€1,234,568` or `-€120`.
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}€{}", sign, group_thousands(rounded.abs() as u64))
}

pub fn format_number(value: u64) -> String {
    group_thousands(value)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// `HH:MM` from an ISO timestamp or time of day, `--:--` when absent.
pub fn format_time(value: Option<&str>) -> String {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return "--:--".to_string();
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return dt.format("%H:%M").to_string();
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, pattern) {
            return dt.format("%H:%M").to_string();
        }
    }
    for pattern in ["%H:%M:%S", "%H:%M"] {
        if let Ok(t) = NaiveTime::parse_from_str(value, pattern) {
            return t.format("%H:%M").to_string();
        }
    }
    "--:--".to_string()
}

/// Minutes as `1h 05m` or `12.5 min`.
pub fn format_minutes(minutes: f64) -> String {
    if minutes >= 60.0 {
        let total = minutes.round() as u64;
        format!("{}h {:02}m", total / 60, total % 60)
    } else {
        format!("{:.1} min", minutes)
    }
}

/// Session uptime as `0d 1h 2m 3s`.
pub fn format_uptime(uptime: Duration) -> String {
    let secs = uptime.as_secs();
    format!(
        "{}d {}h {}m {}s",
        secs / 86400,
        (secs % 86400) / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}

/// Clean HTTP error messages
pub fn clean_http_error_message(msg: &str) -> String {
    // Replace verbose HTTP error patterns with cleaner messages
    if msg.contains("Reqwest error") && msg.contains("timed out") {
        return "Request timed out".to_string();
    }
    if msg.contains("Reqwest error") && msg.contains("connect") {
        return "API unreachable".to_string();
    }
    if msg.contains("Reqwest error") {
        return "Network error".to_string();
    }
    // Return original message if no HTTP error pattern detected
    msg.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1234567.6), "€1,234,568");
        assert_eq!(format_currency(0.0), "€0");
        assert_eq!(format_currency(-120.4), "-€120");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(None), "--:--");
        assert_eq!(format_time(Some("")), "--:--");
        assert_eq!(format_time(Some("2025-03-04T08:15:42")), "08:15");
        assert_eq!(format_time(Some("2025-03-04T08:15:42+01:00")), "08:15");
        assert_eq!(format_time(Some("2025-03-04 17:02:00.123")), "17:02");
        assert_eq!(format_time(Some("09:30")), "09:30");
        assert_eq!(format_time(Some("yesterday")), "--:--");
    }

    #[test]
    fn test_format_compact_timestamp() {
        assert_eq!(format_compact_timestamp("2025-03-04 08:15:42"), "03-04 08:15");
        assert_eq!(format_compact_timestamp("garbage"), "garbage");
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(12.5), "12.5 min");
        assert_eq!(format_minutes(65.0), "1h 05m");
    }

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(Duration::from_secs(59)), "0d 0h 0m 59s");
        assert_eq!(format_uptime(Duration::from_secs(90_061)), "1d 1h 1m 1s");
    }
}

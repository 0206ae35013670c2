//! Display formatting shared by the derived views.

use chrono::{DateTime, SecondsFormat, Utc};

/// Storage form of a timestamp: `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_iso(iso: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(iso)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// `March 1, 2024`. Falls back to the raw string when it does not parse.
pub fn long_date(iso: &str) -> String {
    match parse_iso(iso) {
        Some(at) => at.format("%B %-d, %Y").to_string(),
        None => iso.to_string(),
    }
}

/// `3/1/2024`. Falls back to the raw string when it does not parse.
pub fn short_date(iso: &str) -> String {
    match parse_iso(iso) {
        Some(at) => at.format("%-m/%-d/%Y").to_string(),
        None => iso.to_string(),
    }
}

/// `1234567` -> `1,234,567`.
pub fn group_thousands(value: u64) -> String {
    group_digits(&value.to_string())
}

pub(crate) fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// First `max_chars` characters followed by `...`, counted in chars so a
/// multi-byte boundary is never split.
pub fn snippet(text: &str, max_chars: usize) -> String {
    let head: String = text.chars().take(max_chars).collect();
    format!("{head}...")
}

/// First word of a display name, used in the dashboard greeting.
pub fn first_name(full_name: &str) -> &str {
    full_name.split(' ').next().unwrap_or(full_name)
}

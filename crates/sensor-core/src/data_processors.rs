use chrono::{DateTime, NaiveDate, NaiveDateTime};

// ── TimestampProcessor ────────────────────────────────────────────────────────

/// Parses the timestamp cells found in sensor CSV exports.
///
/// Timestamps are kept in the wall-clock representation of the source file.
/// An explicit UTC offset is accepted but dropped, never applied.
pub struct TimestampProcessor;

impl TimestampProcessor {
    /// Output format used when a timestamp is rendered for display.
    pub const DISPLAY_FORMAT: &'static str = "%Y-%m-%d %H:%M:%S";

    const DATETIME_FORMATS: &'static [&'static str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        // Month-first wins when a slashed date reads both ways.
        "%m/%d/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M:%S",
    ];

    /// Parse a raw cell into a [`NaiveDateTime`], or `None` when the cell is
    /// blank or matches no known layout.
    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        let s = raw.trim();
        if s.is_empty() {
            return None;
        }

        // Normalise a trailing 'Z' so RFC 3339 parsing accepts it.
        let normalised = match s.strip_suffix('Z') {
            Some(stripped) => format!("{}+00:00", stripped),
            None => s.to_string(),
        };
        if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
            return Some(dt.naive_local());
        }

        for fmt in Self::DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(naive);
            }
        }

        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    }

    /// Render `ts` to second precision.
    pub fn format(ts: &NaiveDateTime) -> String {
        ts.format(Self::DISPLAY_FORMAT).to_string()
    }
}

// ── ValueProcessor ────────────────────────────────────────────────────────────

/// Interprets sensor cells as floating-point measurements.
pub struct ValueProcessor;

impl ValueProcessor {
    const MISSING_TOKENS: &'static [&'static str] = &["nan", "na", "n/a", "null", "none"];

    /// Parse a sensor cell. Blank cells, NA markers, NaN and non-numeric text
    /// all count as missing.
    pub fn parse(raw: &str) -> Option<f64> {
        let s = raw.trim();
        if s.is_empty() {
            return None;
        }
        let lower = s.to_ascii_lowercase();
        if Self::MISSING_TOKENS.contains(&lower.as_str()) {
            return None;
        }
        s.parse::<f64>().ok().filter(|v| !v.is_nan())
    }
}

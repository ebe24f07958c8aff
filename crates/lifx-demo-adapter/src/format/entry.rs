/*
[INPUT]:  Server log entries and raw JSON log text
[OUTPUT]: HTML fragments for display (never errors)
[POS]:    Format layer - per-entry and raw-output rendering
[UPDATE]: When log line layout or fallback behavior changes
*/

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde_json::Value;
use tracing::debug;

use crate::types::LogEntry;

use super::highlight::{escape_html, format_json_with_highlighting};
use super::json::try_deep_json_parse;

const LOCAL_DISPLAY_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// `[time] LEVEL message` followed by the highlighted, deep-parsed `meta`
pub fn format_log_entry(log: &LogEntry) -> String {
    let timestamp = format_timestamp(&log.timestamp);
    let level = format_log_level(&log.level);
    let message = format!(
        r#"<span class="log-message">{}</span>"#,
        escape_html(&log.message)
    );

    let meta = match log.meta.as_ref().filter(|meta| is_truthy(meta)) {
        Some(meta) => {
            let rendered = match try_deep_json_parse(meta) {
                Ok(parsed) => format_json_with_highlighting(&parsed, 0),
                Err(err) => {
                    debug!(error = %err, "meta left unparsed");
                    format_json_with_highlighting(meta, 0)
                }
            };
            format!("\n{rendered}")
        }
        None => String::new(),
    };

    format!("{timestamp} {level} {message}{meta}")
}

/// Highlight arbitrary raw JSON text; unparseable input is escaped verbatim
pub fn format_raw_log_output(raw: &str) -> String {
    let parsed = serde_json::from_str::<Value>(raw)
        .ok()
        .and_then(|value| try_deep_json_parse(&value).ok());

    match parsed {
        Some(value) => format_json_with_highlighting(&value, 0),
        None => format!(r#"<span class="log-raw">{}</span>"#, escape_html(raw)),
    }
}

/// Re-serialize an already decoded value and render it like raw output
pub fn format_raw_log_enhanced(value: &Value) -> String {
    format_raw_log_output(&value.to_string())
}

fn format_timestamp(timestamp: &str) -> String {
    let display = local_display_time(timestamp).unwrap_or_else(|| escape_html(timestamp));
    format!(r#"<span class="log-timestamp">[{display}]</span>"#)
}

fn local_display_time(timestamp: &str) -> Option<String> {
    parse_log_timestamp(timestamp).map(|local| local.format(LOCAL_DISPLAY_FORMAT).to_string())
}

/// RFC 3339, or `YYYY-MM-DD HH:MM:SS` read as local time
pub fn parse_log_timestamp(timestamp: &str) -> Option<DateTime<Local>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(timestamp) {
        return Some(parsed.with_timezone(&Local));
    }

    let naive = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S").ok()?;
    Local.from_local_datetime(&naive).earliest()
}

fn format_log_level(level: &str) -> String {
    format!(
        r#"<span class="log-level log-level-{}">{:<5}</span>"#,
        escape_html(&level.to_lowercase()),
        escape_html(&level.to_uppercase())
    )
}

/// JavaScript-style truthiness, which decides whether `meta` is shown
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/*
[INPUT]:  JSON values from log payloads
[OUTPUT]: Indented HTML fragments with json-* CSS classes
[POS]:    Format layer - syntax highlighting for the log viewer
[UPDATE]: When CSS classes or value classification change
*/

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use url::Url;

static TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:",
        r"[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}",
        r"|[0-9]{1,2}/[0-9]{1,2}/[0-9]{4}, [0-9]{1,2}:[0-9]{2}:[0-9]{2} (?:AM|PM)",
        r"|[0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2}",
        r")"
    ))
    .expect("timestamp pattern")
});

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern"));

/// Render `value` as an indented HTML fragment.
///
/// `indent` is the nesting level of `value` itself; nested members are
/// indented two spaces per level. Empty arrays and objects stay on one line.
pub fn format_json_with_highlighting(value: &Value, indent: usize) -> String {
    let spaces = "  ".repeat(indent);

    match value {
        Value::Null => span("json-null", "null"),
        Value::Bool(b) => span("json-boolean", &b.to_string()),
        Value::Number(n) => span("json-number", &n.to_string()),
        Value::String(s) => {
            let class = if is_timestamp(s) {
                "json-timestamp"
            } else if is_url(s) {
                "json-url"
            } else {
                "json-string"
            };
            span(class, &format!("\"{}\"", escape_html(s)))
        }
        Value::Array(items) => {
            if items.is_empty() {
                return span("json-bracket", "[]");
            }

            let body = items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    let comma = if index + 1 < items.len() { "," } else { "" };
                    format!(
                        "{spaces}  {}{comma}",
                        format_json_with_highlighting(item, indent + 1)
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");

            format!(
                "{}\n{body}\n{spaces}{}",
                span("json-bracket", "["),
                span("json-bracket", "]")
            )
        }
        Value::Object(object) => {
            if object.is_empty() {
                return span("json-bracket", "{}");
            }

            let body = object
                .iter()
                .enumerate()
                .map(|(index, (key, item))| {
                    let comma = if index + 1 < object.len() { "," } else { "" };
                    format!(
                        "{spaces}  {}{} {}{comma}",
                        span("json-key", &format!("\"{}\"", escape_html(key))),
                        span("json-colon", ":"),
                        format_json_with_highlighting(item, indent + 1)
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");

            format!(
                "{}\n{body}\n{spaces}{}",
                span("json-bracket", "{"),
                span("json-bracket", "}")
            )
        }
    }
}

/// ISO-8601, `M/D/YYYY, H:MM:SS AM` or `YYYY-MM-DD HH:MM:SS` prefix
pub fn is_timestamp(s: &str) -> bool {
    TIMESTAMP_RE.is_match(s)
}

/// Parses as an absolute URL
pub fn is_url(s: &str) -> bool {
    Url::parse(s).is_ok()
}

pub fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Plain text from a fragment produced by this module
pub fn strip_html_tags(html: &str) -> String {
    TAG_RE
        .replace_all(html, "")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

fn span(class: &str, content: &str) -> String {
    format!(r#"<span class="{class}">{content}</span>"#)
}

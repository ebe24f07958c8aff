/*
[INPUT]:  Cached backend and MCP logs
[OUTPUT]: Merged display records, plain-text exports, clipboard copies
[POS]:    Logs layer - presentation of fetched logs
[UPDATE]: When the combined view or export layout changes
*/

use std::cmp::Reverse;

use chrono::Local;
use serde::Serialize;
use tracing::{info, warn};

use crate::format::{
    McpInfo, extract_mcp_info, format_log_entry, parse_log_timestamp, strip_html_tags,
};
use crate::types::{LogEntry, LogExportSource, LogSource};

use super::fetcher::ServerLogs;

const EXPORT_SEPARATOR_WIDTH: usize = 50;
const COPY_FAILED_MESSAGE: &str = "Failed to copy logs to clipboard";

/// A log entry from either server, ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedLogEntry {
    #[serde(flatten)]
    pub entry: LogEntry,
    pub source: LogSource,
    /// `[BACKEND] <formatted entry>`
    pub display_text: String,
    /// Source badge followed by the formatted entry
    pub html_content: String,
    pub mcp_info: Option<McpInfo>,
}

impl CombinedLogEntry {
    pub fn new(entry: LogEntry, source: LogSource) -> Self {
        let formatted = format_log_entry(&entry);
        let mcp_info = extract_mcp_info(&entry.to_value());

        Self {
            display_text: format!("{} {formatted}", source.tag()),
            html_content: format!(
                r#"<span class="log-source {source}">{}</span> {formatted}"#,
                source.tag()
            ),
            mcp_info,
            source,
            entry,
        }
    }
}

impl ServerLogs {
    /// Both sources merged, newest first.
    ///
    /// Entries whose timestamp does not parse sort after all others, keeping
    /// their relative order.
    pub fn get_combined_logs(&self) -> Vec<CombinedLogEntry> {
        let (backend, mcp) = {
            let state = self.read_state();
            (state.backend_logs.clone(), state.mcp_logs.clone())
        };

        let mut combined: Vec<CombinedLogEntry> = backend
            .into_iter()
            .map(|entry| CombinedLogEntry::new(entry, LogSource::Backend))
            .chain(
                mcp.into_iter()
                    .map(|entry| CombinedLogEntry::new(entry, LogSource::Mcp)),
            )
            .collect();

        combined.sort_by_cached_key(|log| Reverse(parse_log_timestamp(&log.entry.timestamp)));
        combined
    }

    /// Plain-text export with a banner, suitable for pasting into an issue
    pub fn get_formatted_logs_text(&self, source: LogExportSource) -> String {
        let lines: Vec<String> = match source {
            LogExportSource::Backend => self.tagged_plain_lines(LogSource::Backend),
            LogExportSource::Mcp => self.tagged_plain_lines(LogSource::Mcp),
            LogExportSource::All => self
                .get_combined_logs()
                .iter()
                .map(|log| strip_html_tags(&log.display_text))
                .collect(),
        };

        let header = format!(
            "=== LIFX MCP Server Logs ({}) ===\n",
            source.to_string().to_uppercase()
        );
        let generated = format!(
            "Generated: {}\n",
            Local::now().format("%-m/%-d/%Y, %-I:%M:%S %p")
        );
        let separator = format!("{}\n\n", "=".repeat(EXPORT_SEPARATOR_WIDTH));

        format!("{header}{generated}{separator}{}", lines.join("\n\n"))
    }

    /// Copy the export to the clipboard; `false` (and `error` set) on failure
    pub fn copy_logs_to_clipboard(&self, source: LogExportSource) -> bool {
        let text = self.get_formatted_logs_text(source);
        match self.clipboard.copy_to_clipboard(&text) {
            Ok(()) => {
                info!(%source, bytes = text.len(), "logs copied to clipboard");
                true
            }
            Err(err) => {
                warn!(%source, error = %err, "failed to copy logs");
                self.write_state().error = Some(COPY_FAILED_MESSAGE.to_string());
                false
            }
        }
    }

    fn tagged_plain_lines(&self, source: LogSource) -> Vec<String> {
        self.logs(source)
            .iter()
            .map(|log| format!("{} {}", source.tag(), strip_html_tags(&format_log_entry(log))))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::json;

    use crate::clipboard::MemoryClipboard;
    use crate::http::{BackendClient, BackendConfig};
    use crate::session::SessionTracker;
    use crate::storage::BrowserState;

    fn server_logs(clipboard: Arc<MemoryClipboard>) -> ServerLogs {
        let tracker = SessionTracker::new(BrowserState::in_memory());
        let client = BackendClient::new(tracker, BackendConfig::default())
            .unwrap()
            .into_shared();
        ServerLogs::new(client, clipboard)
    }

    fn seeded(clipboard: Arc<MemoryClipboard>) -> ServerLogs {
        let logs = server_logs(clipboard);
        logs.set_logs(
            LogSource::Backend,
            vec![
                LogEntry::new("2025-07-29T06:08:40.000Z", "info", "backend early"),
                LogEntry::new("not a time", "warn", "backend undated"),
                LogEntry::new("2025-07-29T06:08:44.000Z", "error", "backend late"),
            ],
        );
        logs.set_logs(
            LogSource::Mcp,
            vec![
                LogEntry::new("2025-07-29T06:08:42.000Z", "info", "mcp middle").with_field(
                    "output",
                    json!(r#"{"jsonrpc":"2.0","id":"1","result":{"content":[{"type":"text","text":"{\"message\":\"ok\"}"}]}}"#),
                ),
            ],
        );
        logs
    }

    #[test]
    fn test_combined_logs_sorted_newest_first() {
        let logs = seeded(Arc::new(MemoryClipboard::new()));
        let combined = logs.get_combined_logs();

        let messages: Vec<&str> = combined.iter().map(|l| l.entry.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["backend late", "mcp middle", "backend early", "backend undated"]
        );
    }

    #[test]
    fn test_combined_logs_tag_sources() {
        let logs = seeded(Arc::new(MemoryClipboard::new()));
        let combined = logs.get_combined_logs();

        let mcp = combined.iter().find(|l| l.source == LogSource::Mcp).unwrap();
        assert!(mcp.display_text.starts_with("[MCP] "));
        assert!(
            mcp.html_content
                .starts_with(r#"<span class="log-source mcp">[MCP]</span> "#)
        );
        let info = mcp.mcp_info.as_ref().unwrap();
        assert_eq!(info.content, json!({"message": "ok"}));
        assert_eq!(info.timestamp, "2025-07-29T06:08:42.000Z");

        let backend = combined.iter().find(|l| l.source == LogSource::Backend).unwrap();
        assert!(backend.mcp_info.is_none());
    }

    #[test]
    fn test_combined_entry_serializes_flat() {
        let entry = CombinedLogEntry::new(
            LogEntry::new("2025-07-29T06:08:42.000Z", "info", "hi"),
            LogSource::Backend,
        );
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["message"], "hi");
        assert_eq!(value["source"], "backend");
        assert!(value["displayText"].as_str().unwrap().starts_with("[BACKEND]"));
        assert!(value["mcpInfo"].is_null());
    }

    #[test]
    fn test_formatted_text_has_banner_and_no_tags() {
        let logs = seeded(Arc::new(MemoryClipboard::new()));
        let text = logs.get_formatted_logs_text(LogExportSource::All);

        assert!(text.starts_with("=== LIFX MCP Server Logs (ALL) ===\nGenerated: "));
        assert!(text.contains(&format!("{}\n\n", "=".repeat(50))));
        assert!(!text.contains("<span"));
        assert!(text.contains("[BACKEND]"));
        assert!(text.contains("[MCP]"));
    }

    #[test]
    fn test_formatted_text_single_source() {
        let logs = seeded(Arc::new(MemoryClipboard::new()));
        let text = logs.get_formatted_logs_text(LogExportSource::Backend);

        assert!(text.starts_with("=== LIFX MCP Server Logs (BACKEND) ===\n"));
        assert!(!text.contains("[MCP]"));
        let body = text.split(&format!("{}\n\n", "=".repeat(50))).nth(1).unwrap();
        assert_eq!(body.split("\n\n").count(), 3);
        assert!(body.starts_with("[BACKEND] ["));
    }

    #[test]
    fn test_copy_logs_to_clipboard() {
        let clipboard = Arc::new(MemoryClipboard::new());
        let logs = seeded(clipboard.clone());

        assert!(logs.copy_logs_to_clipboard(LogExportSource::Mcp));
        let copied = clipboard.contents().unwrap();
        assert!(copied.starts_with("=== LIFX MCP Server Logs (MCP) ==="));
        assert!(logs.error().is_none());
    }

    #[test]
    fn test_copy_failure_returns_false() {
        let logs = seeded(Arc::new(MemoryClipboard::failing()));

        assert!(!logs.copy_logs_to_clipboard(LogExportSource::All));
        assert_eq!(logs.error().as_deref(), Some(COPY_FAILED_MESSAGE));
    }

    #[test]
    fn test_naive_timestamps_sort_as_displayed() {
        let utc = chrono::DateTime::parse_from_rfc3339("2025-07-29T06:08:42Z").unwrap();
        let an_hour_later = (utc + chrono::Duration::hours(1))
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();

        let logs = server_logs(Arc::new(MemoryClipboard::new()));
        logs.set_logs(
            LogSource::Backend,
            vec![
                LogEntry::new("2025-07-29T06:08:42Z", "info", "zoned"),
                LogEntry::new(an_hour_later.clone(), "info", "naive"),
            ],
        );

        let combined = logs.get_combined_logs();
        let messages: Vec<&str> = combined.iter().map(|l| l.entry.message.as_str()).collect();
        assert_eq!(messages, vec!["naive", "zoned"]);

        let shown = parse_log_timestamp(&an_hour_later).unwrap();
        assert_eq!(shown.timestamp() - utc.timestamp(), 3600);
    }
}

/*
[INPUT]:  Raw and nested JSON log records
[OUTPUT]: Highlighted HTML fragments, plain text, MCP descriptors
[POS]:    Format layer - pure, total log rendering functions
[UPDATE]: When log display rules change
*/

pub mod entry;
pub mod highlight;
pub mod json;
pub mod mcp;

pub use entry::{
    format_log_entry, format_raw_log_enhanced, format_raw_log_output, parse_log_timestamp,
};
pub use highlight::{escape_html, format_json_with_highlighting, is_timestamp, is_url, strip_html_tags};
pub use json::{FormatError, MAX_PARSE_DEPTH, deep_json_parse, smart_json_parse, try_deep_json_parse};
pub use mcp::{McpInfo, extract_mcp_info};

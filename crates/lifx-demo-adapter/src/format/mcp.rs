/*
[INPUT]:  Log records whose `output` carries a JSON-RPC response
[OUTPUT]: Normalized MCP response descriptors
[POS]:    Format layer - MCP payload unwrapping
[UPDATE]: When the MCP response shape changes
*/

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::json::smart_json_parse;

pub const MCP_RESPONSE_TYPE: &str = "mcp-response";

/// Human-relevant part of an MCP tool response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpInfo {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: Value,
    pub content: Value,
    pub timestamp: String,
}

/// Unwrap `record.output` when it is a JSON-RPC result with text content.
///
/// `output` may be the response object itself or its (possibly double)
/// stringified form. The first content item's text is parsed as JSON when possible and kept
/// verbatim otherwise. Returns `None` for any other shape.
pub fn extract_mcp_info(record: &Value) -> Option<McpInfo> {
    let output = record.get("output").filter(|output| !is_empty(output))?;
    // Only the outer layer is unwrapped so string ids stay strings
    let parsed = match output {
        Value::String(s) => smart_json_parse(s),
        other => other.clone(),
    };

    parsed.get("jsonrpc").filter(|v| !is_empty(v))?;
    let result = parsed.get("result").filter(|v| !is_empty(v))?;

    let text = result
        .get("content")?
        .get(0)?
        .get("text")
        .filter(|text| !is_empty(text))?;

    let content = match text {
        Value::String(s) => smart_json_parse(s),
        other => other.clone(),
    };

    let timestamp = record
        .get("timestamp")
        .and_then(Value::as_str)
        .filter(|ts| !ts.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));

    Some(McpInfo {
        kind: MCP_RESPONSE_TYPE.to_string(),
        id: parsed.get("id").cloned().unwrap_or(Value::Null),
        content,
        timestamp,
    })
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

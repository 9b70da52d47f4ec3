//! Plain-text helpers for rich-text content.

use serde_json::Value;
use tracing::debug;

/// Flatten a rich-text content state into plain text.
///
/// The content state is a JSON object whose `blocks` each carry a `text`; block texts
/// are joined with newlines. Values that are not a JSON object (including legacy plain
/// text cells) are returned unchanged.
pub fn flatten_rich_text(value: &str) -> String {
    match serde_json::from_str::<Value>(value) {
        Ok(Value::Object(content_state)) => content_state
            .get("blocks")
            .and_then(Value::as_array)
            .map(|blocks| {
                blocks
                    .iter()
                    .map(|block| block.get("text").and_then(Value::as_str).unwrap_or(""))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default(),
        _ => {
            debug!(content_len = value.len(), "Content is not a rich-text state");
            value.to_string()
        }
    }
}

/// Escape `&`, `<` and `>` so stored text cannot be rendered as markup.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

//! Header extraction for metadata responses

use super::types::{Header, MessageMetadata, MessagePreview};

pub const NO_SUBJECT: &str = "(No subject)";
pub const UNKNOWN_SENDER: &str = "Unknown sender";

/// Headers requested via `metadataHeaders`; nothing else is transferred.
pub const METADATA_HEADERS: [&str; 3] = ["Subject", "From", "Date"];

/// Value of the first header named `key`, compared case-insensitively.
/// Missing header or missing value yields `""`.
pub fn extract_header<'a>(headers: &'a [Header], key: &str) -> &'a str {
    headers
        .iter()
        .find(|h| {
            h.name
                .as_deref()
                .is_some_and(|name| name.eq_ignore_ascii_case(key))
        })
        .and_then(|h| h.value.as_deref())
        .unwrap_or("")
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

impl From<MessageMetadata> for MessagePreview {
    fn from(msg: MessageMetadata) -> Self {
        let headers = msg
            .payload
            .and_then(|p| p.headers)
            .unwrap_or_default();
        MessagePreview {
            subject: or_placeholder(extract_header(&headers, "Subject"), NO_SUBJECT),
            from: or_placeholder(extract_header(&headers, "From"), UNKNOWN_SENDER),
            date: extract_header(&headers, "Date").to_string(),
            snippet: msg.snippet.unwrap_or_default(),
            id: msg.id,
        }
    }
}

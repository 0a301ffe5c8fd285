use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListMessagesResponse {
    pub messages: Option<Vec<MessageRef>>,
    pub next_page_token: Option<String>,
    pub result_size_estimate: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessageRef {
    pub id: String,
    pub thread_id: Option<String>,
}

/// `format=metadata` view of a single message.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MessageMetadata {
    pub id: String,
    pub snippet: Option<String>,
    pub payload: Option<MessagePayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MessagePayload {
    pub headers: Option<Vec<Header>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Header {
    pub name: Option<String>,
    pub value: Option<String>,
}

/// Minimal per-message projection handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePreview {
    pub id: String,
    pub subject: String,
    pub from: String,
    pub snippet: String,
    /// Raw `Date` header; parsing is left to the caller.
    pub date: String,
}

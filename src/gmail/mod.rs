mod batch;
mod client;
mod headers;
mod pagination;
mod types;

pub use batch::BatchPlan;
pub use client::GmailClient;
pub use headers::{NO_SUBJECT, UNKNOWN_SENDER, extract_header};
pub use pagination::PageBudget;
pub use types::{
    Header, ListMessagesResponse, MessageMetadata, MessagePayload, MessagePreview, MessageRef,
};

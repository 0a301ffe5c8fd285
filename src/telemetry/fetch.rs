use std::fmt;
use std::time::Duration;

use tracing::Level;
use tracing::event;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOperation {
    ListMessages,
    GetMessageBatch,
}

impl fmt::Display for FetchOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchOperation::ListMessages => write!(f, "list_messages"),
            FetchOperation::GetMessageBatch => write!(f, "get_message_batch"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub operation: FetchOperation,
    /// Page number for listings, batch number for detail fetches. Zero based.
    pub sequence: usize,
    pub items: usize,
    pub success: bool,
    pub elapsed: Duration,
}

impl FetchOutcome {
    pub fn log(&self) {
        event!(
            Level::INFO,
            operation = %self.operation,
            sequence = self.sequence,
            items = self.items,
            success = self.success,
            elapsed_ms = self.elapsed.as_millis() as u64,
            "fetch.outcome"
        );
    }
}

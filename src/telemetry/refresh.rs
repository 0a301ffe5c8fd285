use tracing::{Level, event};
use uuid::Uuid;

use crate::errors::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// New access token, provider kept the existing refresh token.
    Refreshed,
    /// New access token and a rotated refresh token.
    Rotated,
}

/// Tags every event of one refresh attempt with a shared id.
#[derive(Clone, Debug)]
pub struct RefreshTelemetry {
    attempt_id: Uuid,
    context: String,
}

impl RefreshTelemetry {
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            attempt_id: Uuid::new_v4(),
            context: context.into(),
        }
    }

    pub fn attempt_id(&self) -> Uuid {
        self.attempt_id
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn emit_cache_hit(&self, expires_at_ms: i64, now_ms: i64) {
        event!(
            Level::DEBUG,
            attempt_id = %self.attempt_id,
            context = %self.context,
            remaining_ms = expires_at_ms - now_ms,
            "refresh.cache_hit"
        );
    }

    pub fn emit_start(&self, now_ms: i64) {
        event!(
            Level::INFO,
            attempt_id = %self.attempt_id,
            context = %self.context,
            timestamp_ms = now_ms,
            "refresh.start"
        );
    }

    pub fn emit_success(&self, outcome: RefreshOutcome, expires_at_ms: i64) {
        event!(
            Level::INFO,
            attempt_id = %self.attempt_id,
            context = %self.context,
            expires_at_ms,
            outcome = ?outcome,
            "refresh.success"
        );
    }

    pub fn emit_failure(&self, error: &Error, now_ms: i64) {
        event!(
            Level::ERROR,
            attempt_id = %self.attempt_id,
            context = %self.context,
            timestamp_ms = now_ms,
            error = %error,
            "refresh.failure"
        );
    }
}

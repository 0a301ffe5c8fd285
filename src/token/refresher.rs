use std::sync::Arc;

use serde::Deserialize;
use tracing::{error, info, warn};

use crate::errors::Error;
use crate::request_context::RequestDispatchContext;
use crate::telemetry::refresh::{RefreshOutcome, RefreshTelemetry};

use super::{Clock, SystemClock, TokenRecord};

const DEFAULT_REFRESH_ERROR: &str = "Failed to refresh access token";

/// Body returned by the OAuth token endpoint for `grant_type=refresh_token`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RefreshResponse {
    pub access_token: Option<String>,
    pub expires_in: Option<i64>,
    pub refresh_token: Option<String>,
    pub token_type: Option<String>,
    pub scope: Option<String>,
    pub error: Option<String>,
}

/// Turns a possibly stale [`TokenRecord`] into a usable one.
pub struct TokenRefresher {
    ctx: RequestDispatchContext,
    clock: Arc<dyn Clock>,
}

impl TokenRefresher {
    pub fn new(ctx: RequestDispatchContext) -> Self {
        Self::with_clock(ctx, Arc::new(SystemClock))
    }

    pub fn with_clock(ctx: RequestDispatchContext, clock: Arc<dyn Clock>) -> Self {
        Self { ctx, clock }
    }

    /// Returns `record` untouched while its access token is unexpired,
    /// otherwise exchanges the refresh token for a new access token.
    ///
    /// Issues at most one request and never retries.
    pub async fn ensure_fresh_token(&self, record: &TokenRecord) -> Result<TokenRecord, Error> {
        let telemetry = RefreshTelemetry::new("token.ensure_fresh");
        let now = self.clock.now_ms();
        if record.is_fresh(now) {
            if let Some(expires) = record.access_token_expires {
                telemetry.emit_cache_hit(expires, now);
            }
            return Ok(record.clone());
        }

        match self.refresh(record, now, &telemetry).await {
            Ok(refreshed) => Ok(refreshed),
            Err(err) => {
                telemetry.emit_failure(&err, self.clock.now_ms());
                Err(err)
            }
        }
    }

    /// Session boundary: never fails. A failed refresh keeps the stale
    /// record but flags it so callers stop trusting its access token.
    pub async fn refresh_session(&self, record: TokenRecord) -> TokenRecord {
        match self.ensure_fresh_token(&record).await {
            Ok(refreshed) => refreshed,
            Err(err) => {
                warn!("Error refreshing access token: {}", err);
                record.flagged()
            }
        }
    }

    async fn refresh(
        &self,
        record: &TokenRecord,
        now: i64,
        telemetry: &RefreshTelemetry,
    ) -> Result<TokenRecord, Error> {
        let refresh_token = record
            .refresh_token
            .as_deref()
            .ok_or(Error::MissingRefreshToken)?;

        telemetry.emit_start(now);
        let resp = self.request_refresh(refresh_token).await?;

        // expires_in comes from the provider; clamp instead of overflowing
        let expires = now.saturating_add(resp.expires_in.unwrap_or(0).saturating_mul(1000));
        let outcome = if resp.refresh_token.is_some() {
            RefreshOutcome::Rotated
        } else {
            RefreshOutcome::Refreshed
        };
        telemetry.emit_success(outcome, expires);

        Ok(TokenRecord {
            access_token: resp.access_token,
            access_token_expires: Some(expires),
            refresh_token: resp.refresh_token.or_else(|| record.refresh_token.clone()),
            error: None,
        })
    }

    async fn request_refresh(&self, refresh_token: &str) -> Result<RefreshResponse, Error> {
        let config = self.ctx.config();
        let body = form_body(&[
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ]);
        let resp = self.ctx.form_post(&config.token_url, body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let code = serde_json::from_str::<RefreshResponse>(&body)
                .ok()
                .and_then(|r| r.error)
                .unwrap_or_else(|| DEFAULT_REFRESH_ERROR.to_string());
            error!("token refresh rejected: status={} error='{}'", status, code);
            return Err(Error::RefreshFailed(code));
        }

        let body = resp.text().await?;
        let parsed: RefreshResponse = serde_json::from_str(&body)?;
        info!(
            "access token refreshed (len={})",
            parsed.access_token.as_deref().map(str::len).unwrap_or(0)
        );
        Ok(parsed)
    }
}

fn form_body(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

use serde::{Deserialize, Serialize};

/// Marker stored on a session whose refresh failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenError {
    RefreshAccessTokenError,
}

/// Access/refresh token bundle as persisted by the session layer.
///
/// Values are never mutated in place: the refresher hands back a new record
/// which the session store is expected to persist.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Milliseconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token_expires: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<TokenError>,
}

impl TokenRecord {
    /// Record created right after the user signs in. The provider reports
    /// expiry as absolute seconds since the epoch.
    pub fn from_sign_in(
        access_token: impl Into<String>,
        expires_at_secs: Option<i64>,
        refresh_token: Option<String>,
    ) -> Self {
        Self {
            access_token: Some(access_token.into()),
            access_token_expires: Some(expires_at_secs.unwrap_or(0).saturating_mul(1000)),
            refresh_token,
            error: None,
        }
    }

    /// True while `now_ms` is strictly before the expiry. No grace window.
    pub fn is_fresh(&self, now_ms: i64) -> bool {
        match (&self.access_token, self.access_token_expires) {
            (Some(_), Some(expires)) => now_ms < expires,
            _ => false,
        }
    }

    /// The access token, unless the record is flagged as failed.
    pub fn usable_access_token(&self) -> Option<&str> {
        if self.error.is_some() {
            return None;
        }
        self.access_token.as_deref()
    }

    pub(crate) fn flagged(self) -> Self {
        Self {
            error: Some(TokenError::RefreshAccessTokenError),
            ..self
        }
    }
}

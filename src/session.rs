//! Per-request composition of token refresh and message listing, as seen by
//! the session layer and the page that renders the inbox.

use std::sync::Arc;

use tracing::{info, warn};

use crate::errors::Error;
use crate::gmail::{GmailClient, MessagePreview};
use crate::request_context::RequestDispatchContext;
use crate::token::{Clock, SystemClock, TokenRecord, TokenRefresher};

/// Number of messages the inbox page asks for.
pub const DEFAULT_LIMIT: i64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReauthReason {
    /// The last refresh attempt failed; the stored token is untrusted.
    RefreshFailed,
    /// The session never carried an access token.
    MissingAccessToken,
}

/// What the inbox page should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboxView {
    NotConnected,
    Reauthenticate(ReauthReason),
    /// Listing failed. Carries the internal diagnostic, not meant for users.
    LoadFailed(String),
    Empty,
    Messages(Vec<MessagePreview>),
}

impl InboxView {
    /// User-facing text for every state that has no messages to render.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            InboxView::NotConnected => Some(
                "Connect your Google account to see your latest Gmail messages here.",
            ),
            InboxView::Reauthenticate(ReauthReason::RefreshFailed) => Some(
                "We could not refresh your Google session. Please sign out and sign in again.",
            ),
            InboxView::Reauthenticate(ReauthReason::MissingAccessToken) => {
                Some("Missing Google access token. Try signing out and connecting again.")
            }
            InboxView::LoadFailed(_) => {
                Some("We could not load your Gmail messages. Please try again later.")
            }
            InboxView::Empty => {
                Some("Your inbox is empty or we could not find any messages to display.")
            }
            InboxView::Messages(_) => None,
        }
    }
}

/// Result of one page load: the record to persist and what to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLoad {
    pub record: Option<TokenRecord>,
    pub view: InboxView,
}

pub struct Inbox {
    refresher: TokenRefresher,
    client: GmailClient,
}

impl Inbox {
    pub fn new(ctx: RequestDispatchContext) -> Result<Self, Error> {
        Self::with_clock(ctx, Arc::new(SystemClock))
    }

    pub fn with_clock(ctx: RequestDispatchContext, clock: Arc<dyn Clock>) -> Result<Self, Error> {
        Ok(Self {
            client: GmailClient::new(ctx.clone())?,
            refresher: TokenRefresher::with_clock(ctx, clock),
        })
    }

    pub fn refresher(&self) -> &TokenRefresher {
        &self.refresher
    }

    pub fn client(&self) -> &GmailClient {
        &self.client
    }

    /// Refreshes the session token when stale, then lists messages with it.
    /// The returned record replaces the stored one, even when flagged.
    pub async fn load(&self, session: Option<TokenRecord>, limit: Option<i64>) -> SessionLoad {
        let Some(record) = session else {
            return SessionLoad {
                record: None,
                view: InboxView::NotConnected,
            };
        };
        let record = self.refresher.refresh_session(record).await;
        let view = self.view_for(&record, limit).await;
        SessionLoad {
            record: Some(record),
            view,
        }
    }

    /// Lists messages for an already refreshed record.
    pub async fn view_for(&self, record: &TokenRecord, limit: Option<i64>) -> InboxView {
        if record.error.is_some() {
            return InboxView::Reauthenticate(ReauthReason::RefreshFailed);
        }
        let Some(access_token) = record.usable_access_token() else {
            return InboxView::Reauthenticate(ReauthReason::MissingAccessToken);
        };
        match self.client.list_user_messages(access_token, limit).await {
            Ok(previews) if previews.is_empty() => InboxView::Empty,
            Ok(previews) => {
                info!("inbox loaded with {} messages", previews.len());
                InboxView::Messages(previews)
            }
            Err(err) => {
                warn!("could not load inbox: {}", err);
                InboxView::LoadFailed(err.to_string())
            }
        }
    }
}

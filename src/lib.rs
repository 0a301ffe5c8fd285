pub mod config;
mod errors;
pub mod gmail;
mod request_context;
pub mod session;
pub mod telemetry;
pub mod token;

pub use config::{Config, ConfigLocation};
pub use errors::{Error, FetchPhase};
pub use gmail::{GmailClient, MessagePreview};
pub use request_context::RequestDispatchContext;
pub use session::{Inbox, InboxView, ReauthReason, SessionLoad};
pub use token::{TokenError, TokenRecord, TokenRefresher};

#[cfg(test)]
mod tests;

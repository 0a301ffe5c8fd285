use std::fmt;

use reqwest::StatusCode;

/// Which half of a message listing failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    List,
    Detail,
}

impl fmt::Display for FetchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchPhase::List => write!(f, "list failed"),
            FetchPhase::Detail => write!(f, "detail fetch failed"),
        }
    }
}

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Json(serde_json::Error),
    Http(reqwest::Error),
    Config(String),
    MissingRefreshToken,
    RefreshFailed(String),
    Fetch { phase: FetchPhase, status: StatusCode },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "io error: {err}"),
            Error::Json(err) => write!(f, "json error: {err}"),
            Error::Http(err) => write!(f, "http error: {err}"),
            Error::Config(msg) => write!(f, "config error: {msg}"),
            Error::MissingRefreshToken => write!(f, "Missing refresh token"),
            Error::RefreshFailed(code) => write!(f, "token refresh failed: {code}"),
            Error::Fetch { phase, status } => write!(f, "{phase} (status {status})"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Json(err) => Some(err),
            Error::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err)
    }
}

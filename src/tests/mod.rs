pub(crate) mod fetch_logging;
pub(crate) mod refresh_logging;

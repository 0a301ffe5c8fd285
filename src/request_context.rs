use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, RequestBuilder};

use crate::config::Config;

/// Shared context for outbound requests ensuring consistent headers and configuration.
#[derive(Clone)]
pub struct RequestDispatchContext {
    http_client: Client,
    config: Arc<Config>,
}

impl RequestDispatchContext {
    pub fn build(http_client: Client, config: Config) -> Self {
        Self {
            http_client,
            config: Arc::new(config),
        }
    }

    pub fn new(config: Config) -> Self {
        Self::build(Client::new(), config)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// GET with bearer auth; responses must never come from an intermediate cache.
    pub(crate) fn authorized_get(&self, url: &str, access_token: &str) -> RequestBuilder {
        self.http_client
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {}", access_token))
            .header(CACHE_CONTROL, "no-cache")
            .header(USER_AGENT, self.config.user_agent.as_str())
    }

    pub(crate) fn form_post(&self, url: &str, body: String) -> RequestBuilder {
        self.http_client
            .post(url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(CACHE_CONTROL, "no-cache")
            .header(USER_AGENT, self.config.user_agent.as_str())
            .body(body)
    }
}

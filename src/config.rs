//! read configuration from a file, the environment or AWS Secrets Manager

use aws_config::BehaviorVersion;

use crate::errors::Error;

pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_API_BASE: &str = "https://gmail.googleapis.com/gmail/v1/users/me";
/// Gmail rejects `maxResults` above this value.
pub const MAX_PAGE_SIZE_CEILING: u32 = 500;
pub const DEFAULT_BATCH_SIZE: usize = 25;

pub enum ConfigLocation {
    File(String),
    Env,
    Secret,
}

#[derive(Clone, Debug, serde::Deserialize)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_token_url() -> String {
    DEFAULT_TOKEN_URL.to_string()
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_max_page_size() -> u32 {
    MAX_PAGE_SIZE_CEILING
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_user_agent() -> String {
    format!("inbox-preview-rust/{}", env!("CARGO_PKG_VERSION"))
}

impl Config {
    /// Build a config in code. `None` keeps the Google defaults.
    pub fn from_values(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        token_url: Option<String>,
        api_base: Option<String>,
        max_page_size: Option<u32>,
        batch_size: Option<usize>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token_url: token_url.unwrap_or_else(default_token_url),
            api_base: api_base.unwrap_or_else(default_api_base),
            max_page_size: max_page_size.unwrap_or_else(default_max_page_size),
            batch_size: batch_size.unwrap_or_else(default_batch_size),
            user_agent: default_user_agent(),
        }
    }

    pub async fn load(loc: ConfigLocation) -> Result<Self, Error> {
        let config = match loc {
            ConfigLocation::File(path) => Self::from_file(&path)?,
            ConfigLocation::Env => Self::from_env()?,
            ConfigLocation::Secret => Self::from_secret().await?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn from_env() -> Result<Self, Error> {
        Ok(Self {
            client_id: std::env::var("GOOGLE_CLIENT_ID")
                .map_err(|_| Error::Config("Missing GOOGLE_CLIENT_ID env var".to_string()))?,
            client_secret: std::env::var("GOOGLE_CLIENT_SECRET")
                .map_err(|_| Error::Config("Missing GOOGLE_CLIENT_SECRET env var".to_string()))?,
            token_url: std::env::var("GOOGLE_TOKEN_URL").unwrap_or_else(|_| default_token_url()),
            api_base: std::env::var("GMAIL_API_BASE").unwrap_or_else(|_| default_api_base()),
            max_page_size: parse_env("GMAIL_MAX_PAGE_SIZE")?.unwrap_or_else(default_max_page_size),
            batch_size: parse_env("GMAIL_BATCH_SIZE")?.unwrap_or_else(default_batch_size),
            user_agent: default_user_agent(),
        })
    }

    async fn from_secret() -> Result<Self, Error> {
        let secret_arn = std::env::var("INBOX_CONFIG_SECRET_ARN")
            .map_err(|_| Error::Config("Missing INBOX_CONFIG_SECRET_ARN env var".to_string()))?;
        let client = aws_sdk_secretsmanager::Client::new(
            &aws_config::load_defaults(BehaviorVersion::latest()).await,
        );
        let resp = client
            .get_secret_value()
            .secret_id(secret_arn)
            .send()
            .await
            .map_err(|e| Error::Config(format!("Failed to get secret: {}", e)))?;
        let secret = resp.secret_string().ok_or_else(|| {
            Error::Config("Failed to get secret string, returned None".to_string())
        })?;
        Ok(serde_json::from_str(secret)?)
    }

    /// Rejects endpoints that are not absolute URLs and sizes the API would refuse.
    pub fn validate(&self) -> Result<(), Error> {
        for (name, url) in [("token_url", &self.token_url), ("api_base", &self.api_base)] {
            reqwest::Url::parse(url)
                .map_err(|e| Error::Config(format!("Invalid {name} '{url}': {e}")))?;
        }
        if self.max_page_size == 0 || self.max_page_size > MAX_PAGE_SIZE_CEILING {
            return Err(Error::Config(format!(
                "max_page_size must be within 1..={MAX_PAGE_SIZE_CEILING}, got {}",
                self.max_page_size
            )));
        }
        if self.batch_size == 0 {
            return Err(Error::Config("batch_size must be > 0".into()));
        }
        Ok(())
    }

    pub(crate) fn api_base(&self) -> &str {
        self.api_base.trim_end_matches('/')
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Result<Option<T>, Error> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("Invalid {name} env var '{raw}'"))),
        Err(_) => Ok(None),
    }
}

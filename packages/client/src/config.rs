// ABOUTME: Client configuration resolved from the environment
// ABOUTME: Backend URLs, page size, HTTP timeouts and the token file location

use std::path::PathBuf;
use std::time::Duration;

use storyloom_config::constants::{
    DEFAULT_API_URL, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_PAGE_SIZE, DEFAULT_RECORD_URL,
    DEFAULT_REQUEST_TIMEOUT_SECS, STORYLOOM_API_URL, STORYLOOM_AUTH_FILE,
    STORYLOOM_HTTP_CONNECT_TIMEOUT_SECS, STORYLOOM_HTTP_REQUEST_TIMEOUT_SECS,
    STORYLOOM_PAGE_SIZE, STORYLOOM_RECORD_URL,
};
use storyloom_config::{env_parse, env_string};
use url::Url;

use crate::error::{ClientError, ClientResult};

pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the record backend
    pub record_url: String,
    /// Base URL of the generation API
    pub api_url: String,
    pub page_size: u32,
    pub connect_timeout: Duration,
    /// Applies to record requests only. Generation requests have no timeout.
    pub request_timeout: Duration,
    pub auth_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            record_url: DEFAULT_RECORD_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            auth_file: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from `STORYLOOM_*` environment variables
    pub fn from_env() -> ClientResult<Self> {
        let defaults = Self::default();

        let record_url = match env_string(STORYLOOM_RECORD_URL) {
            Some(value) => parse_base_url(STORYLOOM_RECORD_URL, &value)?,
            None => defaults.record_url,
        };
        let api_url = match env_string(STORYLOOM_API_URL) {
            Some(value) => parse_base_url(STORYLOOM_API_URL, &value)?,
            None => defaults.api_url,
        };

        let page_size = env_parse::<u32>(STORYLOOM_PAGE_SIZE)
            .map_err(ClientError::config)?
            .unwrap_or(defaults.page_size);
        let connect_timeout = env_parse::<u64>(STORYLOOM_HTTP_CONNECT_TIMEOUT_SECS)
            .map_err(ClientError::config)?
            .map(Duration::from_secs)
            .unwrap_or(defaults.connect_timeout);
        let request_timeout = env_parse::<u64>(STORYLOOM_HTTP_REQUEST_TIMEOUT_SECS)
            .map_err(ClientError::config)?
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        let config = Self {
            record_url,
            api_url,
            page_size,
            connect_timeout,
            request_timeout,
            auth_file: env_string(STORYLOOM_AUTH_FILE).map(PathBuf::from),
        };
        config.validate()?;
        Ok(config)
    }

    /// Point both clients at explicit URLs, keeping the other defaults
    pub fn with_urls(record_url: &str, api_url: &str) -> ClientResult<Self> {
        let config = Self {
            record_url: parse_base_url("record_url", record_url)?,
            api_url: parse_base_url("api_url", api_url)?,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ClientResult<()> {
        parse_base_url("record_url", &self.record_url)?;
        parse_base_url("api_url", &self.api_url)?;
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ClientError::config(format!(
                "Page size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.page_size
            )));
        }
        if self.connect_timeout.is_zero() || self.request_timeout.is_zero() {
            return Err(ClientError::config("HTTP timeouts must be greater than zero"));
        }
        Ok(())
    }
}

fn parse_base_url(name: &str, value: &str) -> ClientResult<String> {
    let url = Url::parse(value).map_err(|e| {
        ClientError::config(format!("{} is not a valid URL ({}): {}", name, value, e))
    })?;
    match url.scheme() {
        "http" | "https" => Ok(value.trim_end_matches('/').to_string()),
        scheme => Err(ClientError::config(format!(
            "{} must use http or https, got {}",
            name, scheme
        ))),
    }
}

/// Join a base URL and an absolute API path without losing a base path prefix
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Append path segments to a base URL, percent-encoding each segment
pub(crate) fn endpoint_url(base: &str, segments: &[&str]) -> ClientResult<Url> {
    let mut url = Url::parse(base)
        .map_err(|e| ClientError::config(format!("Invalid base URL {}: {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|_| ClientError::config(format!("{} cannot be a base URL", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

//! Credentials and endpoint configuration for the hosted checkout API.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SANDBOX_BASE_URL: &str = "https://app.mpowerpayments.com/sandbox-api/v1/";
pub const LIVE_BASE_URL: &str = "https://app.mpowerpayments.com/api/v1/";

pub const ENV_MASTER_KEY: &str = "CHECKOUT_MASTER_KEY";
pub const ENV_PRIVATE_KEY: &str = "CHECKOUT_PRIVATE_KEY";
pub const ENV_TOKEN: &str = "CHECKOUT_TOKEN";
pub const ENV_MODE: &str = "CHECKOUT_MODE";
pub const ENV_API_URL: &str = "CHECKOUT_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "CHECKOUT_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// Which processor environment requests are sent to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Sandbox,
    Live,
}

impl Mode {
    pub fn base_url(self) -> &'static str {
        match self {
            Mode::Sandbox => SANDBOX_BASE_URL,
            Mode::Live => LIVE_BASE_URL,
        }
    }
}

impl core::str::FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandbox" | "test" | "debug" => Ok(Mode::Sandbox),
            "live" | "production" => Ok(Mode::Live),
            other => Err(ConfigError::Invalid {
                key: ENV_MODE,
                reason: format!("expected sandbox or live, got {other:?}"),
            }),
        }
    }
}

/// Settings consumed by [`crate::HttpPayment`].
#[derive(Clone, PartialEq, Eq)]
pub struct PaymentConfig {
    pub master_key: String,
    pub private_key: String,
    pub token: String,
    pub mode: Mode,
    /// Overrides the mode's default base URL (useful for local mocks).
    pub base_url: Option<String>,
    pub timeout: Duration,
}

impl PaymentConfig {
    pub fn new(
        master_key: impl Into<String>,
        private_key: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            master_key: master_key.into(),
            private_key: private_key.into(),
            token: token.into(),
            mode: Mode::default(),
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let mut config = Self::new(
            require(ENV_MASTER_KEY)?,
            require(ENV_PRIVATE_KEY)?,
            require(ENV_TOKEN)?,
        );

        if let Some(mode) = get(ENV_MODE) {
            config.mode = mode.parse()?;
        }

        config.base_url = get(ENV_API_URL);

        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.parse().map_err(|e| ConfigError::Invalid {
                key: ENV_TIMEOUT_SECS,
                reason: format!("{e}"),
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Base URL requests are resolved against, always ending in `/`.
    pub fn base_url(&self) -> String {
        let base = self.base_url.as_deref().unwrap_or(self.mode.base_url());
        if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{base}/")
        }
    }

    /// Absolute URL for an endpoint such as `checkout-invoice/create`.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url(), endpoint.trim_start_matches('/'))
    }
}

// Keys stay out of logs.
impl core::fmt::Debug for PaymentConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PaymentConfig")
            .field("master_key", &"<redacted>")
            .field("private_key", &"<redacted>")
            .field("token", &"<redacted>")
            .field("mode", &self.mode)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

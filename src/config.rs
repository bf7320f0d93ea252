//! API configuration parsed from environment variables.
//!
//! Each endpoint group on the backend is versioned independently, so every
//! group carries its own base URL.

pub const DEFAULT_AUTH_URL: &str = "https://x8ki-letl-twmt.n7.xano.io/api:FYnzG7ev";
pub const DEFAULT_MESSAGES_URL: &str = "https://x8ki-letl-twmt.n7.xano.io/api:PtZzK0Pv";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Errors produced while building configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A base URL does not use an HTTP scheme.
    #[error("invalid URL in {var}: '{value}' (expected http:// or https://)")]
    InvalidUrl { var: &'static str, value: String },
}

/// Independently-addressed endpoint groups on the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointGroup {
    Auth,
    Messages,
    Analytics,
    Reviews,
    Checkout,
    Contact,
}

impl EndpointGroup {
    /// Short lowercase name used in logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Messages => "messages",
            Self::Analytics => "analytics",
            Self::Reviews => "reviews",
            Self::Checkout => "checkout",
            Self::Contact => "contact",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub auth_url: String,
    pub messages_url: String,
    pub analytics_url: String,
    pub reviews_url: String,
    pub checkout_url: String,
    pub contact_url: String,
    pub timeouts: HttpTimeouts,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            auth_url: DEFAULT_AUTH_URL.to_owned(),
            messages_url: DEFAULT_MESSAGES_URL.to_owned(),
            analytics_url: DEFAULT_AUTH_URL.to_owned(),
            reviews_url: DEFAULT_AUTH_URL.to_owned(),
            checkout_url: DEFAULT_AUTH_URL.to_owned(),
            contact_url: DEFAULT_AUTH_URL.to_owned(),
            timeouts: HttpTimeouts::default(),
        }
    }
}

impl ApiConfig {
    /// Build typed API config from environment variables.
    ///
    /// Optional:
    /// - `XANO_AUTH_URL`: auth group base URL
    /// - `XANO_MESSAGES_URL`: client-message group base URL
    /// - `XANO_ANALYTICS_URL`, `XANO_REVIEWS_URL`, `XANO_CHECKOUT_URL`,
    ///   `XANO_CONTACT_URL`: default to the resolved auth URL
    /// - `XANO_REQUEST_TIMEOUT_SECS`: default 30
    /// - `XANO_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if any supplied URL is not `http(s)://`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let auth_url = env_url("XANO_AUTH_URL", DEFAULT_AUTH_URL)?;
        let messages_url = env_url("XANO_MESSAGES_URL", DEFAULT_MESSAGES_URL)?;
        let analytics_url = env_url("XANO_ANALYTICS_URL", &auth_url)?;
        let reviews_url = env_url("XANO_REVIEWS_URL", &auth_url)?;
        let checkout_url = env_url("XANO_CHECKOUT_URL", &auth_url)?;
        let contact_url = env_url("XANO_CONTACT_URL", &auth_url)?;
        let timeouts = HttpTimeouts {
            request_secs: env_parse_u64("XANO_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("XANO_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self { auth_url, messages_url, analytics_url, reviews_url, checkout_url, contact_url, timeouts })
    }

    /// Point every endpoint group at one base URL.
    #[must_use]
    pub fn single_origin(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/').to_owned();
        Self {
            auth_url: base.clone(),
            messages_url: base.clone(),
            analytics_url: base.clone(),
            reviews_url: base.clone(),
            checkout_url: base.clone(),
            contact_url: base,
            timeouts: HttpTimeouts::default(),
        }
    }

    /// Base URL for an endpoint group, without a trailing slash.
    #[must_use]
    pub fn base_url(&self, group: EndpointGroup) -> &str {
        match group {
            EndpointGroup::Auth => &self.auth_url,
            EndpointGroup::Messages => &self.messages_url,
            EndpointGroup::Analytics => &self.analytics_url,
            EndpointGroup::Reviews => &self.reviews_url,
            EndpointGroup::Checkout => &self.checkout_url,
            EndpointGroup::Contact => &self.contact_url,
        }
    }
}

fn env_url(var: &'static str, default: &str) -> Result<String, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_owned());
    parse_base_url(var, &raw)
}

fn parse_base_url(var: &'static str, raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("https://") || trimmed.starts_with("http://") {
        Ok(trimmed.to_owned())
    } else {
        Err(ConfigError::InvalidUrl { var, value: raw.to_owned() })
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .map_or(default, |v| v.trim().parse::<u64>().unwrap_or(default))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

//! Client configuration.
//!
//! `ClientConfig` carries the defaults that outcome declarations and the
//! transport pick up: user agent, the per-request outcome limit, the body size
//! limit and the settings of the built-in deserializers. There is no global
//! instance; callers own a config (usually behind an `Arc`) and pass it to
//! every [`TypedRequest`](crate::TypedRequest) they build.
//!
//! # Examples
//!
//! ## Use defaults
//! ```rust
//! use gosub_outcomes::ClientConfig;
//! let cfg = ClientConfig::default();
//! assert_eq!(cfg.max_outcomes, 8);
//! ```
//!
//! ## Customize with the builder
//! ```rust
//! use gosub_outcomes::ClientConfig;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = ClientConfig::builder()
//!     .user_agent("Gosub/0.1")
//!     .max_outcomes(4)
//!     .max_body_size(1024 * 1024)
//!     .json_empty_as_null(true)
//!     .build()?; // returns Result<ClientConfig, ConfigError>
//! # Ok(()) }
//! ```
//!
//! # Errors
//!
//! Builder validation returns [`ConfigError`] when `max_outcomes` or
//! `max_body_size` is zero, or the user agent is empty.

use std::fmt;

const DEFAULT_USER_AGENT: &str = "Gosub/1.0 (X11; Linux x86_64) Gecko/20250802 GosubBrowser/1.0";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// User agent string for HTTP requests
    pub user_agent: String,
    /// How many outcomes might be declared on a single request
    pub max_outcomes: usize,
    /// Largest body (in bytes) the built-in deserializers will buffer
    pub max_body_size: usize,
    /// Charset used by the text deserializer when the response doesn't name one
    pub default_charset: String,
    /// Treat an empty body as JSON `null`
    pub json_empty_as_null: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_outcomes: 8,
            max_body_size: 16 * 1024 * 1024,
            default_charset: "utf-8".to_string(),
            json_empty_as_null: false,
        }
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    inner: ClientConfig,
}

impl ClientConfigBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut ClientConfig)) -> Self {
        f(&mut self.inner);
        self
    }

    pub fn user_agent<S: Into<String>>(self, ua: S) -> Self { self.map(|c| c.user_agent = ua.into()) }
    pub fn max_outcomes(self, n: usize) -> Self { self.map(|c| c.max_outcomes = n) }
    pub fn max_body_size(self, bytes: usize) -> Self { self.map(|c| c.max_body_size = bytes) }
    pub fn default_charset<S: Into<String>>(self, cs: S) -> Self { self.map(|c| c.default_charset = cs.into()) }
    pub fn json_empty_as_null(self, on: bool) -> Self { self.map(|c| c.json_empty_as_null = on) }

    /// Apply multiple changes in one go.
    pub fn with(self, f: impl FnOnce(&mut ClientConfig)) -> Self { self.map(f) }

    /// Validate and build the final config.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        validate(&self.inner)?;
        Ok(self.inner)
    }
}

// ---------- Validation ----------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    ZeroOutcomes,
    ZeroBodySize,
    EmptyUserAgent,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroOutcomes => write!(f, "max_outcomes must be at least 1"),
            ConfigError::ZeroBodySize => write!(f, "max_body_size must be at least 1 byte"),
            ConfigError::EmptyUserAgent => write!(f, "user_agent must not be empty"),
        }
    }
}
impl std::error::Error for ConfigError {}

fn validate(c: &ClientConfig) -> Result<(), ConfigError> {
    if c.max_outcomes == 0 {
        return Err(ConfigError::ZeroOutcomes);
    }
    if c.max_body_size == 0 {
        return Err(ConfigError::ZeroBodySize);
    }
    if c.user_agent.trim().is_empty() {
        return Err(ConfigError::EmptyUserAgent);
    }
    Ok(())
}

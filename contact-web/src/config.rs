//! Configuration module for environment variable parsing.
//!
//! Everything is read once at startup into [`Config`] and then shared
//! read-only with the handler and the outbound clients.

use std::env;
use std::str::FromStr;

use thiserror::Error;
use tracing::warn;
use url::Url;

/// Default Cloudflare Turnstile siteverify endpoint.
pub const DEFAULT_TURNSTILE_VERIFY_URL: &str =
    "https://challenges.cloudflare.com/turnstile/v0/siteverify";

/// Default Resend send-email endpoint.
pub const DEFAULT_RESEND_API_URL: &str = "https://api.resend.com/emails";

/// Header set by Cloudflare with the connecting client's address.
pub const DEFAULT_CLIENT_IP_HEADER: &str = "CF-Connecting-IP";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Turnstile shared secret
    pub turnstile_secret_key: String,

    /// Turnstile siteverify endpoint
    pub turnstile_verify_url: String,

    /// Resend API key, sent as a bearer token
    pub resend_api_key: String,

    /// Resend send-email endpoint
    pub resend_api_url: String,

    /// Fixed sender address, e.g. "Site <contact@example.com>"
    pub contact_from: String,

    /// Fixed recipient address
    pub contact_to: String,

    /// Header carrying the caller's IP address
    pub client_ip_header: String,

    /// HTTP request timeout in milliseconds for outbound calls
    pub request_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Config {
            port: parse_or_warn("PORT", 8080),

            turnstile_secret_key: required("TURNSTILE_SECRET_KEY")?,

            turnstile_verify_url: parse_url("TURNSTILE_VERIFY_URL", DEFAULT_TURNSTILE_VERIFY_URL),

            resend_api_key: required("RESEND_API_KEY")?,

            resend_api_url: parse_url("RESEND_API_URL", DEFAULT_RESEND_API_URL),

            contact_from: required("CONTACT_FROM")?,

            contact_to: required("CONTACT_TO")?,

            client_ip_header: env::var("CLIENT_IP_HEADER")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_CLIENT_IP_HEADER.to_string()),

            request_timeout_ms: parse_or_warn("REQUEST_TIMEOUT_MS", 8000),
        })
    }
}

/// Read a variable that must be present and non-blank.
fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingVar(name))
}

/// Parse an optional value, falling back to the default when unset or malformed.
fn parse_or_warn<T: FromStr>(name: &str, default: T) -> T {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid value, using default");
            default
        }
    }
}

/// Read an endpoint URL, falling back to the default when unset or invalid.
fn parse_url(name: &str, default: &str) -> String {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default.to_string(),
    };

    match Url::parse(raw.trim()) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => url.to_string(),
        Ok(url) => {
            warn!(env_var = name, scheme = url.scheme(), "Unsupported URL scheme, using default");
            default.to_string()
        }
        Err(e) => {
            warn!(env_var = name, value = %raw, error = %e, "Invalid URL, using default");
            default.to_string()
        }
    }
}

//! CAPTCHA verification.
//!
//! The handler only sees [`VerificationClient`]; [`TurnstileClient`] is the
//! production implementation backed by Cloudflare's siteverify API.

pub mod turnstile;

use async_trait::async_trait;

use crate::error::ClientError;

pub use turnstile::TurnstileClient;

/// Result of checking a token with the verification service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationOutcome {
    pub success: bool,
    /// Reason codes reported by the service, kept for logging.
    pub error_codes: Vec<String>,
}

impl VerificationOutcome {
    pub fn passed() -> Self {
        Self {
            success: true,
            error_codes: Vec::new(),
        }
    }

    pub fn rejected(error_codes: Vec<String>) -> Self {
        Self {
            success: false,
            error_codes,
        }
    }
}

#[async_trait]
pub trait VerificationClient: Send + Sync {
    /// Check `token` on behalf of the caller at `remote_ip`.
    async fn verify(
        &self,
        token: &str,
        remote_ip: Option<&str>,
    ) -> Result<VerificationOutcome, ClientError>;
}

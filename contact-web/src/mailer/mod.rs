//! Outbound email delivery.
//!
//! The handler only sees [`EmailClient`]; [`ResendClient`] is the production
//! implementation backed by the Resend HTTP API.

pub mod resend;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::ClientError;

pub use resend::ResendClient;

/// A plaintext email ready to hand to the delivery service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: Vec<String>,
    pub reply_to: String,
    pub subject: String,
    pub text: String,
}

/// What the email service said about a send attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailDispatchResult {
    pub success: bool,
    pub status: u16,
    /// Message id assigned by the service on success.
    pub id: Option<String>,
    /// Raw response body on failure.
    pub detail: Option<String>,
}

#[async_trait]
pub trait EmailClient: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<EmailDispatchResult, ClientError>;
}

//! Contact form backend.
//!
//! Accepts a JSON contact form submission, checks it, verifies the
//! Cloudflare Turnstile token and forwards the message through Resend.
//!
//! ## Architecture
//!
//! ```text
//! POST /api/contact → validate → Turnstile siteverify → Resend → {"ok": true}
//! ```

pub mod captcha;
pub mod config;
pub mod contact;
pub mod error;
pub mod mailer;
pub mod web;

// Re-export commonly used types
pub use captcha::{TurnstileClient, VerificationClient, VerificationOutcome};
pub use config::{Config, ConfigError};
pub use contact::{compose_email, Submission};
pub use error::{ClientError, ContactError};
pub use mailer::{EmailClient, EmailDispatchResult, OutboundEmail, ResendClient};
pub use web::{router, AppState};

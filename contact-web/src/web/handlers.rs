//! Contact endpoint handlers.
//!
//! The contact handler is a linear chain of checks that stops at the first
//! failure:
//! 1. Content type and JSON body
//! 2. Honeypot (silently accepted)
//! 3. Required fields, length, captcha token
//! 4. Captcha verification
//! 5. Email dispatch
//!
//! Dispatch only happens after verification has succeeded.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::captcha::{TurnstileClient, VerificationClient};
use crate::contact::{compose_email, Submission};
use crate::error::{no_store_json, ContactError};
use crate::mailer::{EmailClient, ResendClient};
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub verifier: Arc<dyn VerificationClient>,
    pub mailer: Arc<dyn EmailClient>,
}

impl AppState {
    pub fn new(
        config: Config,
        verifier: Arc<dyn VerificationClient>,
        mailer: Arc<dyn EmailClient>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            verifier,
            mailer,
        }
    }

    /// Build state with the Turnstile and Resend clients sharing one HTTP pool.
    pub fn from_config(config: Config) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        let verifier = TurnstileClient::new(
            http.clone(),
            config.turnstile_verify_url.clone(),
            config.turnstile_secret_key.clone(),
        );
        let mailer = ResendClient::new(
            http,
            config.resend_api_url.clone(),
            config.resend_api_key.clone(),
        );

        Ok(Self::new(config, Arc::new(verifier), Arc::new(mailer)))
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Contact Form
// =============================================================================

/// Largest request body buffered by the contact handler.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Success body, `{"ok": true}`.
#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

/// How an accepted submission was dealt with. Both render identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactAccepted {
    /// Honeypot tripped; nothing was verified or sent.
    Discarded,
    /// Verified and handed to the email service.
    Delivered,
}

impl IntoResponse for ContactAccepted {
    fn into_response(self) -> Response {
        no_store_json(StatusCode::OK, OkResponse { ok: true })
    }
}

/// Contact form endpoint.
pub async fn submit_contact(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Body,
) -> Result<ContactAccepted, ContactError> {
    let result = process_contact(&state, &headers, body).await;

    if let Err(e) = &result {
        warn!(
            status_code = e.status().as_u16(),
            reason = %e,
            "contact_rejected"
        );
    }

    result
}

async fn process_contact(
    state: &AppState,
    headers: &HeaderMap,
    body: Body,
) -> Result<ContactAccepted, ContactError> {
    if !is_json_request(headers) {
        return Err(ContactError::UnsupportedMediaType);
    }

    // Content type is checked before anything is read off the wire.
    let body = to_bytes(body, MAX_BODY_BYTES).await.map_err(|e| {
        warn!(error = %e, limit_bytes = MAX_BODY_BYTES, "contact_body_read_failed");
        ContactError::PayloadTooLarge
    })?;

    let submission = Submission::from_json(&body)?;

    info!(
        has_name = !submission.name.is_empty(),
        has_email = !submission.email.is_empty(),
        message_length = submission.message.chars().count(),
        has_captcha_token = submission.captcha_token.is_some(),
        "contact_received"
    );

    if submission.is_spam() {
        info!(company_length = submission.company.len(), "contact_honeypot_tripped");
        return Ok(ContactAccepted::Discarded);
    }

    let token = submission.validate()?;

    let remote_ip = headers
        .get(state.config.client_ip_header.as_str())
        .and_then(|v| v.to_str().ok());

    match state.verifier.verify(token, remote_ip).await {
        Ok(outcome) if outcome.success => {
            info!("captcha_verified");
        }
        Ok(outcome) => {
            warn!(error_codes = ?outcome.error_codes, "captcha_rejected");
            return Err(ContactError::CaptchaFailed);
        }
        Err(e) => {
            error!(error = %e, "captcha_verify_failed");
            return Err(ContactError::CaptchaFailed);
        }
    }

    let email = compose_email(
        &submission,
        &state.config.contact_from,
        &state.config.contact_to,
    );

    match state.mailer.send(&email).await {
        Ok(result) if result.success => {
            info!(email_id = ?result.id, "contact_delivered");
            Ok(ContactAccepted::Delivered)
        }
        Ok(result) => {
            error!(status_code = result.status, "email_dispatch_failed");
            Err(ContactError::email_failed(
                result.detail.as_deref().unwrap_or_default(),
            ))
        }
        Err(e) => {
            error!(error = %e, "email_dispatch_failed");
            Err(ContactError::email_failed(&e.to_string()))
        }
    }
}

/// Whether the declared content type is JSON.
fn is_json_request(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.to_ascii_lowercase().contains("application/json"))
        .unwrap_or(false)
}

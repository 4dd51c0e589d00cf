//! Error types for the contact endpoint.
//!
//! Every rejection the handler can produce is a [`ContactError`] variant, and
//! each variant maps to exactly one status code and JSON body.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Maximum number of characters of upstream error text surfaced to callers.
pub const DETAIL_MAX_CHARS: usize = 400;

/// Reasons a contact submission is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContactError {
    #[error("Expected JSON")]
    UnsupportedMediaType,

    #[error("Invalid JSON")]
    InvalidJson,

    #[error("Payload too large")]
    PayloadTooLarge,

    #[error("Missing required fields")]
    MissingFields,

    #[error("Message too long")]
    MessageTooLong,

    #[error("Missing captcha token")]
    MissingCaptchaToken,

    #[error("Captcha failed")]
    CaptchaFailed,

    /// The email service did not accept the message.
    #[error("Resend failed")]
    EmailFailed { detail: String },
}

impl ContactError {
    pub fn status(&self) -> StatusCode {
        match self {
            ContactError::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ContactError::InvalidJson
            | ContactError::MissingFields
            | ContactError::MessageTooLong
            | ContactError::MissingCaptchaToken => StatusCode::BAD_REQUEST,
            ContactError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ContactError::CaptchaFailed => StatusCode::FORBIDDEN,
            ContactError::EmailFailed { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    /// Build an [`ContactError::EmailFailed`] with the detail cut to
    /// [`DETAIL_MAX_CHARS`].
    pub fn email_failed(detail: &str) -> Self {
        ContactError::EmailFailed {
            detail: truncate_chars(detail, DETAIL_MAX_CHARS).to_string(),
        }
    }
}

/// Failures talking to the verification or email service.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request timed out")]
    Timeout,

    #[error("HTTP request failed: {0}")]
    Http(reqwest::Error),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Http(e)
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = self.to_string();
        let detail = match self {
            ContactError::EmailFailed { detail } => Some(detail),
            _ => None,
        };
        no_store_json(status, ErrorBody { error, detail })
    }
}

/// JSON response that intermediaries must never cache.
pub fn no_store_json<T: Serialize>(status: StatusCode, body: T) -> Response {
    (status, [(header::CACHE_CONTROL, "no-store")], Json(body)).into_response()
}

/// Return at most the first `max` characters of `s`.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_map_correctly() {
        assert_eq!(ContactError::UnsupportedMediaType.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(ContactError::InvalidJson.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ContactError::MissingFields.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ContactError::MessageTooLong.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ContactError::MissingCaptchaToken.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ContactError::PayloadTooLarge.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(ContactError::CaptchaFailed.status(), StatusCode::FORBIDDEN);
        assert_eq!(ContactError::email_failed("x").status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_response_headers() {
        let resp = ContactError::CaptchaFailed.into_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(resp.headers()[header::CACHE_CONTROL], "no-store");
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_error_body_omits_empty_detail() {
        let body = serde_json::to_value(ErrorBody {
            error: ContactError::MissingFields.to_string(),
            detail: None,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"error": "Missing required fields"}));
    }

    #[test]
    fn test_email_failed_truncates_detail() {
        let long = "é".repeat(DETAIL_MAX_CHARS + 50);
        match ContactError::email_failed(&long) {
            ContactError::EmailFailed { detail } => {
                assert_eq!(detail.chars().count(), DETAIL_MAX_CHARS)
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("rate limited", 400), "rate limited");
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("", 3), "");
        assert_eq!(truncate_chars("日本語テキスト", 2), "日本");
    }
}

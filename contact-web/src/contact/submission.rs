//! Parsing and validation of contact form submissions.
//!
//! The body is untrusted JSON. Fields are coerced to strings the way a
//! lenient form backend would: missing or falsy values become empty strings
//! and never propagate further as nulls.

use serde_json::Value;

use crate::error::ContactError;

/// Longest accepted message, in characters.
pub const MESSAGE_MAX_CHARS: usize = 5000;

/// Field carrying the Turnstile widget token.
pub const TOKEN_FIELD: &str = "cf-turnstile-response";

/// A single contact form submission, built fresh per request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    pub name: String,
    pub email: String,
    pub message: String,
    /// Honeypot field. Humans never see it, so it must stay empty.
    pub company: String,
    pub captcha_token: Option<String>,
}

impl Submission {
    /// Parse a raw request body.
    ///
    /// Bodies that are not JSON, or that decode to an empty value
    /// (`null`, `false`, `0`, `""`), are rejected as invalid.
    pub fn from_json(body: &[u8]) -> Result<Self, ContactError> {
        let value: Value = serde_json::from_slice(body).map_err(|_| ContactError::InvalidJson)?;

        if !is_truthy(&value) {
            return Err(ContactError::InvalidJson);
        }

        Ok(Self::from_value(&value))
    }

    /// Extract and trim the known fields from a decoded body.
    pub fn from_value(value: &Value) -> Self {
        let field = |key: &str| coerce(value.get(key)).trim().to_string();

        let token = coerce(value.get(TOKEN_FIELD));

        Submission {
            name: field("name"),
            email: field("email"),
            message: field("message"),
            company: field("company"),
            captcha_token: (!token.is_empty()).then_some(token),
        }
    }

    /// Whether the honeypot field was filled in.
    pub fn is_spam(&self) -> bool {
        !self.company.is_empty()
    }

    /// Run the field checks in order and hand back the captcha token.
    pub fn validate(&self) -> Result<&str, ContactError> {
        if self.email.is_empty() || self.message.is_empty() {
            return Err(ContactError::MissingFields);
        }

        if self.message.chars().count() > MESSAGE_MAX_CHARS {
            return Err(ContactError::MessageTooLong);
        }

        self.captcha_token
            .as_deref()
            .ok_or(ContactError::MissingCaptchaToken)
    }
}

/// JSON values that count as "nothing there".
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Render a field as a string; absent and falsy values become "".
fn coerce(value: Option<&Value>) -> String {
    match value {
        Some(v) if is_truthy(v) => match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        },
        _ => String::new(),
    }
}

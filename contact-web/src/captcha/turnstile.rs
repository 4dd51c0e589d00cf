//! Cloudflare Turnstile token verification.
//!
//! Reference: https://developers.cloudflare.com/turnstile/get-started/server-side-validation/

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{VerificationClient, VerificationOutcome};
use crate::error::ClientError;

#[derive(Debug, Serialize)]
struct SiteverifyRequest<'a> {
    secret: &'a str,
    response: &'a str,
    remoteip: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct SiteverifyResponse {
    #[serde(default)]
    success: bool,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

/// Turnstile siteverify client.
#[derive(Clone)]
pub struct TurnstileClient {
    http: Client,
    verify_url: String,
    secret: String,
}

impl TurnstileClient {
    pub fn new(http: Client, verify_url: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            http,
            verify_url: verify_url.into(),
            secret: secret.into(),
        }
    }
}

#[async_trait]
impl VerificationClient for TurnstileClient {
    async fn verify(
        &self,
        token: &str,
        remote_ip: Option<&str>,
    ) -> Result<VerificationOutcome, ClientError> {
        info!(
            token_length = token.len(),
            has_remote_ip = remote_ip.is_some(),
            "turnstile_verify_starting"
        );

        let resp = self
            .http
            .post(&self.verify_url)
            .json(&SiteverifyRequest {
                secret: &self.secret,
                response: token,
                remoteip: remote_ip,
            })
            .send()
            .await?;

        let status = resp.status().as_u16();
        let body = resp.text().await?;

        // An unreadable answer is a failed verification, not an error.
        let outcome = match serde_json::from_str::<SiteverifyResponse>(&body) {
            Ok(parsed) if parsed.success => VerificationOutcome::passed(),
            Ok(parsed) => VerificationOutcome::rejected(parsed.error_codes),
            Err(e) => {
                warn!(
                    status_code = status,
                    error = %e,
                    body_length = body.len(),
                    "turnstile_response_parse_failed"
                );
                VerificationOutcome::rejected(Vec::new())
            }
        };

        info!(
            status_code = status,
            success = outcome.success,
            error_codes = ?outcome.error_codes,
            "turnstile_verify_complete"
        );

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn client(server: &Server) -> TurnstileClient {
        TurnstileClient::new(
            Client::new(),
            format!("{}/siteverify", server.url()),
            "test-secret",
        )
    }

    #[tokio::test]
    async fn test_verify_success() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("POST", "/siteverify")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "secret": "test-secret",
                "response": "tok",
                "remoteip": "203.0.113.7"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success": true, "error-codes": []}"#)
            .create_async()
            .await;

        let outcome = client(&server).verify("tok", Some("203.0.113.7")).await.unwrap();

        mock.assert_async().await;
        assert_eq!(outcome, VerificationOutcome::passed());
    }

    #[tokio::test]
    async fn test_verify_sends_null_remoteip_when_unknown() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("POST", "/siteverify")
            .match_body(Matcher::Json(json!({
                "secret": "test-secret",
                "response": "tok",
                "remoteip": null
            })))
            .with_status(200)
            .with_body(r#"{"success": true}"#)
            .create_async()
            .await;

        let outcome = client(&server).verify("tok", None).await.unwrap();

        mock.assert_async().await;
        assert!(outcome.success);
    }

    #[tokio::test]
    async fn test_verify_rejected_keeps_error_codes() {
        let mut server = Server::new_async().await;

        let _mock = server
            .mock("POST", "/siteverify")
            .with_status(200)
            .with_body(r#"{"success": false, "error-codes": ["invalid-input-response"]}"#)
            .create_async()
            .await;

        let outcome = client(&server).verify("bad", None).await.unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.error_codes, vec!["invalid-input-response".to_string()]);
    }

    #[tokio::test]
    async fn test_verify_unparsable_response_is_failure() {
        let mut server = Server::new_async().await;

        let _mock = server
            .mock("POST", "/siteverify")
            .with_status(502)
            .with_body("<html>Bad Gateway</html>")
            .create_async()
            .await;

        let outcome = client(&server).verify("tok", None).await.unwrap();

        assert_eq!(outcome, VerificationOutcome::rejected(Vec::new()));
    }

    #[tokio::test]
    async fn test_verify_connection_error() {
        let client = TurnstileClient::new(Client::new(), "http://127.0.0.1:1/siteverify", "s");

        let result = client.verify("tok", None).await;

        assert!(matches!(result, Err(ClientError::Http(_))));
    }
}

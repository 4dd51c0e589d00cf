//! Resend email API client.
//!
//! Reference: https://resend.com/docs/api-reference/emails/send-email

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};

use super::{EmailClient, EmailDispatchResult, OutboundEmail};
use crate::error::ClientError;

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: Option<String>,
}

/// Resend send-email client.
#[derive(Clone)]
pub struct ResendClient {
    http: Client,
    api_url: String,
    api_key: String,
}

impl ResendClient {
    pub fn new(http: Client, api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_url: api_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl EmailClient for ResendClient {
    async fn send(&self, email: &OutboundEmail) -> Result<EmailDispatchResult, ClientError> {
        info!(
            recipients = email.to.len(),
            subject_length = email.subject.len(),
            text_length = email.text.len(),
            "resend_send_starting"
        );

        let resp = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await?;

        let status = resp.status();

        if status.is_success() {
            // The id is informational; a body we cannot read does not undo the send.
            let id = resp
                .json::<SendResponse>()
                .await
                .ok()
                .and_then(|r| r.id);

            info!(status_code = status.as_u16(), email_id = ?id, "resend_send_complete");

            return Ok(EmailDispatchResult {
                success: true,
                status: status.as_u16(),
                id,
                detail: None,
            });
        }

        let detail = resp.text().await.unwrap_or_default();

        warn!(
            status_code = status.as_u16(),
            detail_length = detail.len(),
            "resend_send_rejected"
        );

        Ok(EmailDispatchResult {
            success: false,
            status: status.as_u16(),
            id: None,
            detail: Some(detail),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn email() -> OutboundEmail {
        OutboundEmail {
            from: "Site <contact@site.test>".to_string(),
            to: vec!["owner@site.test".to_string()],
            reply_to: "ann@x.com".to_string(),
            subject: "New message from Ann (ann@x.com)".to_string(),
            text: "Name: Ann\nEmail: ann@x.com\n\nHi".to_string(),
        }
    }

    fn client(server: &Server) -> ResendClient {
        ResendClient::new(Client::new(), format!("{}/emails", server.url()), "re_test_key")
    }

    #[tokio::test]
    async fn test_send_success() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("POST", "/emails")
            .match_header("authorization", "Bearer re_test_key")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "from": "Site <contact@site.test>",
                "to": ["owner@site.test"],
                "reply_to": "ann@x.com",
                "subject": "New message from Ann (ann@x.com)",
                "text": "Name: Ann\nEmail: ann@x.com\n\nHi"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": "49a3999c-0ce1-4ea6-ab68-afcd6dc2e794"}"#)
            .create_async()
            .await;

        let result = client(&server).send(&email()).await.unwrap();

        mock.assert_async().await;
        assert!(result.success);
        assert_eq!(result.status, 200);
        assert_eq!(result.id.as_deref(), Some("49a3999c-0ce1-4ea6-ab68-afcd6dc2e794"));
        assert!(result.detail.is_none());
    }

    #[tokio::test]
    async fn test_send_success_without_id() {
        let mut server = Server::new_async().await;

        let _mock = server
            .mock("POST", "/emails")
            .with_status(202)
            .with_body("accepted")
            .create_async()
            .await;

        let result = client(&server).send(&email()).await.unwrap();

        assert!(result.success);
        assert!(result.id.is_none());
    }

    #[tokio::test]
    async fn test_send_rejected_returns_body() {
        let mut server = Server::new_async().await;

        let _mock = server
            .mock("POST", "/emails")
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;

        let result = client(&server).send(&email()).await.unwrap();

        assert!(!result.success);
        assert_eq!(result.status, 429);
        assert_eq!(result.detail.as_deref(), Some("rate limited"));
    }

    #[tokio::test]
    async fn test_send_connection_error() {
        let client = ResendClient::new(Client::new(), "http://127.0.0.1:1/emails", "key");

        let result = client.send(&email()).await;

        assert!(matches!(result, Err(ClientError::Http(_))));
    }
}

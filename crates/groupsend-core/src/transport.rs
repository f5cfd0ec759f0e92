//! Outbound mail transport.
//!
//! The dispatcher talks to a [`MailTransport`]: hand over a URL-safe
//! base64 raw MIME document plus a mailbox identifier, get back a message
//! id or an error. The production implementation posts to the Gmail
//! `messages/send` endpoint; token acquisition (OAuth) happens outside
//! this crate and arrives as a ready access token.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default API base URL.
const GMAIL_BASE_URL: &str = "https://gmail.googleapis.com";

/// Errors that can occur while sending.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// HTTP request failed (connection, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API rejected the request.
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the response body, or the raw body.
        message: String,
    },

    /// The API accepted the send but returned no message id.
    #[error("Send response carried no message id")]
    MissingMessageId,
}

/// Opaque acknowledgment for a sent message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    /// Provider-assigned message identifier.
    pub message_id: String,
}

/// A transport that delivers one composed message per call.
pub trait MailTransport {
    /// Sends a raw (URL-safe base64) MIME document from `mailbox`.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if delivery fails. One attempt per
    /// call; retry policy is the caller's concern (the batch run makes
    /// none).
    fn send(&self, mailbox: &str, raw: &str) -> Result<SendReceipt, TransportError>;
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    raw: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

/// Gmail REST transport using a bearer access token.
#[derive(Debug)]
pub struct GmailTransport {
    client: reqwest::blocking::Client,
    base_url: String,
    access_token: String,
}

impl GmailTransport {
    /// Creates a transport against the production Gmail API.
    #[must_use]
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_base_url(access_token, GMAIL_BASE_URL)
    }

    /// Creates a transport against a custom base URL (tests point this at
    /// a local server).
    #[must_use]
    pub fn with_base_url(access_token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.into(),
            access_token: access_token.into(),
        }
    }
}

impl MailTransport for GmailTransport {
    fn send(&self, mailbox: &str, raw: &str) -> Result<SendReceipt, TransportError> {
        let url = format!(
            "{}/gmail/v1/users/{mailbox}/messages/send",
            self.base_url
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&SendRequest { raw })
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .and_then(|e| e.message)
                .unwrap_or(body);
            return Err(TransportError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: SendResponse = response.json()?;
        let message_id = parsed.id.ok_or(TransportError::MissingMessageId)?;
        debug!(%message_id, "Message accepted by transport");

        Ok(SendReceipt { message_id })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_send_request_serializes_raw() {
        let json = serde_json::to_string(&SendRequest { raw: "AbCd_-" }).unwrap();
        assert_eq!(json, r#"{"raw":"AbCd_-"}"#);
    }

    #[test]
    fn test_send_response_parses_id() {
        let parsed: SendResponse =
            serde_json::from_str(r#"{"id":"18f3a","threadId":"18f3a"}"#).unwrap();
        assert_eq!(parsed.id.as_deref(), Some("18f3a"));
    }

    #[test]
    fn test_api_error_body_message() {
        let body = r#"{"error":{"code":400,"message":"Invalid To header"}}"#;
        let parsed: ApiErrorBody = serde_json::from_str(body).unwrap();
        assert_eq!(
            parsed.error.and_then(|e| e.message).as_deref(),
            Some("Invalid To header")
        );
    }
}

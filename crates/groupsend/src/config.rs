//! Environment-based configuration.
//!
//! The job is driven entirely by environment variables (typically set by
//! the invoking shell or a `.env`-style wrapper); there are no CLI flags.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Required: path to the `Name;Email` group table.
pub const ENV_TABLE_FILE: &str = "GROUPSEND_TABLE_FILE";
/// Required: directory holding the PDFs to batch.
pub const ENV_PDF_DIR: &str = "GROUPSEND_PDF_DIR";
/// Required: subject line for every outgoing message.
pub const ENV_MAIL_SUBJECT: &str = "GROUPSEND_MAIL_SUBJECT";
/// Required: path to the shared HTML body template.
pub const ENV_HTML_BODY_FILE: &str = "GROUPSEND_HTML_BODY_FILE";
/// Optional: ask for confirmation before each send (`1`, `true`, `yes`).
pub const ENV_ASK_BEFORE_SEND: &str = "GROUPSEND_ASK_BEFORE_SEND";
/// Optional: mailbox identifier for the send API (defaults to `me`).
pub const ENV_MAILBOX: &str = "GROUPSEND_MAILBOX";
/// Required: OAuth access token for the send API.
pub const ENV_ACCESS_TOKEN: &str = "GROUPSEND_ACCESS_TOKEN";

/// Resolved run configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Group table path.
    pub table_file: PathBuf,
    /// PDF source directory.
    pub pdf_dir: PathBuf,
    /// Subject for every message.
    pub mail_subject: String,
    /// HTML body template path.
    pub html_body_file: PathBuf,
    /// Whether to prompt before each send.
    pub ask_before_sending: bool,
    /// Mailbox identifier handed to the transport.
    pub mailbox: String,
    /// Access token for the transport.
    pub access_token: String,
}

impl Config {
    /// Reads the configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first missing required variable;
    /// startup-fatal for the caller.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            table_file: require(ENV_TABLE_FILE)?.into(),
            pdf_dir: require(ENV_PDF_DIR)?.into(),
            mail_subject: require(ENV_MAIL_SUBJECT)?,
            html_body_file: require(ENV_HTML_BODY_FILE)?.into(),
            ask_before_sending: truthy(env::var(ENV_ASK_BEFORE_SEND).ok().as_deref()),
            mailbox: env::var(ENV_MAILBOX).unwrap_or_else(|_| "me".to_string()),
            access_token: require(ENV_ACCESS_TOKEN)?,
        })
    }
}

fn require(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("Missing required environment variable {name}"))
}

fn truthy(value: Option<&str>) -> bool {
    matches!(
        value.map(str::trim).map(str::to_ascii_lowercase).as_deref(),
        Some("1" | "true" | "yes")
    )
}

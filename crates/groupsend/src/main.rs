//! groupsend — one-shot batch mailer.
//!
//! Scans a PDF directory, groups files by the first two tokens of their
//! names, emails each group's files to the address from the group table,
//! and moves sent files into the `old` subfolder. Processes the folder
//! once and exits.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod config;
mod confirm;

use anyhow::{Context, Result};
use groupsend_core::{Dispatcher, GmailTransport, GroupOutcome, GroupTable};
use std::fs;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use confirm::StdinGate;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "groupsend=debug,groupsend_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // Startup-fatal: without the body template no group is processed
    let html_body = fs::read_to_string(&config.html_body_file).with_context(|| {
        format!(
            "Failed to read HTML body file {}",
            config.html_body_file.display()
        )
    })?;

    let table = GroupTable::load(&config.table_file)
        .with_context(|| format!("Failed to load group table {}", config.table_file.display()))?;
    info!(groups = table.len(), "Group table loaded");

    let transport = GmailTransport::new(&config.access_token);

    let mut dispatcher = Dispatcher::new(
        &table,
        &transport,
        &config.mailbox,
        &config.mail_subject,
        &html_body,
    );
    if config.ask_before_sending {
        dispatcher = dispatcher.with_gate(StdinGate);
    }

    let outcomes = dispatcher
        .run(&config.pdf_dir)
        .context("Dispatch run aborted")?;

    let mut sent = 0usize;
    let mut skipped = 0usize;
    let mut failed = 0usize;
    for (group, outcome) in &outcomes {
        match outcome {
            GroupOutcome::Sent { message_id, archived } => {
                sent += 1;
                if !archived {
                    warn!(%group, %message_id, "Sent but not archived");
                }
            }
            GroupOutcome::NoRecipient => skipped += 1,
            GroupOutcome::SendFailed(_) => failed += 1,
        }
    }

    info!(
        groups = outcomes.len(),
        sent, skipped, failed, "Run complete"
    );

    Ok(())
}

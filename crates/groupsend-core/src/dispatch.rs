//! The dispatch loop: scan, group, then lookup → compose → send → archive
//! per group.
//!
//! Groups are processed strictly in order, one at a time; group N's send
//! and archive complete before group N+1 is touched. A failure inside one
//! group is recorded and the run continues — only an operator decline at
//! the confirmation gate aborts the whole run.

use crate::archive::{ARCHIVE_SUBFOLDER, archive_files};
use crate::error::{Error, Result};
use crate::listing::{FileGroup, scan_groups};
use crate::table::GroupTable;
use crate::transport::MailTransport;
use groupsend_mime::encoding::encode_base64_url;
use groupsend_mime::{Attachment, MessageBuilder};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Per-group result of a dispatch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupOutcome {
    /// The message was accepted by the transport.
    Sent {
        /// Provider-assigned message identifier.
        message_id: String,
        /// False when the post-send archive move failed; the message is
        /// already delivered, so this is a cleanup inconsistency and is
        /// never retried as a resend.
        archived: bool,
    },
    /// The group name has no row in the table; nothing was sent and the
    /// files stay in place.
    NoRecipient,
    /// Composing or sending failed; the files stay in place.
    SendFailed(String),
}

/// Per-group human veto. Declining aborts the entire run.
pub trait ConfirmGate {
    /// Asks whether the group's message should be sent.
    fn confirm(&mut self, group: &str, n_files: usize) -> bool;
}

impl<F: FnMut(&str, usize) -> bool> ConfirmGate for F {
    fn confirm(&mut self, group: &str, n_files: usize) -> bool {
        self(group, n_files)
    }
}

/// Drives one batch run.
pub struct Dispatcher<'a> {
    table: &'a GroupTable,
    transport: &'a dyn MailTransport,
    mailbox: &'a str,
    subject: &'a str,
    html_body: &'a str,
    gate: Option<Box<dyn ConfirmGate + 'a>>,
}

impl<'a> Dispatcher<'a> {
    /// Creates a dispatcher over a loaded table and a transport.
    #[must_use]
    pub fn new(
        table: &'a GroupTable,
        transport: &'a dyn MailTransport,
        mailbox: &'a str,
        subject: &'a str,
        html_body: &'a str,
    ) -> Self {
        Self {
            table,
            transport,
            mailbox,
            subject,
            html_body,
            gate: None,
        }
    }

    /// Installs a confirmation gate consulted before each send.
    #[must_use]
    pub fn with_gate(mut self, gate: impl ConfirmGate + 'a) -> Self {
        self.gate = Some(Box::new(gate));
        self
    }

    /// Processes `dir` once and returns the per-group outcomes, in
    /// listing order. Sent files are moved into the `old` subfolder of
    /// `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the directory cannot be listed, or
    /// [`Error::Declined`] if the operator vetoes a send — in that case
    /// no further group is attempted.
    pub fn run(&mut self, dir: impl AsRef<Path>) -> Result<Vec<(String, GroupOutcome)>> {
        let dir = dir.as_ref();
        let archive_dir = dir.join(ARCHIVE_SUBFOLDER);

        let groups = scan_groups(dir)?;
        info!(dir = %dir.display(), groups = groups.len(), "Starting dispatch run");

        let mut outcomes = Vec::with_capacity(groups.len());
        for group in groups {
            let outcome = self.dispatch_group(&group, &archive_dir)?;
            outcomes.push((group.name, outcome));
        }

        Ok(outcomes)
    }

    /// Dispatches one group: gate → lookup → compose → send → archive.
    fn dispatch_group(&mut self, group: &FileGroup, archive_dir: &Path) -> Result<GroupOutcome> {
        let Some(email) = self.table.lookup(&group.name) else {
            // The source routed these to a literal "Not found" address and
            // let the transport reject it; we skip instead (see DESIGN.md)
            warn!(group = %group.name, "No recipient in table, skipping group");
            return Ok(GroupOutcome::NoRecipient);
        };

        if let Some(gate) = &mut self.gate {
            if !gate.confirm(&group.name, group.files.len()) {
                warn!(group = %group.name, "Operator declined, aborting run");
                return Err(Error::Declined);
            }
        }

        let raw = match self.compose(email, group) {
            Ok(raw) => raw,
            Err(e) => {
                error!(group = %group.name, error = %e, "Failed to compose message");
                return Ok(GroupOutcome::SendFailed(e.to_string()));
            }
        };

        match self.transport.send(self.mailbox, &raw) {
            Ok(receipt) => {
                info!(
                    group = %group.name,
                    recipient = %email,
                    message_id = %receipt.message_id,
                    files = group.files.len(),
                    "Sent group"
                );

                let paths: Vec<&PathBuf> = group.files.iter().map(|f| &f.path).collect();
                let archived = match archive_files(&paths, archive_dir) {
                    Ok(()) => true,
                    Err(e) => {
                        // Delivered but not cleaned up; partial moves stand
                        error!(group = %group.name, error = %e, "Archive failed after send");
                        false
                    }
                };

                Ok(GroupOutcome::Sent {
                    message_id: receipt.message_id,
                    archived,
                })
            }
            Err(e) => {
                error!(group = %group.name, error = %e, "Send failed, files left in place");
                Ok(GroupOutcome::SendFailed(e.to_string()))
            }
        }
    }

    /// Builds the group's message and encodes it for the transport.
    fn compose(&self, email: &str, group: &FileGroup) -> Result<String> {
        let mut builder = MessageBuilder::new()
            .to(email)
            .subject(self.subject)
            .html_body(self.html_body);

        for file in &group.files {
            builder = builder.attach(Attachment::from_file(&file.path)?);
        }

        let message = builder.build()?;
        Ok(encode_base64_url(&message.to_bytes()?))
    }
}

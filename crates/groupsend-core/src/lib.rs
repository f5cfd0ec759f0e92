//! # groupsend-core
//!
//! Business logic for the groupsend batch mailer.
//!
//! This crate provides:
//! - Group table loading and lookup
//! - Directory scanning and contiguous group partitioning
//! - The dispatch loop (lookup → compose → send → archive per group)
//! - The mail transport trait and its Gmail REST implementation
//! - Archiving of sent files
//!
//! The run model is strictly sequential and synchronous: one group at a
//! time, one send attempt each, failures logged and skipped rather than
//! retried.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod archive;
pub mod dispatch;
mod error;
pub mod listing;
pub mod table;
pub mod transport;

pub use archive::{ARCHIVE_SUBFOLDER, ArchiveError, archive_files};
pub use dispatch::{ConfirmGate, Dispatcher, GroupOutcome};
pub use error::{Error, Result};
pub use listing::{FileEntry, FileGroup, group_entries, group_name_of, scan_groups};
pub use table::{GroupRecord, GroupTable};
pub use transport::{GmailTransport, MailTransport, SendReceipt, TransportError};

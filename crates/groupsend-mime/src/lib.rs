//! # groupsend-mime
//!
//! MIME message generation and parsing for the groupsend batch mailer.
//!
//! ## Features
//!
//! - **Attachments**: load a file, sniff its content type from the
//!   extension, and emit a base64-encoded part with a filename disposition
//! - **Message building**: `multipart/mixed` messages with one HTML body
//!   part plus attachments
//! - **Serialization**: transport-ready RFC 2045 documents (CRLF, boundary
//!   framing)
//! - **Parsing**: enough of a parser to round-trip generated messages,
//!   used by tests and diagnostics
//! - **Encoding**: Base64 (standard and URL-safe) and RFC 2047 headers
//!
//! ## Quick Start
//!
//! ```ignore
//! use groupsend_mime::{Attachment, MessageBuilder};
//!
//! let message = MessageBuilder::new()
//!     .to("group@example.com")
//!     .subject("Monthly report")
//!     .html_body("<p>Please find the files attached.</p>")
//!     .attach(Attachment::from_file("Team Alpha p1.pdf")?)
//!     .build()?;
//!
//! let raw = message.to_bytes()?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod attachment;
mod builder;
mod content_type;
mod error;
mod header;
mod message;

pub mod encoding;

pub use attachment::Attachment;
pub use builder::MessageBuilder;
pub use content_type::ContentType;
pub use error::{Error, Result};
pub use header::Headers;
pub use message::{Message, Part, TransferEncoding};

//! File attachments.

use crate::content_type::ContentType;
use crate::encoding::wrap_base64;
use crate::error::{Error, Result};
use crate::header::Headers;
use crate::message::Part;
use std::fs;
use std::path::Path;

/// A file attachment: content sniffed from the extension, body read fully
/// into memory.
#[derive(Debug, Clone)]
pub struct Attachment {
    /// Base name of the source file, used for the Content-Disposition header.
    pub filename: String,
    /// Sniffed content type.
    pub content_type: ContentType,
    /// Raw (unencoded) file content.
    pub data: Vec<u8>,
}

impl Attachment {
    /// Loads an attachment from a file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownContentType`] if no content type can be
    /// inferred from the extension, or [`Error::Io`] if the path has no
    /// final component or the file cannot be read (e.g., deleted between
    /// listing and attach). Both abort the
    /// caller's message build; a partial message is never produced.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "path has no file name",
                ),
            })?;

        let content_type = ContentType::from_extension(path)?;

        let data = fs::read(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            filename,
            content_type,
            data,
        })
    }

    /// Converts the attachment into a base64-encoded MIME part.
    #[must_use]
    pub fn into_part(self) -> Part {
        let mut headers = Headers::new();
        headers.add("content-type", self.content_type.to_string());
        headers.add("content-transfer-encoding", "base64");
        headers.add(
            "content-disposition",
            format!("attachment; filename=\"{}\"", self.filename),
        );

        Part::new(headers, wrap_base64(&self.data).into_bytes())
    }
}

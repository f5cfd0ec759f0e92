//! MIME message structure, serialization, and parsing.

use crate::content_type::ContentType;
use crate::encoding::decode_base64;
use crate::error::{Error, Result};
use crate::header::Headers;
use std::fmt;

/// Transfer encoding types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferEncoding {
    /// 7-bit ASCII.
    SevenBit,
    /// 8-bit binary.
    EightBit,
    /// Base64 encoding.
    Base64,
    /// Binary (no encoding).
    Binary,
}

impl TransferEncoding {
    /// Parses transfer encoding from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "8bit" => Self::EightBit,
            "base64" => Self::Base64,
            "binary" => Self::Binary,
            _ => Self::SevenBit, // Default (includes "7bit")
        }
    }
}

impl fmt::Display for TransferEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SevenBit => write!(f, "7bit"),
            Self::EightBit => write!(f, "8bit"),
            Self::Base64 => write!(f, "base64"),
            Self::Binary => write!(f, "binary"),
        }
    }
}

/// MIME message part.
#[derive(Debug, Clone)]
pub struct Part {
    /// Part headers.
    pub headers: Headers,
    /// Part body as serialized on the wire (base64 text for attachments).
    pub body: Vec<u8>,
}

impl Part {
    /// Creates a new part.
    #[must_use]
    pub const fn new(headers: Headers, body: Vec<u8>) -> Self {
        Self { headers, body }
    }

    /// Gets the content type.
    ///
    /// # Errors
    ///
    /// Returns an error if the content type header is invalid.
    pub fn content_type(&self) -> Result<ContentType> {
        self.headers
            .get("content-type")
            .map_or_else(|| Ok(ContentType::new("text", "plain")), ContentType::parse)
    }

    /// Gets the transfer encoding.
    #[must_use]
    pub fn transfer_encoding(&self) -> TransferEncoding {
        self.headers
            .get("content-transfer-encoding")
            .map_or(TransferEncoding::SevenBit, TransferEncoding::parse)
    }

    /// Decodes the body according to the transfer encoding.
    ///
    /// # Errors
    ///
    /// Returns an error if decoding fails.
    pub fn decode_body(&self) -> Result<Vec<u8>> {
        match self.transfer_encoding() {
            TransferEncoding::Base64 => {
                let body_str = String::from_utf8_lossy(&self.body);
                // Remove line wrapping for lenient parsing
                let cleaned: String = body_str.chars().filter(|c| !c.is_whitespace()).collect();
                decode_base64(&cleaned)
            }
            _ => Ok(self.body.clone()),
        }
    }

    /// Gets the decoded body as a string.
    ///
    /// # Errors
    ///
    /// Returns an error if decoding or UTF-8 conversion fails.
    pub fn body_text(&self) -> Result<String> {
        let decoded = self.decode_body()?;
        String::from_utf8(decoded).map_err(Into::into)
    }

    /// Gets the attachment filename from the Content-Disposition header.
    #[must_use]
    pub fn filename(&self) -> Option<String> {
        let disposition = self.headers.get("content-disposition")?;
        let (_, rest) = disposition.split_once("filename=")?;
        let rest = rest.trim();
        let name = if let Some(stripped) = rest.strip_prefix('"') {
            stripped.split('"').next().unwrap_or_default()
        } else {
            rest.split(';').next().unwrap_or_default().trim()
        };
        (!name.is_empty()).then(|| name.to_string())
    }
}

/// MIME message.
#[derive(Debug, Clone)]
pub struct Message {
    /// Message headers.
    pub headers: Headers,
    /// Message parts (empty for single-part messages).
    pub parts: Vec<Part>,
    /// Body for single-part messages.
    pub body: Option<Vec<u8>>,
}

impl Message {
    /// Creates a single-part message.
    #[must_use]
    pub const fn single_part(headers: Headers, body: Vec<u8>) -> Self {
        Self {
            headers,
            parts: Vec::new(),
            body: Some(body),
        }
    }

    /// Creates a multipart message.
    #[must_use]
    pub const fn multipart(headers: Headers, parts: Vec<Part>) -> Self {
        Self {
            headers,
            parts,
            body: None,
        }
    }

    /// Gets the content type.
    ///
    /// # Errors
    ///
    /// Returns an error if the content type header is invalid.
    pub fn content_type(&self) -> Result<ContentType> {
        self.headers
            .get("content-type")
            .map_or_else(|| Ok(ContentType::new("text", "plain")), ContentType::parse)
    }

    /// Gets the To header.
    #[must_use]
    pub fn to(&self) -> Option<&str> {
        self.headers.get("to")
    }

    /// Gets the Subject header.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.headers.get("subject")
    }

    /// Finds the first text/html part in a multipart message.
    ///
    /// # Errors
    ///
    /// Returns an error if no HTML part is found or decoding fails.
    pub fn html_part(&self) -> Result<String> {
        for part in &self.parts {
            let ct = part.content_type()?;
            if ct.main_type == "text" && ct.sub_type == "html" {
                return part.body_text();
            }
        }

        Err(Error::Parse("No text/html part found".to_string()))
    }

    /// Returns the attachment parts (those with a Content-Disposition
    /// filename), in message order.
    #[must_use]
    pub fn attachments(&self) -> Vec<&Part> {
        self.parts
            .iter()
            .filter(|p| p.filename().is_some())
            .collect()
    }

    /// Serializes the message as a transport-ready RFC 2045 document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingBoundary`] for a multipart message whose
    /// Content-Type carries no boundary parameter.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = String::new();

        out.push_str(&self.headers.to_string());
        out.push_str("\r\n");

        if self.parts.is_empty() {
            if let Some(body) = &self.body {
                out.push_str(&String::from_utf8_lossy(body));
            }
        } else {
            let content_type = self.content_type()?;
            let boundary = content_type.boundary().ok_or(Error::MissingBoundary)?;

            for part in &self.parts {
                out.push_str("--");
                out.push_str(boundary);
                out.push_str("\r\n");
                out.push_str(&part.headers.to_string());
                out.push_str("\r\n");
                out.push_str(&String::from_utf8_lossy(&part.body));
                out.push_str("\r\n");
            }

            out.push_str("--");
            out.push_str(boundary);
            out.push_str("--\r\n");
        }

        Ok(out.into_bytes())
    }

    /// Parses a serialized MIME document.
    ///
    /// Supports single-part bodies and one level of multipart nesting,
    /// which covers everything this crate generates.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed headers or multipart structure.
    pub fn parse(raw: &str) -> Result<Self> {
        let (header_text, body_text) = split_header_block(raw)?;
        let headers = Headers::parse(header_text)?;

        let content_type = headers
            .get("content-type")
            .map_or_else(|| Ok(ContentType::new("text", "plain")), ContentType::parse)?;

        if content_type.is_multipart() {
            let boundary = content_type.boundary().ok_or(Error::MissingBoundary)?;
            let parts = parse_multipart(body_text, boundary)?;
            Ok(Self::multipart(headers, parts))
        } else {
            Ok(Self::single_part(headers, body_text.as_bytes().to_vec()))
        }
    }
}

/// Splits a raw document into the header block and the body.
fn split_header_block(raw: &str) -> Result<(&str, &str)> {
    if let Some(idx) = raw.find("\r\n\r\n") {
        Ok((&raw[..idx], &raw[idx + 4..]))
    } else if let Some(idx) = raw.find("\n\n") {
        Ok((&raw[..idx], &raw[idx + 2..]))
    } else {
        Err(Error::Parse("No header/body separator".to_string()))
    }
}

/// Parses the body of a multipart message into its parts.
fn parse_multipart(body: &str, boundary: &str) -> Result<Vec<Part>> {
    let delimiter = format!("--{boundary}");
    let closing = format!("--{boundary}--");

    let mut parts = Vec::new();
    let mut section: Option<String> = None;

    for line in body.lines() {
        if line == closing {
            if let Some(text) = section.take() {
                parts.push(parse_part(&text)?);
            }
            break;
        }

        if line == delimiter {
            if let Some(text) = section.take() {
                parts.push(parse_part(&text)?);
            }
            section = Some(String::new());
            continue;
        }

        if let Some(text) = &mut section {
            text.push_str(line);
            text.push_str("\r\n");
        }
        // Lines before the first delimiter are a preamble and are dropped
    }

    if parts.is_empty() {
        return Err(Error::InvalidMultipart(format!(
            "No parts found for boundary {boundary}"
        )));
    }

    Ok(parts)
}

/// Parses one multipart section into a part.
fn parse_part(text: &str) -> Result<Part> {
    let (header_text, body_text) = split_header_block(text)?;
    let headers = Headers::parse(header_text)?;
    let body = body_text
        .strip_suffix("\r\n")
        .unwrap_or(body_text)
        .as_bytes()
        .to_vec();

    Ok(Part::new(headers, body))
}

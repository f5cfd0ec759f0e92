//! MIME content type handling, including extension sniffing for attachments.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// MIME content type with parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    /// Main type (e.g., "text", "application", "multipart").
    pub main_type: String,
    /// Subtype (e.g., "html", "pdf", "mixed").
    pub sub_type: String,
    /// Parameters (e.g., charset=utf-8, boundary=xxx).
    pub parameters: HashMap<String, String>,
}

impl ContentType {
    /// Creates a new content type.
    #[must_use]
    pub fn new(main_type: impl Into<String>, sub_type: impl Into<String>) -> Self {
        Self {
            main_type: main_type.into(),
            sub_type: sub_type.into(),
            parameters: HashMap::new(),
        }
    }

    /// Creates a text/html content type.
    #[must_use]
    pub fn text_html() -> Self {
        let mut ct = Self::new("text", "html");
        ct.parameters
            .insert("charset".to_string(), "utf-8".to_string());
        ct
    }

    /// Creates an application/pdf content type.
    #[must_use]
    pub fn application_pdf() -> Self {
        Self::new("application", "pdf")
    }

    /// Creates a multipart/mixed content type with boundary.
    #[must_use]
    pub fn multipart_mixed(boundary: impl Into<String>) -> Self {
        let mut ct = Self::new("multipart", "mixed");
        ct.parameters
            .insert("boundary".to_string(), boundary.into());
        ct
    }

    /// Sniffs the content type from a path's file extension.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownContentType`] if the path has no extension
    /// or the extension is not a known type. Callers that prefer a
    /// catch-all should map that error to `application/octet-stream`
    /// themselves; the batch mailer treats it as a hard failure for the
    /// affected attachment.
    pub fn from_extension(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| Error::UnknownContentType(path.to_path_buf()))?;

        let (main, sub) = match ext.to_ascii_lowercase().as_str() {
            "pdf" => ("application", "pdf"),
            "txt" => ("text", "plain"),
            "html" | "htm" => ("text", "html"),
            "csv" => ("text", "csv"),
            "png" => ("image", "png"),
            "jpg" | "jpeg" => ("image", "jpeg"),
            "gif" => ("image", "gif"),
            "zip" => ("application", "zip"),
            "json" => ("application", "json"),
            "xml" => ("application", "xml"),
            "doc" => ("application", "msword"),
            "docx" => (
                "application",
                "vnd.openxmlformats-officedocument.wordprocessingml.document",
            ),
            "xls" => ("application", "vnd.ms-excel"),
            "xlsx" => (
                "application",
                "vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            ),
            _ => return Err(Error::UnknownContentType(path.to_path_buf())),
        };

        Ok(Self::new(main, sub))
    }

    /// Returns the charset parameter if present.
    #[must_use]
    pub fn charset(&self) -> Option<&str> {
        self.parameters.get("charset").map(String::as_str)
    }

    /// Returns the boundary parameter if present.
    #[must_use]
    pub fn boundary(&self) -> Option<&str> {
        self.parameters.get("boundary").map(String::as_str)
    }

    /// Checks if this is a multipart content type.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.main_type.eq_ignore_ascii_case("multipart")
    }

    /// Parses a content type string.
    ///
    /// Format: `type/subtype; param1=value1; param2=value2`
    ///
    /// # Errors
    ///
    /// Returns an error if the format is invalid.
    pub fn parse(s: &str) -> Result<Self> {
        let mut parts = s.split(';');

        let type_str = parts
            .next()
            .ok_or_else(|| Error::InvalidContentType("Empty content type".to_string()))?
            .trim();

        let mut type_parts = type_str.split('/');
        let main_type = type_parts
            .next()
            .ok_or_else(|| Error::InvalidContentType("Missing main type".to_string()))?
            .trim()
            .to_lowercase();

        let sub_type = type_parts
            .next()
            .ok_or_else(|| Error::InvalidContentType("Missing subtype".to_string()))?
            .trim()
            .to_lowercase();

        let mut content_type = Self::new(main_type, sub_type);

        for param in parts {
            let param = param.trim();
            if let Some((key, value)) = param.split_once('=') {
                let key = key.trim().to_lowercase();
                let value = value.trim().trim_matches('"').to_string();
                content_type.parameters.insert(key, value);
            }
        }

        Ok(content_type)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let main = &self.main_type;
        let sub = &self.sub_type;
        write!(f, "{main}/{sub}")?;

        for (key, value) in &self.parameters {
            // Quote value if it contains special characters
            if value.contains(|c: char| c.is_whitespace() || "()<>@,;:\\\"/[]?=".contains(c)) {
                write!(f, "; {key}=\"{value}\"")?;
            } else {
                write!(f, "; {key}={value}")?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_text_html() {
        let ct = ContentType::text_html();
        assert_eq!(ct.main_type, "text");
        assert_eq!(ct.sub_type, "html");
        assert_eq!(ct.charset(), Some("utf-8"));
    }

    #[test]
    fn test_multipart_mixed() {
        let ct = ContentType::multipart_mixed("boundary123");
        assert_eq!(ct.main_type, "multipart");
        assert_eq!(ct.sub_type, "mixed");
        assert_eq!(ct.boundary(), Some("boundary123"));
        assert!(ct.is_multipart());
    }

    #[test]
    fn test_from_extension_pdf() {
        let ct = ContentType::from_extension("reports/Team Alpha p1.pdf").unwrap();
        assert_eq!(ct.main_type, "application");
        assert_eq!(ct.sub_type, "pdf");
    }

    #[test]
    fn test_from_extension_case_insensitive() {
        let ct = ContentType::from_extension("SCAN.PDF").unwrap();
        assert_eq!(ct.sub_type, "pdf");
    }

    #[test]
    fn test_from_extension_unknown() {
        let err = ContentType::from_extension("file.xyz123").unwrap_err();
        assert!(matches!(err, Error::UnknownContentType(_)));
    }

    #[test]
    fn test_from_extension_missing() {
        let err = ContentType::from_extension("no_extension").unwrap_err();
        assert!(matches!(err, Error::UnknownContentType(_)));
    }

    #[test]
    fn test_content_type_parse() {
        let ct = ContentType::parse("text/html; charset=utf-8").unwrap();
        assert_eq!(ct.main_type, "text");
        assert_eq!(ct.sub_type, "html");
        assert_eq!(ct.charset(), Some("utf-8"));
    }

    #[test]
    fn test_content_type_parse_quoted() {
        let ct = ContentType::parse("multipart/mixed; boundary=\"----=_Part_123\"").unwrap();
        assert_eq!(ct.boundary(), Some("----=_Part_123"));
    }

    #[test]
    fn test_content_type_display() {
        let ct = ContentType::application_pdf();
        assert_eq!(ct.to_string(), "application/pdf");
    }
}

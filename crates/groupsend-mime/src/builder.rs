//! Builder for outbound multipart messages.

use crate::attachment::Attachment;
use crate::content_type::ContentType;
use crate::error::{Error, Result};
use crate::header::Headers;
use crate::message::{Message, Part};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static BOUNDARY_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generates a boundary unique within this process.
fn generate_boundary() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0_u64, |d| u64::from(d.subsec_nanos()));
    let count = BOUNDARY_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("=_groupsend_{count:04}_{nanos:08x}")
}

/// Builds an outbound message: one HTML body part plus the attachments,
/// serialized as `multipart/mixed`.
#[derive(Debug, Default)]
pub struct MessageBuilder {
    to: Option<String>,
    subject: Option<String>,
    html_body: Option<String>,
    attachments: Vec<Attachment>,
}

impl MessageBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the recipient.
    #[must_use]
    pub fn to(mut self, to: impl Into<String>) -> Self {
        self.to = Some(to.into());
        self
    }

    /// Sets the subject.
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the HTML body.
    #[must_use]
    pub fn html_body(mut self, html: impl Into<String>) -> Self {
        self.html_body = Some(html.into());
        self
    }

    /// Adds an attachment. Attachments keep insertion order in the
    /// composed message.
    #[must_use]
    pub fn attach(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Builds the multipart message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingHeader`] if recipient, subject, or HTML
    /// body was not supplied, or an encoding error for a subject that
    /// cannot be RFC 2047 encoded.
    pub fn build(self) -> Result<Message> {
        let to = self
            .to
            .ok_or_else(|| Error::MissingHeader("to".to_string()))?;
        let subject = self
            .subject
            .ok_or_else(|| Error::MissingHeader("subject".to_string()))?;
        let html_body = self
            .html_body
            .ok_or_else(|| Error::MissingHeader("html body".to_string()))?;

        let boundary = generate_boundary();

        let mut headers = Headers::new();
        headers.add("to", to);
        headers.add("subject", Headers::encode_value(&subject)?);
        headers.add("mime-version", "1.0");
        headers.add(
            "content-type",
            ContentType::multipart_mixed(&boundary).to_string(),
        );

        let mut html_headers = Headers::new();
        html_headers.add("content-type", ContentType::text_html().to_string());
        let mut parts = vec![Part::new(html_headers, html_body.into_bytes())];

        for attachment in self.attachments {
            parts.push(attachment.into_part());
        }

        Ok(Message::multipart(headers, parts))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::message::Message;

    fn pdf_attachment(name: &str, data: &[u8]) -> Attachment {
        Attachment {
            filename: name.to_string(),
            content_type: ContentType::application_pdf(),
            data: data.to_vec(),
        }
    }

    #[test]
    fn test_boundary_unique() {
        assert_ne!(generate_boundary(), generate_boundary());
    }

    #[test]
    fn test_build_requires_recipient() {
        let err = MessageBuilder::new()
            .subject("s")
            .html_body("<p>b</p>")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::MissingHeader(_)));
    }

    #[test]
    fn test_build_round_trip() {
        let message = MessageBuilder::new()
            .to("a@x.com")
            .subject("Monthly report")
            .html_body("<p>Please find the files attached.</p>")
            .attach(pdf_attachment("Team Alpha p1.pdf", b"%PDF-1.4 one"))
            .attach(pdf_attachment("Team Alpha p2.pdf", b"%PDF-1.4 two"))
            .build()
            .unwrap();

        let raw = String::from_utf8(message.to_bytes().unwrap()).unwrap();
        let parsed = Message::parse(&raw).unwrap();

        assert_eq!(parsed.to(), Some("a@x.com"));
        assert_eq!(parsed.subject(), Some("Monthly report"));
        assert_eq!(
            parsed.html_part().unwrap(),
            "<p>Please find the files attached.</p>"
        );

        let attachments = parsed.attachments();
        assert_eq!(attachments.len(), 2);
        assert_eq!(
            attachments[0].filename(),
            Some("Team Alpha p1.pdf".to_string())
        );
        assert_eq!(attachments[0].decode_body().unwrap(), b"%PDF-1.4 one");
        assert_eq!(
            attachments[1].filename(),
            Some("Team Alpha p2.pdf".to_string())
        );
        assert_eq!(attachments[1].decode_body().unwrap(), b"%PDF-1.4 two");
    }

    #[test]
    fn test_build_non_ascii_subject_round_trips() {
        let message = MessageBuilder::new()
            .to("a@x.com")
            .subject("Bericht für März")
            .html_body("<p>Hi</p>")
            .build()
            .unwrap();

        let raw = String::from_utf8(message.to_bytes().unwrap()).unwrap();
        let parsed = Message::parse(&raw).unwrap();
        let decoded = Headers::decode_value(parsed.subject().unwrap()).unwrap();
        assert_eq!(decoded, "Bericht für März");
    }

    #[test]
    fn test_attachment_order_preserved() {
        let message = MessageBuilder::new()
            .to("a@x.com")
            .subject("s")
            .html_body("<p>b</p>")
            .attach(pdf_attachment("z.pdf", b"z"))
            .attach(pdf_attachment("a.pdf", b"a"))
            .build()
            .unwrap();

        let names: Vec<_> = message
            .attachments()
            .iter()
            .filter_map(|p| p.filename())
            .collect();
        assert_eq!(names, vec!["z.pdf", "a.pdf"]);
    }
}

//! `multipart/form-data` body encoding.
//!
//! The encoder produces the complete body in memory together with the
//! matching `Content-Type` header value. Boundaries are
//! `----ClawShareBoundary` followed by 32 random alphanumeric characters
//! (about 190 bits of entropy). The encoder still scans every part for the
//! delimiter and draws a fresh token on a hit, so a collision can never
//! reach the wire.
//!
//! Field names and filenames are written as quoted header parameters. A `"`,
//! CR or LF inside them is percent-escaped (`%22`, `%0D`, `%0A`), the same
//! way browsers encode form submissions, so a name containing those
//! characters reaches the server in its escaped form. Every other name,
//! including non-ASCII UTF-8, is sent byte for byte.
//!
//! File content is borrowed where possible, so encoding holds the payload
//! once in the source buffer and once in the body.

use std::borrow::Cow;

use rand::distr::{Alphanumeric, SampleString};

/// Content type used for the file part when none is given.
pub const OCTET_STREAM: &str = "application/octet-stream";

const BOUNDARY_PREFIX: &str = "----ClawShareBoundary";
const BOUNDARY_RANDOM_LEN: usize = 32;
const CRLF: &[u8] = b"\r\n";

/// The binary part of a form.
#[derive(Debug, Clone)]
pub struct FilePart<'a> {
    pub field: String,
    pub filename: String,
    pub content_type: String,
    pub content: Cow<'a, [u8]>,
}

/// An encoded form body plus its `Content-Type` header value.
#[derive(Debug, Clone)]
pub struct EncodedBody {
    pub body: Vec<u8>,
    pub content_type: String,
    pub boundary: String,
}

/// Builder for a form with plain text fields and at most one file part.
#[derive(Debug, Clone, Default)]
pub struct MultipartEncoder<'a> {
    fields: Vec<(String, String)>,
    file: Option<FilePart<'a>>,
    boundary: Option<String>,
}

impl<'a> MultipartEncoder<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plain text field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Set the file part, sent as `application/octet-stream`.
    pub fn file(
        self,
        field: impl Into<String>,
        filename: impl Into<String>,
        content: impl Into<Cow<'a, [u8]>>,
    ) -> Self {
        self.file_with_type(field, filename, OCTET_STREAM, content)
    }

    /// Set the file part with an explicit content type. Replaces any
    /// previously set file part.
    pub fn file_with_type(
        mut self,
        field: impl Into<String>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        content: impl Into<Cow<'a, [u8]>>,
    ) -> Self {
        self.file = Some(FilePart {
            field: field.into(),
            filename: filename.into(),
            content_type: content_type.into(),
            content: content.into(),
        });
        self
    }

    /// Prefer a fixed boundary. It is only used if it does not occur in any
    /// part; otherwise a random one is drawn as usual.
    pub fn boundary(mut self, boundary: impl Into<String>) -> Self {
        self.boundary = Some(boundary.into());
        self
    }

    pub fn encode(&self) -> EncodedBody {
        let mut boundary = self.boundary.clone().unwrap_or_else(random_boundary);
        while self.collides(&boundary) {
            log::debug!("multipart boundary found in payload, drawing a new one");
            boundary = random_boundary();
        }

        let body = self.write_body(&boundary);
        EncodedBody {
            body,
            content_type: format!("multipart/form-data; boundary={}", boundary),
            boundary,
        }
    }

    fn collides(&self, boundary: &str) -> bool {
        let delimiter = format!("--{}", boundary);
        let needle = delimiter.as_bytes();

        let in_fields = self.fields.iter().any(|(name, value)| {
            contains(name.as_bytes(), needle) || contains(value.as_bytes(), needle)
        });

        in_fields
            || self.file.as_ref().is_some_and(|file| {
                contains(file.field.as_bytes(), needle)
                    || contains(file.filename.as_bytes(), needle)
                    || contains(&file.content, needle)
            })
    }

    fn write_body(&self, boundary: &str) -> Vec<u8> {
        let file_len = self.file.as_ref().map_or(0, |f| f.content.len());
        let mut body = Vec::with_capacity(file_len + 256 * (self.fields.len() + 2));

        for (name, value) in &self.fields {
            write_delimiter(&mut body, boundary);
            body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"", escape(name)).as_bytes(),
            );
            body.extend_from_slice(CRLF);
            body.extend_from_slice(CRLF);
            body.extend_from_slice(value.as_bytes());
            body.extend_from_slice(CRLF);
        }

        if let Some(file) = &self.file {
            write_delimiter(&mut body, boundary);
            body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"",
                    escape(&file.field),
                    escape(&file.filename)
                )
                .as_bytes(),
            );
            body.extend_from_slice(CRLF);
            body.extend_from_slice(format!("Content-Type: {}", file.content_type).as_bytes());
            body.extend_from_slice(CRLF);
            body.extend_from_slice(CRLF);
            body.extend_from_slice(&file.content);
            body.extend_from_slice(CRLF);
        }

        body.extend_from_slice(format!("--{}--", boundary).as_bytes());
        body.extend_from_slice(CRLF);
        body
    }
}

fn random_boundary() -> String {
    format!(
        "{}{}",
        BOUNDARY_PREFIX,
        Alphanumeric.sample_string(&mut rand::rng(), BOUNDARY_RANDOM_LEN)
    )
}

fn write_delimiter(body: &mut Vec<u8>, boundary: &str) {
    body.extend_from_slice(format!("--{}", boundary).as_bytes());
    body.extend_from_slice(CRLF);
}

/// Percent-escape the characters that would break a quoted header parameter.
fn escape(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty()
        && haystack.len() >= needle.len()
        && haystack.windows(needle.len()).any(|window| window == needle)
}

use bytes::Bytes;

use crate::{DecodeError, Headers, parser::decoder::DEFAULT_TRANSFER_ENCODING};

/// One decoded archive part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Decoded part headers.
    pub headers: Headers,
    /// Decoded part content, without line delimiters or marker lines.
    pub content: Bytes,
}

impl Part {
    pub(crate) fn new(headers: Headers, content: Bytes) -> Self {
        Self { headers, content }
    }

    /// Returns the part headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns the decoded content.
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// Returns the raw `Content-Type` value, if present.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.first("Content-Type")
    }

    /// Returns the parsed `Content-Type`, if present and well formed.
    pub fn mime(&self) -> Option<mime::Mime> {
        self.content_type()?.parse().ok()
    }

    /// Returns the `Content-Location` value, if present.
    pub fn content_location(&self) -> Option<&str> {
        self.headers.first("Content-Location")
    }

    /// Returns the `Content-Transfer-Encoding`, defaulting to `7bit`.
    pub fn transfer_encoding(&self) -> &str {
        self.headers
            .first("Content-Transfer-Encoding")
            .unwrap_or(DEFAULT_TRANSFER_ENCODING)
    }

    /// Returns the content as UTF-8 text.
    pub fn text(&self) -> Result<&str, DecodeError> {
        std::str::from_utf8(&self.content).map_err(|_| DecodeError::InvalidUtf8)
    }

    /// Consumes the part and returns its content.
    pub fn into_content(self) -> Bytes {
        self.content
    }

    /// Consumes the part and returns headers and content.
    pub fn into_parts(self) -> (Headers, Bytes) {
        (self.headers, self.content)
    }
}

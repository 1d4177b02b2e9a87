use thiserror::Error;

/// Configuration-time validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A decoder override was registered under an empty encoding name.
    #[error("decoder override name cannot be empty")]
    EmptyDecoderName,
    /// The quoted-printable newline marker was empty.
    #[error("quoted-printable newline marker cannot be empty")]
    EmptyNewline,
    /// A line splitter was created with an empty delimiter.
    #[error("line delimiter cannot be empty")]
    EmptyDelimiter,
    /// A configured numeric limit must be strictly greater than zero.
    #[error("limit `{limit}` must be greater than 0")]
    InvalidLimitValue {
        /// Name of the limit.
        limit: &'static str,
    },
}

/// Failures in the framing of the archive itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    /// The line source ended while a header block was still open.
    #[error("didn't find an empty line to signify the end of header parsing")]
    MissingHeaderTerminator,
    /// A non-folded header line had no `": "` separator.
    #[error("header line didn't have key-value delimiter: \"{line}\"")]
    MissingKeyValueDelimiter {
        /// The offending header line.
        line: String,
    },
    /// The first header block had no `Content-Type`.
    #[error("first headers didn't contain a content type")]
    MissingContentType,
    /// The first `Content-Type` was not multipart or had no boundary.
    #[error("first content type header didn't contain 'multipart/...' and a boundary string: \"{content_type}\"")]
    NotMultipart {
        /// The `Content-Type` value that was inspected.
        content_type: String,
    },
    /// The line source ended before a boundary or terminus line.
    #[error("stream didn't end with the appropriate termination boundary: {terminus}")]
    MissingTerminationBoundary {
        /// Expected terminus line.
        terminus: String,
    },
}

/// Failures selecting a content-transfer-encoding decoder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// No decoder is registered for the part's transfer encoding.
    #[error("unhandled encoding type: {encoding}")]
    Unhandled {
        /// The unmatched `Content-Transfer-Encoding` value.
        encoding: String,
    },
    /// The built-in `binary` decoder was selected.
    #[error(
        "binary transfer-encoding is explicitly not supported; register an override decoder (for example `Identity`) to accept it anyway"
    )]
    BinaryUnsupported,
}

/// Failures decoding header values or part content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A byte >= 128 appeared in quoted-printable content.
    #[error("got non-ascii character when decoding quoted printable: {byte}")]
    NonAsciiQuotedPrintable {
        /// The offending byte.
        byte: u8,
    },
    /// An `=` escape was not followed by two hex digits.
    #[error("quoted printable escape (=) was not followed by two hex digits")]
    MalformedEscape,
    /// A raw non-ASCII byte appeared inside a Q-encoded word.
    #[error("got non-ascii character when decoding q-quoted word: \"{word}\"")]
    NonAsciiEncodedWord {
        /// The encoded word payload, lossily rendered.
        word: String,
    },
    /// Base64 payload could not be decoded.
    #[error("invalid base64 payload: {reason}")]
    InvalidBase64 {
        /// Decoder failure description.
        reason: String,
    },
    /// An encoded word named a charset with no known decoder.
    #[error("unknown charset in encoded word: {charset}")]
    UnknownCharset {
        /// The charset label.
        charset: String,
    },
    /// Content or a header line was expected to be UTF-8 and was not.
    #[error("content is not valid UTF-8")]
    InvalidUtf8,
}

impl From<base64::DecodeError> for DecodeError {
    fn from(err: base64::DecodeError) -> Self {
        Self::InvalidBase64 {
            reason: err.to_string(),
        }
    }
}

/// Runtime error type used by `mhtml-stream`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MhtmlError {
    /// Configuration error surfaced at runtime.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Malformed archive framing.
    #[error(transparent)]
    Structural(#[from] StructuralError),
    /// Transfer-encoding selection failure.
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    /// Header or content decoding failure.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// The caller's byte-chunk source failed.
    #[error("byte source failed: {message}")]
    Source {
        /// Source failure message.
        message: String,
    },
    /// The archive contained more parts than allowed.
    #[error("archive exceeded max parts limit of {max_parts}")]
    PartLimitExceeded {
        /// Maximum allowed number of parts.
        max_parts: usize,
    },
    /// A decoded part exceeded the configured size limit.
    #[error("part exceeded max decoded size of {max_part_size} bytes")]
    PartSizeLimitExceeded {
        /// Maximum allowed decoded part size in bytes.
        max_part_size: u64,
    },
}

impl MhtmlError {
    /// Creates a source error from a message.
    pub fn source_failed(message: impl Into<String>) -> Self {
        Self::Source {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for MhtmlError {
    fn from(err: std::io::Error) -> Self {
        Self::source_failed(err.to_string())
    }
}

#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Streaming parser for MHTML web archives.
//!
//! An archive is read as a stream of byte chunks and turned into a stream of
//! [`Part`]s, each carrying its decoded headers and decoded content. Nothing
//! beyond the part currently being assembled is buffered.

/// Fluent builder API.
pub mod builder;
/// Parser configuration.
pub mod config;
/// Error types exposed by this crate.
pub mod error;
/// Ordered multi-valued header container.
pub mod headers;
/// Archive limits.
pub mod limits;
/// High-level part stream type.
pub mod mhtml;
/// Decoded archive part API.
pub mod part;
/// Low-level parser components.
pub mod parser;
/// Byte-chunk source helpers.
pub mod source;

use std::path::Path;

use bytes::Bytes;
use futures::Stream;

pub use builder::MhtmlBuilder;
pub use config::MhtmlConfig;
pub use error::{ConfigError, DecodeError, EncodingError, MhtmlError, StructuralError};
pub use headers::Headers;
pub use limits::Limits;
pub use mhtml::Mhtml;
pub use part::Part;
pub use parser::{Base64, Binary, Decoder, DecoderRegistry, Identity, QuotedPrintable};

/// Main `mhtml-stream` entry point.
#[derive(Debug, Clone)]
pub struct MhtmlParser {
    config: MhtmlConfig,
}

impl Default for MhtmlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MhtmlParser {
    /// Creates a parser with the built-in decoders and no limits.
    pub fn new() -> Self {
        Self {
            config: MhtmlConfig::default(),
        }
    }

    /// Creates a parser with explicit validated configuration.
    pub fn with_config(config: MhtmlConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Creates a fluent builder.
    pub fn builder() -> MhtmlBuilder {
        MhtmlBuilder::default()
    }

    /// Returns an immutable reference to the active configuration.
    pub fn config(&self) -> &MhtmlConfig {
        &self.config
    }

    /// Parses a chunked byte stream into a stream of parts.
    pub fn parse<S>(&self, stream: S) -> Mhtml
    where
        S: Stream<Item = Result<Bytes, MhtmlError>> + Unpin + Send + 'static,
    {
        Mhtml::from_assembler(parser::PartAssembler::new(
            stream,
            self.config.decoders(),
            self.config.limits.clone(),
        ))
    }

    /// Parses an in-memory archive.
    pub fn parse_bytes(&self, bytes: impl Into<Bytes>) -> Mhtml {
        self.parse(source::from_bytes(bytes))
    }

    /// Opens `path` and parses it as an archive.
    pub async fn parse_file(&self, path: impl AsRef<Path>) -> Result<Mhtml, MhtmlError> {
        Ok(self.parse(source::from_file(path).await?))
    }
}

use bytes::Bytes;

use crate::{
    MhtmlParser,
    config::MhtmlConfig,
    error::ConfigError,
    limits::Limits,
    parser::decoder::Decoder,
};

/// Builder for configuring an [`MhtmlParser`].
#[derive(Debug, Clone, Default)]
pub struct MhtmlBuilder {
    config: MhtmlConfig,
}

impl MhtmlBuilder {
    /// Creates a builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current builder configuration snapshot.
    pub fn config(&self) -> &MhtmlConfig {
        &self.config
    }

    /// Replaces the full builder configuration.
    pub fn with_config(mut self, config: MhtmlConfig) -> Self {
        self.config = config;
        self
    }

    /// Registers a decoder for a transfer-encoding name, overriding any built-in.
    pub fn decoder(mut self, encoding: impl AsRef<str>, decoder: impl Decoder + 'static) -> Self {
        self.config.decoder_overrides.insert(encoding, decoder);
        self
    }

    /// Sets the newline appended by the quoted-printable decoder.
    pub fn newline(mut self, newline: impl Into<Bytes>) -> Self {
        self.config.newline = newline.into();
        self
    }

    /// Sets archive limits.
    pub fn limits(mut self, limits: Limits) -> Self {
        self.config.limits = limits;
        self
    }

    /// Validates builder configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.config.validate()
    }

    /// Finalizes and returns validated configuration.
    pub fn build_config(self) -> Result<MhtmlConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }

    /// Finalizes into a parser.
    pub fn build(self) -> Result<MhtmlParser, ConfigError> {
        MhtmlParser::with_config(self.config)
    }
}

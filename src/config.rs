use bytes::Bytes;

use crate::{
    error::ConfigError,
    limits::Limits,
    parser::decoder::{DEFAULT_NEWLINE, DecoderRegistry},
};

/// Top-level archive parser configuration.
#[derive(Debug, Clone)]
pub struct MhtmlConfig {
    /// Decoders merged over the built-ins; an override wins on a name clash.
    pub decoder_overrides: DecoderRegistry,
    /// Newline the built-in quoted-printable decoder appends after hard line breaks.
    pub newline: Bytes,
    /// Archive limits.
    pub limits: Limits,
}

impl Default for MhtmlConfig {
    fn default() -> Self {
        Self {
            decoder_overrides: DecoderRegistry::new(),
            newline: Bytes::from_static(DEFAULT_NEWLINE),
            limits: Limits::default(),
        }
    }
}

impl MhtmlConfig {
    /// Creates a default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.newline.is_empty() {
            return Err(ConfigError::EmptyNewline);
        }

        if self.decoder_overrides.names().any(str::is_empty) {
            return Err(ConfigError::EmptyDecoderName);
        }

        self.limits.validate()
    }

    /// Builds the effective registry: built-ins first, then overrides.
    pub fn decoders(&self) -> DecoderRegistry {
        let mut registry = DecoderRegistry::with_defaults(self.newline.clone());
        registry.merge(&self.decoder_overrides);
        registry
    }
}

use std::{
    fmt,
    pin::Pin,
    task::{Context, Poll},
};

use bytes::Bytes;
use futures::{Stream, StreamExt, stream};

use crate::{
    ConfigError, MhtmlConfig, MhtmlError, Part,
    parser::{assembler::PartAssembler, decoder::BoxStream},
};

/// Stream of decoded parts from an MHTML archive.
///
/// Parts are produced on demand; each poll pulls only as many source chunks
/// as the next part needs. The stream ends after the terminus line or after
/// the first error.
pub struct Mhtml {
    inner: BoxStream<'static, Result<Part, MhtmlError>>,
}

impl fmt::Debug for Mhtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mhtml").finish_non_exhaustive()
    }
}

impl Mhtml {
    /// Creates a part stream with the built-in decoders.
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, MhtmlError>> + Unpin + Send + 'static,
    {
        let config = MhtmlConfig::default();
        Self::from_assembler(PartAssembler::new(stream, config.decoders(), config.limits))
    }

    /// Creates a part stream with explicit validated configuration.
    pub fn with_config<S>(stream: S, config: &MhtmlConfig) -> Result<Self, ConfigError>
    where
        S: Stream<Item = Result<Bytes, MhtmlError>> + Unpin + Send + 'static,
    {
        config.validate()?;
        Ok(Self::from_assembler(PartAssembler::new(
            stream,
            config.decoders(),
            config.limits.clone(),
        )))
    }

    /// Wraps an assembler as a stream.
    pub fn from_assembler<S>(assembler: PartAssembler<S>) -> Self
    where
        S: Stream<Item = Result<Bytes, MhtmlError>> + Unpin + Send + 'static,
    {
        let inner = stream::unfold(assembler, |mut assembler| async move {
            assembler
                .next_part()
                .await
                .map(|item| (item, assembler))
        })
        .boxed();

        Self { inner }
    }
}

impl Stream for Mhtml {
    type Item = Result<Part, MhtmlError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

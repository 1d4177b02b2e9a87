//! Byte-chunk sources for the parser.
//!
//! Any `Stream<Item = Result<Bytes, MhtmlError>>` works as input; these
//! helpers cover in-memory buffers, async readers and files.

use std::path::Path;

use bytes::Bytes;
use futures::{Stream, StreamExt, stream};
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;

use crate::{MhtmlError, parser::decoder::BoxStream};

/// Boxed chunk source returned by the reader-backed helpers.
pub type ChunkStream = BoxStream<'static, Result<Bytes, MhtmlError>>;

/// A source yielding `bytes` as a single chunk.
pub fn from_bytes(
    bytes: impl Into<Bytes>,
) -> impl Stream<Item = Result<Bytes, MhtmlError>> + Unpin + Send + 'static {
    stream::iter([Ok::<Bytes, MhtmlError>(bytes.into())])
}

/// A source reading chunks from an async reader.
pub fn from_reader<R>(reader: R) -> ChunkStream
where
    R: AsyncRead + Unpin + Send + 'static,
{
    ReaderStream::new(reader)
        .map(|chunk| chunk.map_err(MhtmlError::from))
        .boxed()
}

/// A source reading chunks of at most `capacity` bytes from an async reader.
pub fn from_reader_with_capacity<R>(reader: R, capacity: usize) -> ChunkStream
where
    R: AsyncRead + Unpin + Send + 'static,
{
    ReaderStream::with_capacity(reader, capacity)
        .map(|chunk| chunk.map_err(MhtmlError::from))
        .boxed()
}

/// Opens `path` and returns a source over its contents.
pub async fn from_file(path: impl AsRef<Path>) -> Result<ChunkStream, MhtmlError> {
    let path = path.as_ref();
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|err| MhtmlError::source_failed(format!("{}: {err}", path.display())))?;

    #[cfg(feature = "tracing")]
    tracing::debug!(path = %path.display(), "source: opened archive file");

    Ok(from_reader(file))
}

use std::{
    pin::Pin,
    task::{Context, Poll},
};

use bytes::{Buf, Bytes, BytesMut};
use futures::Stream;

use crate::{ConfigError, MhtmlError, parser::matcher};

/// Line delimiter used by MHTML header blocks and bodies.
pub const CRLF: &[u8] = b"\r\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SplitState {
    Reading,
    Exhausted,
    Done,
}

/// Splits a chunked byte stream into delimiter-separated segments.
///
/// Chunks may be of any size and a delimiter may straddle two chunks. When the
/// upstream ends, the bytes after the last delimiter are yielded once, even if
/// empty. An upstream error is forwarded and ends the stream.
#[derive(Debug)]
pub struct LineStream<S> {
    stream: S,
    delimiter: Bytes,
    buffer: BytesMut,
    scanned: usize,
    state: SplitState,
}

impl<S> LineStream<S> {
    /// Creates a splitter over CRLF-delimited lines.
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            delimiter: Bytes::from_static(CRLF),
            buffer: BytesMut::new(),
            scanned: 0,
            state: SplitState::Reading,
        }
    }

    /// Creates a splitter over an arbitrary non-empty delimiter.
    pub fn with_delimiter(stream: S, delimiter: impl Into<Bytes>) -> Result<Self, ConfigError> {
        let delimiter = delimiter.into();
        if delimiter.is_empty() {
            return Err(ConfigError::EmptyDelimiter);
        }

        Ok(Self {
            delimiter,
            ..Self::new(stream)
        })
    }

    /// Returns the delimiter this splitter cuts on.
    pub fn delimiter(&self) -> &[u8] {
        &self.delimiter
    }

    fn take_line(&mut self) -> Option<Bytes> {
        let Some(relative) = matcher::find(&self.buffer[self.scanned..], &self.delimiter) else {
            // a partial delimiter may sit at the tail, so rescan that much next time
            self.scanned = self
                .buffer
                .len()
                .saturating_sub(self.delimiter.len() - 1);
            return None;
        };

        let line = self.buffer.split_to(self.scanned + relative).freeze();
        self.buffer.advance(self.delimiter.len());
        self.scanned = 0;
        Some(line)
    }
}

impl<S> Stream for LineStream<S>
where
    S: Stream<Item = Result<Bytes, MhtmlError>> + Unpin,
{
    type Item = Result<Bytes, MhtmlError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match self.state {
                SplitState::Done => return Poll::Ready(None),
                SplitState::Exhausted => {
                    if let Some(line) = self.take_line() {
                        return Poll::Ready(Some(Ok(line)));
                    }
                    self.state = SplitState::Done;
                    let rest = self.buffer.split().freeze();
                    return Poll::Ready(Some(Ok(rest)));
                }
                SplitState::Reading => {
                    if let Some(line) = self.take_line() {
                        return Poll::Ready(Some(Ok(line)));
                    }
                }
            }

            match Pin::new(&mut self.stream).poll_next(cx) {
                Poll::Ready(Some(Ok(chunk))) => {
                    if !chunk.is_empty() {
                        self.buffer.extend_from_slice(&chunk);
                    }
                }
                Poll::Ready(Some(Err(err))) => {
                    self.state = SplitState::Done;
                    return Poll::Ready(Some(Err(err)));
                }
                Poll::Ready(None) => self.state = SplitState::Exhausted,
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

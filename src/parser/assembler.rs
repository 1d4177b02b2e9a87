use std::{
    pin::Pin,
    task::{Context, Poll},
};

use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};

use crate::{
    Limits, MhtmlError, Part, StructuralError,
    parser::{
        boundary::{Boundary, resolve_boundary},
        decoder::{DEFAULT_TRANSFER_ENCODING, DecoderRegistry},
        headers::parse_headers,
        lines::LineStream,
        matcher,
    },
};

const CONTENT_TRANSFER_ENCODING: &str = "Content-Transfer-Encoding";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssemblerState {
    ExpectHeaders,
    ExpectContent,
    Done,
    Failed,
}

/// Pulls archive parts one at a time from a chunked byte source.
///
/// Each step parses a header block, resolves the boundary on the first step
/// only, selects a decoder by `Content-Transfer-Encoding`, and decodes the
/// content lines up to the next boundary or terminus line.
#[derive(Debug)]
pub struct PartAssembler<S> {
    lines: LineStream<S>,
    decoders: DecoderRegistry,
    limits: Limits,
    boundary: Option<Boundary>,
    state: AssemblerState,
    parts: usize,
}

impl<S> PartAssembler<S> {
    /// Creates an assembler with an already merged decoder registry.
    pub fn new(stream: S, decoders: DecoderRegistry, limits: Limits) -> Self {
        Self {
            lines: LineStream::new(stream),
            decoders,
            limits,
            boundary: None,
            state: AssemblerState::ExpectHeaders,
            parts: 0,
        }
    }

    /// Returns the boundary once the first header block has been parsed.
    pub fn boundary(&self) -> Option<&Boundary> {
        self.boundary.as_ref()
    }

    /// Returns `true` once the terminus was reached or a step failed.
    pub fn is_finished(&self) -> bool {
        matches!(self.state, AssemblerState::Done | AssemblerState::Failed)
    }
}

impl<S> PartAssembler<S>
where
    S: Stream<Item = Result<Bytes, MhtmlError>> + Unpin + Send,
{
    /// Assembles the next part.
    ///
    /// Returns `None` after the terminus line or after the first error.
    pub async fn next_part(&mut self) -> Option<Result<Part, MhtmlError>> {
        if self.is_finished() {
            return None;
        }

        let result = self.assemble().await;
        if result.is_err() {
            self.state = AssemblerState::Failed;
        }
        Some(result)
    }

    async fn assemble(&mut self) -> Result<Part, MhtmlError> {
        if let Some(max_parts) = self.limits.max_parts {
            if self.parts >= max_parts {
                return Err(MhtmlError::PartLimitExceeded { max_parts });
            }
        }

        let headers = parse_headers(&mut self.lines).await?;
        let boundary = match &self.boundary {
            Some(boundary) => boundary.clone(),
            None => {
                let boundary = resolve_boundary(&headers)?;
                self.boundary = Some(boundary.clone());
                boundary
            }
        };

        let encoding = headers
            .get(CONTENT_TRANSFER_ENCODING)
            .unwrap_or_else(|| DEFAULT_TRANSFER_ENCODING.to_owned());
        let decoder = self.decoders.select(&encoding)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            part = self.parts,
            encoding = encoding.as_str(),
            "assembler: decoding part content"
        );

        self.state = AssemblerState::ExpectContent;
        let mut body = ContentLines::new(&mut self.lines, &boundary);

        let content = {
            let mut decoded = decoder.decode(Box::pin(&mut body));
            let mut content = BytesMut::new();
            while let Some(chunk) = decoded.next().await {
                let chunk = chunk?;
                if let Some(max_part_size) = self.limits.max_part_size {
                    if (content.len() + chunk.len()) as u64 > max_part_size {
                        return Err(MhtmlError::PartSizeLimitExceeded { max_part_size });
                    }
                }
                content.extend_from_slice(&chunk);
            }
            content.freeze()
        };

        // a decoder may stop early; skip to the marker so the next header block lines up
        while let Some(line) = body.next().await {
            line?;
        }

        self.state = match body.end {
            Some(Marker::Terminus) => AssemblerState::Done,
            Some(Marker::Boundary) => AssemblerState::ExpectHeaders,
            // only reachable when the decoder dropped the error item
            Some(Marker::Failed) | None => return Err(body.into_failure()),
        };
        self.parts += 1;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            part = self.parts,
            size = content.len(),
            finished = self.state == AssemblerState::Done,
            "assembler: completed part"
        );

        Ok(Part::new(headers, content))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Boundary,
    Terminus,
    Failed,
}

/// Content lines of one part, ending before the next boundary or terminus.
#[derive(Debug)]
struct ContentLines<'a, S> {
    lines: &'a mut LineStream<S>,
    boundary: &'a Boundary,
    end: Option<Marker>,
    failure: Option<MhtmlError>,
}

impl<'a, S> ContentLines<'a, S> {
    fn new(lines: &'a mut LineStream<S>, boundary: &'a Boundary) -> Self {
        Self {
            lines,
            boundary,
            end: None,
            failure: None,
        }
    }

    fn missing_terminus(&self) -> MhtmlError {
        StructuralError::MissingTerminationBoundary {
            terminus: self.boundary.terminus_lossy(),
        }
        .into()
    }

    /// First error seen on the content lines, or a missing terminus.
    fn into_failure(self) -> MhtmlError {
        match self.failure {
            Some(err) => err,
            None => self.missing_terminus(),
        }
    }

    fn fail(&mut self, err: MhtmlError) -> Poll<Option<Result<Bytes, MhtmlError>>> {
        self.end = Some(Marker::Failed);
        self.failure = Some(err.clone());
        Poll::Ready(Some(Err(err)))
    }
}

impl<S> Stream for ContentLines<'_, S>
where
    S: Stream<Item = Result<Bytes, MhtmlError>> + Unpin,
{
    type Item = Result<Bytes, MhtmlError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.end.is_some() {
            return Poll::Ready(None);
        }

        let line = match Pin::new(&mut *self.lines).poll_next(cx) {
            Poll::Ready(Some(Ok(line))) => line,
            Poll::Ready(Some(Err(err))) => return self.fail(err),
            Poll::Ready(None) => {
                let err = self.missing_terminus();
                return self.fail(err);
            }
            Poll::Pending => return Poll::Pending,
        };

        if matcher::equal(&line, self.boundary.boundary()) {
            self.end = Some(Marker::Boundary);
            return Poll::Ready(None);
        }

        if matcher::equal(&line, self.boundary.terminus()) {
            self.end = Some(Marker::Terminus);
            return Poll::Ready(None);
        }

        Poll::Ready(Some(Ok(line)))
    }
}

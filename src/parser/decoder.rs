//! Content-transfer-encoding decoders.
//!
//! A decoder maps the raw content lines of one part to decoded chunks. It is
//! polled lazily, so it only ever waits on the next input line.

use std::{collections::HashMap, fmt, pin::Pin, sync::Arc};

use base64::{Engine, engine::general_purpose::STANDARD};
use bytes::{BufMut, Bytes, BytesMut};
use futures::{Stream, StreamExt, stream};

use crate::{DecodeError, EncodingError, MhtmlError};

/// Boxed stream type used between pipeline stages.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// Stream of raw lines in, or decoded chunks out.
pub type ByteStream<'a> = BoxStream<'a, Result<Bytes, MhtmlError>>;

/// Transfer encoding assumed when a part has no `Content-Transfer-Encoding`.
pub const DEFAULT_TRANSFER_ENCODING: &str = "7bit";

/// Newline appended by quoted-printable after every hard line break.
pub const DEFAULT_NEWLINE: &[u8] = b"\n";

/// A content-transfer-encoding decoder.
///
/// Implement this to handle encodings the built-ins don't, or to replace one
/// of them through [`DecoderRegistry::insert`].
pub trait Decoder: Send + Sync {
    /// Transforms raw content lines into decoded chunks.
    fn decode<'a>(&self, lines: ByteStream<'a>) -> ByteStream<'a>;
}

/// Passes lines through unchanged (`7bit`, `8bit`).
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Decoder for Identity {
    fn decode<'a>(&self, lines: ByteStream<'a>) -> ByteStream<'a> {
        lines
    }
}

/// Decodes each line as a standalone base64 token.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64;

impl Decoder for Base64 {
    fn decode<'a>(&self, lines: ByteStream<'a>) -> ByteStream<'a> {
        lines
            .map(|line| -> Result<Bytes, MhtmlError> {
                let line = line?;
                let decoded = STANDARD.decode(&line).map_err(DecodeError::from)?;
                Ok(Bytes::from(decoded))
            })
            .boxed()
    }
}

/// Decodes quoted-printable lines, one output chunk per input line.
#[derive(Debug, Clone)]
pub struct QuotedPrintable {
    newline: Bytes,
}

impl QuotedPrintable {
    /// Creates a decoder that appends `newline` after each hard line break.
    pub fn new(newline: impl Into<Bytes>) -> Self {
        Self {
            newline: newline.into(),
        }
    }
}

impl Default for QuotedPrintable {
    fn default() -> Self {
        Self::new(Bytes::from_static(DEFAULT_NEWLINE))
    }
}

impl Decoder for QuotedPrintable {
    fn decode<'a>(&self, lines: ByteStream<'a>) -> ByteStream<'a> {
        let newline = self.newline.clone();
        lines
            .map(move |line| -> Result<Bytes, MhtmlError> {
                Ok(decode_quoted_printable_line(&line?, &newline)?)
            })
            .boxed()
    }
}

/// Rejects `binary` content unconditionally.
///
/// Raw binary bodies can contain CRLF anywhere, so a line-oriented splitter
/// can't delimit them. Register [`Identity`] under `binary` to accept them
/// anyway.
#[derive(Debug, Clone, Copy, Default)]
pub struct Binary;

impl Decoder for Binary {
    fn decode<'a>(&self, _lines: ByteStream<'a>) -> ByteStream<'a> {
        stream::iter([Err::<Bytes, MhtmlError>(
            EncodingError::BinaryUnsupported.into(),
        )])
        .boxed()
    }
}

/// Decodes one quoted-printable line.
///
/// A trailing `=` is a soft line break and suppresses `newline`.
pub fn decode_quoted_printable_line(line: &[u8], newline: &[u8]) -> Result<Bytes, DecodeError> {
    let mut out = BytesMut::with_capacity(line.len() + newline.len());
    let mut soft_break = false;
    let mut index = 0usize;

    while index < line.len() {
        let byte = line[index];
        if !byte.is_ascii() {
            return Err(DecodeError::NonAsciiQuotedPrintable { byte });
        }

        if byte != b'=' {
            out.put_u8(byte);
            index += 1;
            continue;
        }

        match line.len() - index {
            1 => {
                soft_break = true;
                index += 1;
            }
            remaining => {
                let escape = &line[index + 1..(index + 3).min(line.len())];
                if let Some(&byte) = escape.iter().find(|byte| !byte.is_ascii()) {
                    return Err(DecodeError::NonAsciiQuotedPrintable { byte });
                }
                if remaining == 2 {
                    return Err(DecodeError::MalformedEscape);
                }
                out.put_u8(decode_hex_pair(escape[0], escape[1])?);
                index += 3;
            }
        }
    }

    if !soft_break {
        out.extend_from_slice(newline);
    }
    Ok(out.freeze())
}

pub(crate) fn decode_hex_pair(hi: u8, lo: u8) -> Result<u8, DecodeError> {
    Ok((hex_value(hi)? << 4) | hex_value(lo)?)
}

fn hex_value(byte: u8) -> Result<u8, DecodeError> {
    match byte {
        b'0'..=b'9' => Ok(byte - b'0'),
        b'a'..=b'f' => Ok(byte - b'a' + 10),
        b'A'..=b'F' => Ok(byte - b'A' + 10),
        _ => Err(DecodeError::MalformedEscape),
    }
}

/// Mapping from transfer-encoding name to decoder.
///
/// Names are matched ASCII-case-insensitively.
#[derive(Clone, Default)]
pub struct DecoderRegistry {
    decoders: HashMap<String, Arc<dyn Decoder>>,
}

impl fmt::Debug for DecoderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = self.decoders.keys().collect::<Vec<_>>();
        names.sort();
        f.debug_struct("DecoderRegistry")
            .field("encodings", &names)
            .finish()
    }
}

impl DecoderRegistry {
    /// Creates a registry with no decoders.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the built-in registry: `7bit`, `8bit`, `base64`,
    /// `quoted-printable` and `binary`.
    pub fn with_defaults(newline: impl Into<Bytes>) -> Self {
        let mut registry = Self::new();
        registry.insert("7bit", Identity);
        registry.insert("8bit", Identity);
        registry.insert("base64", Base64);
        registry.insert("quoted-printable", QuotedPrintable::new(newline));
        registry.insert("binary", Binary);
        registry
    }

    /// Registers `decoder` under `name`, replacing any previous entry.
    pub fn insert(&mut self, name: impl AsRef<str>, decoder: impl Decoder + 'static) {
        self.insert_shared(name, Arc::new(decoder));
    }

    /// Registers an already shared decoder under `name`.
    pub fn insert_shared(&mut self, name: impl AsRef<str>, decoder: Arc<dyn Decoder>) {
        self.decoders
            .insert(name.as_ref().to_ascii_lowercase(), decoder);
    }

    /// Copies every entry of `overrides` into this registry; overrides win.
    pub fn merge(&mut self, overrides: &DecoderRegistry) {
        for (name, decoder) in &overrides.decoders {
            self.decoders.insert(name.clone(), Arc::clone(decoder));
        }
    }

    /// Returns `true` when a decoder is registered for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.decoders.contains_key(&name.to_ascii_lowercase())
    }

    /// Returns registered encoding names in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.decoders.keys().map(String::as_str)
    }

    /// Returns the number of registered decoders.
    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    /// Returns `true` when no decoders are registered.
    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// Looks up the decoder for a transfer-encoding name.
    pub fn select(&self, encoding: &str) -> Result<Arc<dyn Decoder>, EncodingError> {
        self.decoders
            .get(&encoding.trim().to_ascii_lowercase())
            .cloned()
            .ok_or_else(|| EncodingError::Unhandled {
                encoding: encoding.to_owned(),
            })
    }
}

use base64::{Engine, engine::general_purpose::STANDARD};
use encoding::{DecoderTrap, label::encoding_from_whatwg_label};

use crate::{DecodeError, parser::decoder::decode_hex_pair};

/// Pieces of a `=?charset?encoding?payload?=` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedWord<'a> {
    /// Charset label, e.g. `iso-8859-1`.
    pub charset: &'a str,
    /// `B` or `Q`, normalized to upper case.
    pub encoding: u8,
    /// Encoded payload.
    pub payload: &'a [u8],
}

impl<'a> EncodedWord<'a> {
    /// Matches a whole segment against the encoded-word syntax.
    ///
    /// Charset and payload must be non-empty and free of `?` and whitespace.
    pub fn parse(segment: &'a [u8]) -> Option<Self> {
        let inner = segment.strip_prefix(b"=?")?.strip_suffix(b"?=")?;
        let mut fields = inner.split(|&byte| byte == b'?');
        let charset = fields.next()?;
        let encoding = fields.next()?;
        let payload = fields.next()?;
        if fields.next().is_some() {
            return None;
        }

        let encoding = match encoding {
            [b'B' | b'b'] => b'B',
            [b'Q' | b'q'] => b'Q',
            _ => return None,
        };
        if !is_token(charset) || !is_token(payload) {
            return None;
        }

        Some(Self {
            charset: std::str::from_utf8(charset).ok()?,
            encoding,
            payload,
        })
    }

    /// Decodes the payload and converts it from the named charset.
    pub fn decode(&self) -> Result<String, DecodeError> {
        let bytes = match self.encoding {
            b'Q' => decode_q(self.payload)?,
            _ => STANDARD.decode(self.payload)?,
        };
        decode_charset(self.charset, &bytes)
    }
}

/// Decodes a header value segment.
///
/// A segment that is exactly one encoded word is replaced by its decoded
/// text; anything else is returned verbatim, with invalid UTF-8 replaced by
/// U+FFFD.
pub fn decode_header_value(segment: &[u8]) -> Result<String, DecodeError> {
    match EncodedWord::parse(segment) {
        Some(word) => word.decode(),
        None => Ok(String::from_utf8_lossy(segment).into_owned()),
    }
}

/// Decodes a Q-encoded payload: `_` is a space and `=XY` is one byte.
pub fn decode_q(payload: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut out = Vec::with_capacity(payload.len());
    let mut index = 0usize;

    while index < payload.len() {
        match payload[index] {
            byte if !byte.is_ascii() => {
                return Err(DecodeError::NonAsciiEncodedWord {
                    word: String::from_utf8_lossy(payload).into_owned(),
                });
            }
            b'_' => {
                out.push(b' ');
                index += 1;
            }
            b'=' => {
                let (Some(&hi), Some(&lo)) = (payload.get(index + 1), payload.get(index + 2)) else {
                    return Err(DecodeError::MalformedEscape);
                };
                out.push(decode_hex_pair(hi, lo)?);
                index += 3;
            }
            byte => {
                out.push(byte);
                index += 1;
            }
        }
    }

    Ok(out)
}

/// Converts `bytes` from the charset named by `label` to a string.
///
/// Labels follow the WHATWG encoding registry. Unmappable sequences become
/// U+FFFD.
pub fn decode_charset(label: &str, bytes: &[u8]) -> Result<String, DecodeError> {
    let encoding = encoding_from_whatwg_label(label).ok_or_else(|| DecodeError::UnknownCharset {
        charset: label.to_owned(),
    })?;

    encoding
        .decode(bytes, DecoderTrap::Replace)
        .map_err(|_| DecodeError::UnknownCharset {
            charset: label.to_owned(),
        })
}

fn is_token(bytes: &[u8]) -> bool {
    !bytes.is_empty() && !bytes.iter().any(|byte| byte.is_ascii_whitespace())
}

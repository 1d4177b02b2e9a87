use bytes::Bytes;
use futures::{Stream, StreamExt};

use crate::{
    Headers, MhtmlError, StructuralError,
    parser::{encoded_word::decode_header_value, matcher},
};

const KEY_VALUE_DELIMITER: &[u8] = b": ";

/// Reads one header block, up to and including its terminating empty line.
///
/// Lines starting with whitespace continue the previous value; they are
/// joined to it with a single space after their own leading whitespace is
/// stripped. Each value segment is decoded on its own, so an encoded word
/// must fill a whole line (or continuation) to be recognized.
pub async fn parse_headers<L>(lines: &mut L) -> Result<Headers, MhtmlError>
where
    L: Stream<Item = Result<Bytes, MhtmlError>> + Unpin,
{
    let mut headers = Headers::new();
    let mut pending: Option<(String, String)> = None;

    loop {
        let line = lines
            .next()
            .await
            .ok_or(StructuralError::MissingHeaderTerminator)??;

        if line.first().is_some_and(u8::is_ascii_whitespace) {
            let Some((_, value)) = pending.as_mut() else {
                return Err(missing_delimiter(&line));
            };
            value.push(' ');
            value.push_str(&decode_header_value(trim_start(&line))?);
            continue;
        }

        if let Some((key, value)) = pending.take() {
            headers.append(key, value);
        }

        if line.is_empty() {
            return Ok(headers);
        }

        pending = Some(parse_header_line(&line)?);
    }
}

/// Splits a non-folded header line at the first `": "` and decodes the value.
pub fn parse_header_line(line: &[u8]) -> Result<(String, String), MhtmlError> {
    let split = matcher::find(line, KEY_VALUE_DELIMITER).ok_or_else(|| missing_delimiter(line))?;
    let key = String::from_utf8_lossy(&line[..split]).into_owned();
    let value = decode_header_value(&line[split + KEY_VALUE_DELIMITER.len()..])?;
    Ok((key, value))
}

fn missing_delimiter(line: &[u8]) -> MhtmlError {
    StructuralError::MissingKeyValueDelimiter {
        line: String::from_utf8_lossy(line).into_owned(),
    }
    .into()
}

fn trim_start(line: &[u8]) -> &[u8] {
    let start = line
        .iter()
        .position(|byte| !byte.is_ascii_whitespace())
        .unwrap_or(line.len());
    &line[start..]
}

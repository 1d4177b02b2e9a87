use bytes::Bytes;

use crate::{Headers, StructuralError};

const CONTENT_TYPE: &str = "Content-Type";
const MULTIPART_PREFIX: &str = "multipart/";
const BOUNDARY_PARAM: &str = "boundary=";

/// Boundary and terminus lines of a multipart archive.
///
/// Resolved once from the first header block and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary {
    boundary: Bytes,
    terminus: Bytes,
}

impl Boundary {
    /// Builds the marker lines for a raw boundary token.
    pub fn new(token: &str) -> Self {
        Self {
            boundary: Bytes::from(format!("--{token}")),
            terminus: Bytes::from(format!("--{token}--")),
        }
    }

    /// Line separating two parts (`--token`).
    pub fn boundary(&self) -> &[u8] {
        &self.boundary
    }

    /// Line ending the archive (`--token--`).
    pub fn terminus(&self) -> &[u8] {
        &self.terminus
    }

    /// Terminus line rendered for error messages.
    pub fn terminus_lossy(&self) -> String {
        String::from_utf8_lossy(&self.terminus).into_owned()
    }
}

/// Resolves the boundary markers from the first header block.
pub fn resolve_boundary(headers: &Headers) -> Result<Boundary, StructuralError> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .ok_or(StructuralError::MissingContentType)?;

    let token = extract_boundary_token(&content_type).ok_or_else(|| StructuralError::NotMultipart {
        content_type: content_type.clone(),
    })?;

    #[cfg(feature = "tracing")]
    tracing::debug!(boundary = token, "boundary: resolved multipart boundary");

    Ok(Boundary::new(token))
}

/// Extracts the boundary token from a `Content-Type` value.
///
/// Fields are separated by `"; "`. One must start with `multipart/` and one
/// must be `boundary=<token>`; a single pair of surrounding double quotes is
/// stripped from the token.
pub fn extract_boundary_token(content_type: &str) -> Option<&str> {
    let mut multipart = false;
    let mut token = None;

    for field in content_type.split("; ") {
        if field.starts_with(MULTIPART_PREFIX) {
            multipart = true;
        } else if let Some(raw) = field.strip_prefix(BOUNDARY_PARAM) {
            token = Some(strip_quotes(raw));
        }
    }

    if multipart { token } else { None }
}

fn strip_quotes(raw: &str) -> &str {
    raw.strip_prefix('"')
        .and_then(|value| value.strip_suffix('"'))
        .unwrap_or(raw)
}

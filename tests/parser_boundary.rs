#![allow(missing_docs)]

use mhtml_stream::{
    Headers, StructuralError,
    parser::{extract_boundary_token, resolve_boundary},
};

fn headers_with_content_type(value: &str) -> Headers {
    [("Content-Type", value)].into_iter().collect()
}

#[test]
fn resolves_boundary_and_terminus() {
    let boundary = resolve_boundary(&headers_with_content_type("multipart/mixed; boundary=frontier"))
        .expect("boundary should resolve");

    assert_eq!(boundary.boundary(), b"--frontier".as_slice());
    assert_eq!(boundary.terminus(), b"--frontier--".as_slice());
}

#[test]
fn strips_one_pair_of_quotes() {
    let token = extract_boundary_token("multipart/related; boundary=\"----MultipartBoundary--abc\"; type=\"text/html\"");
    assert_eq!(token, Some("----MultipartBoundary--abc"));
}

#[test]
fn boundary_may_precede_media_type() {
    let token = extract_boundary_token("boundary=x; multipart/related");
    assert_eq!(token, Some("x"));
}

#[test]
fn rejects_missing_content_type() {
    let headers: Headers = [("MIME-Version", "1.0")].into_iter().collect();
    let err = resolve_boundary(&headers).expect_err("must fail");
    assert_eq!(err, StructuralError::MissingContentType);
    assert!(err.to_string().contains("didn't contain a content type"));
}

#[test]
fn rejects_non_multipart_content_type() {
    let err = resolve_boundary(&headers_with_content_type("text/plain; boundary=frontier"))
        .expect_err("must fail");
    assert!(matches!(err, StructuralError::NotMultipart { .. }));
    assert!(err.to_string().contains("first content type header didn't contain"));
}

#[test]
fn rejects_multipart_without_boundary() {
    let err =
        resolve_boundary(&headers_with_content_type("multipart/mixed")).expect_err("must fail");
    assert!(matches!(err, StructuralError::NotMultipart { .. }));
}

#[test]
fn content_type_lookup_ignores_case() {
    let headers: Headers = [("content-type", "multipart/related; boundary=b")]
        .into_iter()
        .collect();
    assert!(resolve_boundary(&headers).is_ok());
}

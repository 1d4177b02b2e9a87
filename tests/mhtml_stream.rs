#![allow(missing_docs)]

use bytes::Bytes;
use futures::{StreamExt, TryStreamExt, channel::mpsc, stream};
use mhtml_stream::{
    DecodeError, Decoder, EncodingError, Identity, Mhtml, MhtmlError, MhtmlParser, Part,
    StructuralError, parser::ByteStream,
};

// from https://en.wikipedia.org/wiki/MIME#Multipart_messages
const EXAMPLE: &str = "MIME-Version: 1.0
Subject: =?iso-8859-1?Q?=A1Hola,_se=F1or!?=
Content-Type: multipart/mixed; boundary=frontier

This is a message with multiple parts in MIME format.
--frontier
Content-Type: text/plain

This is the body of the message.
--frontier
Content-Type: application/octet-stream
Content-Transfer-Encoding: base64

PGh0bWw+CiAgPGhlYWQ+CiAgPC9oZWFkPgogIDxib2R5PgogICAgPHA+VGhpcyBpcyB0aGUg
Ym9keSBvZiB0aGUgbWVzc2FnZS48L3A+CiAgPC9ib2R5Pgo8L2h0bWw+Cg==
--frontier--
";

const HTML: &str = "<html>\n  <head>\n  </head>\n  <body>\n    <p>This is the body of the message.</p>\n  </body>\n</html>\n";

fn crlf(text: &str) -> Bytes {
    Bytes::from(text.replace('\n', "\r\n"))
}

fn single_chunk(text: &str) -> impl futures::Stream<Item = Result<Bytes, MhtmlError>> + Unpin + Send + 'static {
    stream::iter([Ok::<Bytes, MhtmlError>(crlf(text))])
}

async fn parse_all(text: &str) -> Result<Vec<Part>, MhtmlError> {
    Mhtml::new(single_chunk(text)).try_collect().await
}

fn header_pairs(part: &Part) -> Vec<(String, String)> {
    part.headers
        .iter()
        .map(|(key, value)| (key.to_owned(), value))
        .collect()
}

fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
    expected
        .iter()
        .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
        .collect()
}

#[tokio::test]
async fn parses_wikipedia_example() {
    let parts = parse_all(EXAMPLE).await.expect("example should parse");
    assert_eq!(parts.len(), 3);

    assert_eq!(
        header_pairs(&parts[0]),
        pairs(&[
            ("MIME-Version", "1.0"),
            ("Subject", "\u{a1}Hola, se\u{f1}or!"),
            ("Content-Type", "multipart/mixed; boundary=frontier"),
        ])
    );
    assert_eq!(header_pairs(&parts[1]), pairs(&[("Content-Type", "text/plain")]));
    assert_eq!(
        header_pairs(&parts[2]),
        pairs(&[
            ("Content-Type", "application/octet-stream"),
            ("Content-Transfer-Encoding", "base64"),
        ])
    );

    assert_eq!(
        parts[0].text().expect("utf-8"),
        "This is a message with multiple parts in MIME format."
    );
    assert_eq!(parts[1].text().expect("utf-8"), "This is the body of the message.");
    assert_eq!(parts[2].content, Bytes::from_static(HTML.as_bytes()));
    assert_eq!(parts[2].transfer_encoding(), "base64");
}

#[tokio::test]
async fn parses_folded_and_b_encoded_headers_with_quoted_boundary() {
    let content = "MIME-Version: 1.0
From: this is a wrapped: header
  with an extra delimiter in: both sections
Subject: =?utf-8?B?QmFzZSA2NCDigJQgTW96aWxsYSBEZXZlbG9wZXIgTmV0d29yaw==?=
Content-Type: multipart/mixed; boundary=\"quoted-frontier\"

This is a message with multiple parts in MIME format.
--quoted-frontier--
";
    let parts = parse_all(content).await.expect("should parse");
    assert_eq!(parts.len(), 1);
    assert_eq!(
        header_pairs(&parts[0]),
        pairs(&[
            ("MIME-Version", "1.0"),
            (
                "From",
                "this is a wrapped: header with an extra delimiter in: both sections"
            ),
            ("Subject", "Base 64 \u{2014} Mozilla Developer Network"),
            ("Content-Type", "multipart/mixed; boundary=\"quoted-frontier\""),
        ])
    );
    assert_eq!(
        parts[0].text().expect("utf-8"),
        "This is a message with multiple parts in MIME format."
    );
}

#[tokio::test]
async fn output_does_not_depend_on_chunking() {
    let whole = parse_all(EXAMPLE).await.expect("should parse");
    let bytes = crlf(EXAMPLE);

    for size in [1usize, 2, 3, 7, 64] {
        let chunks = bytes
            .chunks(size)
            .map(|chunk| Ok::<Bytes, MhtmlError>(Bytes::copy_from_slice(chunk)))
            .collect::<Vec<_>>();
        let parts: Vec<Part> = Mhtml::new(stream::iter(chunks))
            .try_collect()
            .await
            .expect("should parse");
        assert_eq!(parts, whole, "chunk size {size}");
    }
}

#[tokio::test]
async fn yields_parts_before_input_completes() {
    let (tx, rx) = mpsc::unbounded::<Result<Bytes, MhtmlError>>();
    let mut parts = Mhtml::new(rx);

    tx.unbounded_send(Ok(crlf(
        "Content-Type: multipart/related; boundary=B\n\nroot\n--B\nContent-Type: text/html\n\n",
    )))
    .expect("send first chunk");

    let first = parts
        .next()
        .await
        .expect("first item should exist")
        .expect("first part should parse");
    assert_eq!(first.content, Bytes::from_static(b"root"));

    tx.unbounded_send(Ok(crlf("<p>hi</p>\n--B--\n")))
        .expect("send second chunk");
    drop(tx);

    let second = parts
        .next()
        .await
        .expect("second item should exist")
        .expect("second part should parse");
    assert_eq!(second.content_type(), Some("text/html"));
    assert_eq!(second.content, Bytes::from_static(b"<p>hi</p>"));
    assert!(parts.next().await.is_none());
}

#[tokio::test]
async fn quoted_printable_part_is_decoded() {
    let content = "Content-Type: multipart/related; boundary=B

--B
Content-Type: text/html
Content-Transfer-Encoding: quoted-printable

<p class=3D\"x\">long line that is =
wrapped</p>
--B--
";
    let parts = parse_all(content).await.expect("should parse");
    assert_eq!(parts.len(), 2);
    assert!(parts[0].content.is_empty());
    assert_eq!(
        parts[1].text().expect("utf-8"),
        "<p class=\"x\">long line that is wrapped</p>\n"
    );
}

#[tokio::test]
async fn boundary_is_resolved_only_once() {
    let content = "Content-Type: multipart/related; boundary=outer

--outer
Content-Type: multipart/alternative; boundary=inner

--inner
--outer--
";
    let parts = parse_all(content).await.expect("should parse");
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[1].content, Bytes::from_static(b"--inner"));
}

#[tokio::test]
async fn fails_on_non_ascii_in_q_encoding() {
    let mut raw = b"MIME-Version: 1.0\r\nSubject: =?iso-8859-1?Q?=A1Hola,".to_vec();
    raw.push(0xff);
    raw.extend_from_slice(b"se=F1or!?=\r\n");
    let result: Result<Vec<Part>, _> = Mhtml::new(stream::iter([Ok::<Bytes, MhtmlError>(Bytes::from(raw))]))
        .try_collect()
        .await;

    let err = result.expect_err("must fail");
    assert!(matches!(
        err,
        MhtmlError::Decode(DecodeError::NonAsciiEncodedWord { .. })
    ));
}

#[tokio::test]
async fn fails_without_empty_header_delimiter() {
    let err = parse_all("MIME-Version: 1.0").await.expect_err("must fail");
    assert_eq!(
        err,
        MhtmlError::Structural(StructuralError::MissingHeaderTerminator)
    );
}

#[tokio::test]
async fn fails_with_invalid_header() {
    let err = parse_all("MIME-Version: 1.0\ninvalid header\n\n")
        .await
        .expect_err("must fail");
    assert!(err.to_string().contains("header line didn't have key-value delimiter"));
}

#[tokio::test]
async fn fails_with_missing_content_type() {
    let err = parse_all("MIME-Version: 1.0\n\n").await.expect_err("must fail");
    assert_eq!(err, MhtmlError::Structural(StructuralError::MissingContentType));
}

#[tokio::test]
async fn fails_with_missing_multipart() {
    let err = parse_all("MIME-Version: 1.0\nContent-Type: text/plain; boundary=frontier\n\n")
        .await
        .expect_err("must fail");
    assert!(err.to_string().contains("first content type header didn't contain"));
}

#[tokio::test]
async fn fails_with_missing_boundary() {
    let err = parse_all("MIME-Version: 1.0\nContent-Type: multipart/mixed\n\n")
        .await
        .expect_err("must fail");
    assert!(matches!(
        err,
        MhtmlError::Structural(StructuralError::NotMultipart { .. })
    ));
}

#[tokio::test]
async fn fails_with_unhandled_encoding() {
    let err = parse_all(
        "MIME-Version: 1.0\nContent-Transfer-Encoding: unknown\nContent-Type: multipart/mixed; boundary=frontier\n\n",
    )
    .await
    .expect_err("must fail");
    assert_eq!(
        err,
        MhtmlError::Encoding(EncodingError::Unhandled {
            encoding: "unknown".to_owned()
        })
    );
    assert!(err.to_string().contains("unhandled encoding type: unknown"));
}

#[tokio::test]
async fn fails_without_terminus() {
    let err = parse_all(
        "MIME-Version: 1.0\nContent-Type: multipart/mixed; boundary=frontier\n\nThis is a message with multiple parts in MIME format.\n",
    )
    .await
    .expect_err("must fail");
    assert_eq!(
        err,
        MhtmlError::Structural(StructuralError::MissingTerminationBoundary {
            terminus: "--frontier--".to_owned()
        })
    );
}

#[tokio::test]
async fn binary_part_fails_but_earlier_parts_remain_valid() {
    let content = "Content-Type: multipart/related; boundary=B

root
--B
Content-Transfer-Encoding: binary

raw
--B--
";
    let mut parts = Mhtml::new(single_chunk(content));

    let first = parts
        .next()
        .await
        .expect("first item")
        .expect("first part should parse");
    assert_eq!(first.content, Bytes::from_static(b"root"));

    let err = parts
        .next()
        .await
        .expect("second item")
        .expect_err("binary must fail");
    assert_eq!(err, MhtmlError::Encoding(EncodingError::BinaryUnsupported));

    assert!(parts.next().await.is_none(), "stream is fused after an error");
    assert_eq!(first.text().expect("utf-8"), "root");
}

#[tokio::test]
async fn override_decoder_replaces_builtin() {
    let content = "Content-Type: multipart/related; boundary=B

--B
Content-Transfer-Encoding: binary

raw
bytes
--B--
";
    let parser = MhtmlParser::builder()
        .decoder("binary", Identity)
        .build()
        .expect("config should validate");

    let parts: Vec<Part> = parser
        .parse(single_chunk(content))
        .try_collect()
        .await
        .expect("override should accept binary");
    assert_eq!(parts[1].content, Bytes::from_static(b"rawbytes"));
}

#[derive(Debug)]
struct Uppercase;

impl Decoder for Uppercase {
    fn decode<'a>(&self, lines: ByteStream<'a>) -> ByteStream<'a> {
        lines
            .map(|line| line.map(|line| Bytes::from(line.to_ascii_uppercase())))
            .boxed()
    }
}

#[tokio::test]
async fn custom_encoding_name_is_selectable() {
    let content = "Content-Type: multipart/related; boundary=B

--B
Content-Transfer-Encoding: x-shout

hello
--B--
";
    let parser = MhtmlParser::builder()
        .decoder("X-Shout", Uppercase)
        .build()
        .expect("config should validate");

    let parts: Vec<Part> = parser
        .parse_bytes(crlf(content))
        .try_collect()
        .await
        .expect("custom decoder should run");
    assert_eq!(parts[1].content, Bytes::from_static(b"HELLO"));
}

#[derive(Debug)]
struct FirstLineOnly;

impl Decoder for FirstLineOnly {
    fn decode<'a>(&self, lines: ByteStream<'a>) -> ByteStream<'a> {
        lines.take(1).boxed()
    }
}

#[tokio::test]
async fn early_stopping_decoder_keeps_parts_aligned() {
    let content = "Content-Type: multipart/related; boundary=B

--B
Content-Transfer-Encoding: x-head

one
two
three
--B
Content-Type: text/plain

after
--B--
";
    let parser = MhtmlParser::builder()
        .decoder("x-head", FirstLineOnly)
        .build()
        .expect("config should validate");

    let parts: Vec<Part> = parser
        .parse_bytes(crlf(content))
        .try_collect()
        .await
        .expect("should parse");
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[1].content, Bytes::from_static(b"one"));
    assert_eq!(parts[2].text().expect("utf-8"), "after");
}

#[tokio::test]
async fn source_error_aborts_parsing() {
    let input = stream::iter([
        Ok(crlf("Content-Type: multipart/related; boundary=B\n\n")),
        Err(MhtmlError::source_failed("disk went away")),
    ]);
    let mut parts = Mhtml::new(input);

    let err = parts
        .next()
        .await
        .expect("item")
        .expect_err("must fail");
    assert_eq!(err, MhtmlError::source_failed("disk went away"));
    assert!(parts.next().await.is_none());
}

#[derive(Debug)]
struct SkipErrors;

impl Decoder for SkipErrors {
    fn decode<'a>(&self, lines: ByteStream<'a>) -> ByteStream<'a> {
        lines
            .filter(|line| futures::future::ready(line.is_ok()))
            .boxed()
    }
}

#[tokio::test]
async fn truncated_part_fails_even_when_decoder_drops_errors() {
    let parser = MhtmlParser::builder()
        .decoder("x-lenient", SkipErrors)
        .build()
        .expect("config should validate");
    let mut parts = parser.parse_bytes(Bytes::from_static(
        b"Content-Type: multipart/related; boundary=B\r\n\r\n--B\r\nContent-Transfer-Encoding: x-lenient\r\n\r\ntruncated",
    ));

    assert!(parts.next().await.expect("root").is_ok());
    let err = parts
        .next()
        .await
        .expect("second item")
        .expect_err("must fail");
    assert_eq!(
        err,
        MhtmlError::Structural(StructuralError::MissingTerminationBoundary {
            terminus: "--B--".to_owned()
        })
    );
    assert!(parts.next().await.is_none());
}

#[tokio::test]
async fn source_error_inside_content_survives_lenient_decoder() {
    let parser = MhtmlParser::builder()
        .decoder("x-lenient", SkipErrors)
        .build()
        .expect("config should validate");
    let input = stream::iter([
        Ok(crlf(
            "Content-Type: multipart/related; boundary=B\n\n--B\nContent-Transfer-Encoding: x-lenient\n\npartial\n",
        )),
        Err(MhtmlError::source_failed("connection reset")),
    ]);
    let mut parts = parser.parse(input);

    assert!(parts.next().await.expect("root").is_ok());
    let err = parts
        .next()
        .await
        .expect("second item")
        .expect_err("must fail");
    assert_eq!(err, MhtmlError::source_failed("connection reset"));
}

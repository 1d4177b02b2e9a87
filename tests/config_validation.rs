#![allow(missing_docs)]

use bytes::Bytes;
use mhtml_stream::{
    ConfigError, DecoderRegistry, Identity, Limits, Mhtml, MhtmlConfig, MhtmlParser,
    source,
};

#[test]
fn default_config_is_valid() {
    let config = MhtmlConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.newline, Bytes::from_static(b"\n"));
    assert!(config.decoder_overrides.is_empty());
}

#[test]
fn rejects_empty_newline() {
    let err = MhtmlParser::builder()
        .newline(Bytes::new())
        .build_config()
        .expect_err("must fail");
    assert_eq!(err, ConfigError::EmptyNewline);
}

#[test]
fn rejects_empty_decoder_name() {
    let err = MhtmlParser::builder()
        .decoder("", Identity)
        .validate()
        .expect_err("must fail");
    assert_eq!(err, ConfigError::EmptyDecoderName);
}

#[test]
fn rejects_zero_limits() {
    let err = MhtmlParser::builder()
        .limits(Limits {
            max_parts: Some(0),
            ..Limits::default()
        })
        .build()
        .expect_err("must fail");
    assert_eq!(err, ConfigError::InvalidLimitValue { limit: "max_parts" });

    let err = MhtmlConfig {
        limits: Limits {
            max_part_size: Some(0),
            ..Limits::default()
        },
        ..MhtmlConfig::default()
    }
    .validate()
    .expect_err("must fail");
    assert_eq!(
        err,
        ConfigError::InvalidLimitValue {
            limit: "max_part_size"
        }
    );
}

#[test]
fn effective_registry_merges_overrides_over_defaults() {
    let mut overrides = DecoderRegistry::new();
    overrides.insert("7BIT", Identity);
    overrides.insert("x-custom", Identity);
    let config = MhtmlConfig {
        decoder_overrides: overrides,
        ..MhtmlConfig::default()
    };

    let registry = config.decoders();
    assert_eq!(registry.len(), 6);
    assert!(registry.contains("x-custom"));
    assert!(registry.contains("quoted-printable"));
}

#[test]
fn with_config_validates_before_parsing() {
    let config = MhtmlConfig {
        newline: Bytes::new(),
        ..MhtmlConfig::default()
    };
    let err = Mhtml::with_config(source::from_bytes(Bytes::new()), &config).expect_err("must fail");
    assert_eq!(err, ConfigError::EmptyNewline);
    assert!(MhtmlParser::with_config(config).is_err());
}

#[tokio::test]
async fn configured_newline_reaches_quoted_printable() {
    use futures::TryStreamExt;

    let body = "Content-Type: multipart/related; boundary=B\r\n\r\n--B\r\nContent-Transfer-Encoding: quoted-printable\r\n\r\na\r\nb\r\n--B--\r\n";
    let parser = MhtmlParser::builder()
        .newline(Bytes::from_static(b"\r\n"))
        .build()
        .expect("config should validate");

    let parts: Vec<_> = parser
        .parse_bytes(Bytes::from_static(body.as_bytes()))
        .try_collect()
        .await
        .expect("should parse");
    assert_eq!(parts[1].content, Bytes::from_static(b"a\r\nb\r\n"));
}

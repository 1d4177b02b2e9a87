/// Part assembler state machine.
pub mod assembler;
/// Boundary resolution from the first header block.
pub mod boundary;
/// Content-transfer-encoding decoders.
pub mod decoder;
/// Encoded-word header value decoding.
pub mod encoded_word;
/// Header block parsing.
pub mod headers;
/// Chunk-to-line splitting.
pub mod lines;
/// Byte-slice equality and substring search.
pub mod matcher;

pub use assembler::PartAssembler;
pub use boundary::{Boundary, extract_boundary_token, resolve_boundary};
pub use decoder::{
    Base64, Binary, BoxStream, ByteStream, Decoder, DecoderRegistry, Identity, QuotedPrintable,
};
pub use encoded_word::{EncodedWord, decode_header_value};
pub use headers::{parse_header_line, parse_headers};
pub use lines::LineStream;

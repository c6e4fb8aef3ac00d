use std::{error::Error, fmt, io};

use crate::{buffer::RegionKind, element::ElementKind, msg::Compression};

/// The crate's result type.
pub type Result<T> = std::result::Result<T, CodecErr>;

/// Codec validation failures.
///
/// Every variant is a local, synchronous, non-retryable failure surfaced to
/// the immediate caller. Whether a bad update from a peer is fatal or worth
/// a retransmission is transport policy, decided outside the codec.
#[derive(Debug)]
pub enum CodecErr {
    /// The part addresses elements outside the buffer's index space.
    OutOfRange { start: u64, len: u64, total: u64 },
    /// The payload length disagrees with the declared part and element type.
    PayloadSizeMismatch { got: usize, expected: usize },
    /// The caller expected a different region kind than the update declares.
    KindMismatch {
        got: RegionKind,
        expected: RegionKind,
    },
    /// The update's element type is not the codec's element type.
    ElementMismatch {
        got: ElementKind,
        expected: ElementKind,
    },
    /// The update was produced by a different strategy than the codec's.
    CompressionMismatch {
        got: Compression,
        expected: Compression,
    },
    /// The run configuration requests an unsupported combination.
    UnsupportedConfig {
        option: &'static str,
        requested: String,
    },
}

impl fmt::Display for CodecErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecErr::OutOfRange { start, len, total } => write!(
                f,
                "The part at {start} with length {len} lies outside a buffer of {total} elements"
            ),
            CodecErr::PayloadSizeMismatch { got, expected } => write!(
                f,
                "The payload is {got} bytes but the declared part takes {expected}"
            ),
            CodecErr::KindMismatch { got, expected } => {
                write!(f, "Expected a {expected} update, got {got}")
            }
            CodecErr::ElementMismatch { got, expected } => write!(
                f,
                "The update carries {got} elements, this codec handles {expected}"
            ),
            CodecErr::CompressionMismatch { got, expected } => write!(
                f,
                "The update was encoded with {got} compression, this codec uses {expected}"
            ),
            CodecErr::UnsupportedConfig { option, requested } => write!(
                f,
                "The configuration requests an unsupported {option}: {requested}"
            ),
        }
    }
}

impl Error for CodecErr {}

/// Boundary conversion for the framing / I/O APIs.
impl From<CodecErr> for io::Error {
    fn from(value: CodecErr) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, value)
    }
}

use std::{borrow::Cow, fmt, io};

use crate::{
    Deserialize, Serialize,
    buffer::RegionKind,
    element::ElementKind,
    error::{CodecErr, Result},
    part::Part,
};

type Header = u32;
const HEADER_SIZE: usize = size_of::<Header>();

const GRADS_H: Header = 2;
const PARAMS_H: Header = 3;

/// Serialized update layout after the frame length prefix:
/// kind, element tag, compression tag, two reserved bytes, then the part's
/// start and length. 24 bytes, so the payload stays 8-aligned inside an
/// aligned receive buffer.
const UPDATE_HEADER_SIZE: usize = HEADER_SIZE + 1 + 1 + 2 + 2 * size_of::<u64>();

/// The wire tag describing how an update's payload is transformed.
///
/// `None` is the raw passthrough. A compressed or quantized strategy would
/// add its own tag here next to its `Encoding` implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
}

impl Compression {
    pub(crate) const fn wire_tag(self) -> u8 {
        match self {
            Compression::None => 0,
        }
    }

    pub(crate) const fn from_wire_tag(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Compression::None),
            _ => None,
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Compression::None => "none",
        })
    }
}

/// A single wire update carrying one part of one buffer region.
///
/// Constructed fresh by `BlobCodec::encode`, transmitted, consumed by
/// `BlobCodec::decode`; never mutated after encode nor reused across
/// decodes. An uncompressed payload holds the part's elements in the element
/// type's host-native byte representation, row-major order, no padding.
#[derive(Debug)]
pub struct Update<'a> {
    pub kind: RegionKind,
    pub part: Part,
    pub element: ElementKind,
    pub compression: Compression,
    pub payload: Cow<'a, [u8]>,
}

impl Update<'_> {
    /// Checks the payload length against the declared part and element type.
    pub fn check_payload_len(&self) -> Result<()> {
        let expected = self.part.byte_len(self.element.size());
        if self.payload.len() != expected {
            return Err(CodecErr::PayloadSizeMismatch {
                got: self.payload.len(),
                expected,
            });
        }

        Ok(())
    }

    /// Takes ownership of the payload, detaching the update from the receive
    /// buffer it was deserialized from.
    pub fn into_owned(self) -> Update<'static> {
        Update {
            kind: self.kind,
            part: self.part,
            element: self.element,
            compression: self.compression,
            payload: Cow::Owned(self.payload.into_owned()),
        }
    }

    fn buf_is_too_small<T>(size: usize) -> io::Result<T> {
        Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "The given buffer is too small {size}, must at least be {UPDATE_HEADER_SIZE} bytes"
            ),
        ))
    }

    fn invalid_byte<T>(field: &'static str, byte: u8) -> io::Result<T> {
        Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Received an invalid {field} byte {byte}"),
        ))
    }
}

impl<'a> Serialize<'a> for Update<'a> {
    fn serialize(&'a self, buf: &mut Vec<u8>) -> Option<&'a [u8]> {
        let kind = match self.kind {
            RegionKind::Grads => GRADS_H,
            RegionKind::Params => PARAMS_H,
        };

        buf.extend_from_slice(&kind.to_be_bytes());
        buf.push(self.element.wire_tag());
        buf.push(self.compression.wire_tag());
        buf.extend_from_slice(&[0; 2]);
        buf.extend_from_slice(&self.part.start.to_be_bytes());
        buf.extend_from_slice(&self.part.len.to_be_bytes());

        Some(&self.payload)
    }
}

impl<'a> Deserialize<'a> for Update<'a> {
    fn deserialize(buf: &'a [u8]) -> io::Result<Self> {
        if buf.len() < UPDATE_HEADER_SIZE {
            return Self::buf_is_too_small(buf.len());
        }

        let (header, payload) = buf.split_at(UPDATE_HEADER_SIZE);

        // The header was split to a fixed size just above.
        let kind_tag = Header::from_be_bytes(header[..HEADER_SIZE].try_into().unwrap());
        let kind = match kind_tag {
            GRADS_H => RegionKind::Grads,
            PARAMS_H => RegionKind::Params,
            tag => return Self::invalid_byte("kind", tag as u8),
        };

        let Some(element) = ElementKind::from_wire_tag(header[4]) else {
            return Self::invalid_byte("element", header[4]);
        };

        let Some(compression) = Compression::from_wire_tag(header[5]) else {
            return Self::invalid_byte("compression", header[5]);
        };

        let start = u64::from_be_bytes(header[8..16].try_into().unwrap());
        let len = u64::from_be_bytes(header[16..24].try_into().unwrap());

        let update = Update {
            kind,
            part: Part::new(start, len),
            element,
            compression,
            payload: Cow::Borrowed(payload),
        };

        update.check_payload_len().map_err(io::Error::from)?;
        Ok(update)
    }
}

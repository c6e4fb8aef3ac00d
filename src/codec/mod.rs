//! The synchronization codec: buffer region to wire update and back.

mod raw;

use std::borrow::Cow;

use crate::{
    buffer::{RegionKind, SyncBuffer},
    element::Element,
    error::{CodecErr, Result},
    msg::{Compression, Update},
    part::Part,
    specs::{CompressionSpec, SyncSpec},
};

use raw::RawEncoding;

/// One payload transformation strategy.
///
/// A strategy is selected once at construction; encode and decode dispatch
/// through the same object for the codec's whole lifetime, and callers never
/// observe which one is active beyond the update's compression tag.
trait Encoding<E: Element>: Send + Sync {
    /// The wire tag stamped on updates produced with this strategy.
    fn compression(&self) -> Compression;

    /// Transforms a source element range into an owned payload.
    fn encode_part(&self, src: &[E]) -> Vec<u8>;

    /// A borrowed passthrough payload, for strategies whose wire bytes are
    /// exactly the source bytes.
    fn encode_borrowed<'a>(&self, src: &'a [E]) -> Option<&'a [u8]> {
        let _ = src;
        None
    }

    /// Merges a payload into the destination range as
    /// `dst = alpha * src + beta * dst`.
    fn decode_part(&self, payload: &[u8], dst: &mut [E], alpha: E, beta: E);
}

/// The tensor-buffer synchronization codec.
///
/// Stateless across calls: its element type and strategy are fixed at
/// construction and immutable afterwards. Both operations are synchronous,
/// CPU-bound and lock-free, safe to call from multiple threads as long as
/// concurrent decodes do not target overlapping ranges of the same region.
pub struct BlobCodec<E: Element> {
    encoding: Box<dyn Encoding<E>>,
    optimized_path: bool,
}

impl<E: Element> std::fmt::Debug for BlobCodec<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobCodec")
            .field("compression", &self.encoding.compression())
            .field("optimized_path", &self.optimized_path)
            .finish()
    }
}

impl<E: Element> BlobCodec<E> {
    /// Builds a codec from a run configuration.
    ///
    /// Pure and side-effect free. Fails with `UnsupportedConfig` when the
    /// configuration names a different element type than this instantiation,
    /// or a compression mode with no shipped strategy.
    ///
    /// # Arguments
    /// * `spec` - The run configuration record.
    /// * `use_optimized_path` - Lets encode hand out payloads that borrow
    ///   the source region instead of copying it, when the strategy allows.
    pub fn from_spec(spec: &SyncSpec, use_optimized_path: bool) -> Result<Self> {
        if spec.element != E::KIND {
            return Err(CodecErr::UnsupportedConfig {
                option: "element",
                requested: spec.element.to_string(),
            });
        }

        let encoding: Box<dyn Encoding<E>> = match spec.compression {
            CompressionSpec::None => Box::new(RawEncoding),
            CompressionSpec::Fp16 => {
                return Err(CodecErr::UnsupportedConfig {
                    option: "compression",
                    requested: "fp16".into(),
                });
            }
            CompressionSpec::Threshold { .. } => {
                return Err(CodecErr::UnsupportedConfig {
                    option: "compression",
                    requested: "threshold".into(),
                });
            }
        };

        Ok(Self {
            encoding,
            optimized_path: use_optimized_path,
        })
    }

    /// Reads one part of one buffer region into a fresh wire update.
    ///
    /// The buffer is never mutated. With the optimized transport path the
    /// payload borrows the region's bytes zero-copy; otherwise it is owned.
    /// Either way the bytes are the elements' exact bit patterns under the
    /// raw strategy.
    ///
    /// # Arguments
    /// * `buffer` - The source buffer; only `kind`'s region is read.
    /// * `kind` - Which region this update represents.
    /// * `part` - The addressed sub-range, in flattened element indices.
    pub fn encode<'a, B>(&self, buffer: &'a B, kind: RegionKind, part: Part) -> Result<Update<'a>>
    where
        B: SyncBuffer<Elem = E>,
    {
        part.check_within(buffer.element_count())?;

        let src = &buffer.region(kind)[part.as_range()];
        let borrowed = self
            .optimized_path
            .then(|| self.encoding.encode_borrowed(src))
            .flatten();

        let payload = match borrowed {
            Some(bytes) => Cow::Borrowed(bytes),
            None => Cow::Owned(self.encoding.encode_part(src)),
        };

        Ok(Update {
            kind,
            part,
            element: E::KIND,
            compression: self.encoding.compression(),
            payload,
        })
    }

    /// Merges a received update into one region of `buffer`, computing
    /// `dst[i] = alpha * src[i] + beta * dst[i]` over the addressed range.
    ///
    /// `alpha = 1, beta = 0` overwrites the range bit-for-bit and
    /// `alpha = 0, beta = 1` leaves it untouched; any other pair applies the
    /// weighted accumulate in the element's native precision. Nothing
    /// outside the addressed sub-range is written.
    ///
    /// # Arguments
    /// * `update` - The received update, consumed logically by this call.
    /// * `buffer` - The destination; only `expected_kind`'s region is written.
    /// * `expected_kind` - The region the caller intends to merge into.
    /// * `alpha` - The weight of the decoded values.
    /// * `beta` - The weight of the destination's prior values.
    pub fn decode<B>(
        &self,
        update: &Update<'_>,
        buffer: &mut B,
        expected_kind: RegionKind,
        alpha: E,
        beta: E,
    ) -> Result<()>
    where
        B: SyncBuffer<Elem = E>,
    {
        if update.kind != expected_kind {
            return Err(CodecErr::KindMismatch {
                got: update.kind,
                expected: expected_kind,
            });
        }

        if update.element != E::KIND {
            return Err(CodecErr::ElementMismatch {
                got: update.element,
                expected: E::KIND,
            });
        }

        if update.compression != self.encoding.compression() {
            return Err(CodecErr::CompressionMismatch {
                got: update.compression,
                expected: self.encoding.compression(),
            });
        }

        update.part.check_within(buffer.element_count())?;
        update.check_payload_len()?;

        let dst = &mut buffer.region_mut(expected_kind)[update.part.as_range()];
        self.encoding.decode_part(&update.payload, dst, alpha, beta);

        Ok(())
    }
}

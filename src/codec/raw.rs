//! The raw passthrough strategy: wire bytes are the element bytes.

use crate::{element::Element, msg::Compression};

use super::Encoding;

/// Verbatim float passthrough. Encoding copies bit patterns unchanged, no
/// rounding, no clamping, no reordering; decoding applies the weighted
/// accumulate.
pub(super) struct RawEncoding;

impl<E: Element> Encoding<E> for RawEncoding {
    fn compression(&self) -> Compression {
        Compression::None
    }

    fn encode_part(&self, src: &[E]) -> Vec<u8> {
        bytemuck::cast_slice(src).to_vec()
    }

    fn encode_borrowed<'a>(&self, src: &'a [E]) -> Option<&'a [u8]> {
        Some(bytemuck::cast_slice(src))
    }

    fn decode_part(&self, payload: &[u8], dst: &mut [E], alpha: E, beta: E) {
        // The receive path hands out aligned buffers, but a payload can come
        // from any byte source, so elements are read unaligned.
        let elements = payload
            .chunks_exact(size_of::<E>())
            .map(bytemuck::pod_read_unaligned::<E>);

        if alpha == E::ONE && beta == E::ZERO {
            // Plain overwrite must reproduce bit patterns exactly; the
            // accumulate formula loses -0.0 (-0.0 + 0.0 == +0.0).
            for (d, s) in dst.iter_mut().zip(elements) {
                *d = s;
            }
        } else if alpha == E::ZERO && beta == E::ONE {
            // Explicit no-op: 0.0 * src is NaN for non-finite sources and
            // would also flip the sign of a -0.0 destination.
        } else {
            for (d, s) in dst.iter_mut().zip(elements) {
                *d = E::blend(alpha, s, beta, *d);
            }
        }
    }
}

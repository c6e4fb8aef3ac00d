use std::{num::NonZeroU64, ops::Range};

use crate::error::{CodecErr, Result};

/// A contiguous sub-range of a buffer's flattened element index space.
///
/// Parts are self-describing: each one is encodable and decodable
/// independently of any other, in any transmission order. How a caller
/// splits one logical transfer into parts is a scheduling decision outside
/// the codec; any in-bounds `(start, len)` pair is valid, including the
/// degenerate full-buffer single part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Part {
    pub start: u64,
    pub len: u64,
}

impl Part {
    pub const fn new(start: u64, len: u64) -> Self {
        Self { start, len }
    }

    /// The single part covering a whole buffer of `count` elements.
    pub const fn whole(count: u64) -> Self {
        Self {
            start: 0,
            len: count,
        }
    }

    /// The number of elements this part addresses.
    pub const fn element_count(self) -> u64 {
        self.len
    }

    /// The payload byte length for this part at the given element size.
    ///
    /// Saturates when the declared part could never fit in memory, so a
    /// hostile wire length compares as a mismatch instead of wrapping.
    pub(crate) fn byte_len(self, element_size: usize) -> usize {
        self.len
            .saturating_mul(element_size as u64)
            .try_into()
            .unwrap_or(usize::MAX)
    }

    /// Checks that the part lies within a buffer of `total` elements.
    pub fn check_within(self, total: u64) -> Result<()> {
        match self.start.checked_add(self.len) {
            Some(end) if end <= total => Ok(()),
            _ => Err(CodecErr::OutOfRange {
                start: self.start,
                len: self.len,
                total,
            }),
        }
    }

    /// The addressed index range, for slicing a region view.
    pub(crate) const fn as_range(self) -> Range<usize> {
        self.start as usize..(self.start + self.len) as usize
    }

    /// Splits `total` elements into consecutive parts of at most `max_len`
    /// elements each, a convenience for size-limited transport frames.
    pub fn chunks(total: u64, max_len: NonZeroU64) -> impl Iterator<Item = Part> {
        let max = max_len.get();
        (0..total.div_ceil(max)).map(move |i| {
            let start = i * max;
            Part {
                start,
                len: max.min(total - start),
            }
        })
    }
}

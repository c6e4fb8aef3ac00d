//! The receiving end of the update framing protocol.

use std::io;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::{Align8, Deserialize, LEN_TYPE_SIZE, LenType};

/// Upper bound on a single frame's byte length.
///
/// The length prefix comes from the peer; rejecting oversized values before
/// any allocation keeps a hostile or corrupt prefix from taking down the
/// receiving task. Transfers larger than this are split into parts.
pub const MAX_FRAME_LEN: usize = 1 << 30;

/// The receiving half of a synchronization channel.
pub struct SyncReceiver<R: AsyncRead + Unpin> {
    rx: R,
}

impl<R: AsyncRead + Unpin> SyncReceiver<R> {
    /// Creates a new `SyncReceiver` instance.
    ///
    /// # Arguments
    /// * `rx` - The underlying reader.
    pub(super) fn new(rx: R) -> Self {
        Self { rx }
    }

    /// Waits for the next frame and deserializes it in place.
    ///
    /// # Arguments
    /// * `buf` - The receive buffer; the returned `T`'s lifetime is tied to
    ///           it. The 8-byte-aligned element type keeps a deserialized
    ///           payload view properly aligned for any element kind.
    ///
    /// # Returns
    /// A result object that returns `T` on success or `io::Error` on
    /// failure, including frames whose declared length exceeds
    /// `MAX_FRAME_LEN`.
    pub async fn recv_into<'buf, T, B>(&mut self, buf: &'buf mut Vec<B>) -> io::Result<T>
    where
        T: Deserialize<'buf>,
        B: Align8,
    {
        let mut prefix = [0; LEN_TYPE_SIZE];
        self.rx.read_exact(&mut prefix).await?;
        let len = LenType::from_be_bytes(prefix);

        if len > MAX_FRAME_LEN as LenType {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Received a frame length of {len}, the limit is {MAX_FRAME_LEN} bytes"),
            ));
        }

        let len = len as usize;
        let needed = len.div_ceil(size_of::<B>());
        buf.clear();
        buf.reserve(needed);

        // SAFETY: The buffer has capacity for at least `needed` items and
        //         every byte of the view is overwritten by the read below.
        unsafe { buf.set_len(needed) };

        let view: &mut [u8] = bytemuck::cast_slice_mut(buf);
        let frame = &mut view[..len];
        self.rx.read_exact(frame).await?;

        log::trace!(frame_len = len; "received frame");

        T::deserialize(frame)
    }
}

//! The sending end of the update framing protocol.

use std::io;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::{LEN_TYPE_SIZE, LenType, Serialize};

/// The sending half of a synchronization channel.
pub struct SyncSender<W>
where
    W: AsyncWrite + Unpin,
{
    tx: W,
    buf: Vec<u8>,
}

impl<W: AsyncWrite + Unpin> SyncSender<W> {
    /// Creates a new `SyncSender` instance.
    ///
    /// # Arguments
    /// * `tx` - The underlying writer.
    pub(super) fn new(tx: W) -> Self {
        Self {
            tx,
            buf: Vec::new(),
        }
    }

    /// Sends one frame: the length prefix, the serialized header and then
    /// the borrowed payload, written without copying it.
    ///
    /// # Arguments
    /// * `msg` - A serializable object.
    ///
    /// # Returns
    /// A result object that returns `io::Error` on failure.
    pub async fn send<'a, T: Serialize<'a>>(&mut self, msg: &'a T) -> io::Result<()> {
        let Self { buf, tx } = self;

        buf.clear();
        buf.resize(LEN_TYPE_SIZE, 0);

        let payload = msg.serialize(buf);
        let len = buf.len() - LEN_TYPE_SIZE + payload.map(<[_]>::len).unwrap_or_default();
        let prefix = (len as LenType).to_be_bytes();
        buf[..prefix.len()].copy_from_slice(&prefix);

        log::trace!(frame_len = len; "sending frame");

        tx.write_all(buf).await?;
        if let Some(payload) = payload {
            tx.write_all(payload).await?;
        }

        tx.flush().await
    }
}

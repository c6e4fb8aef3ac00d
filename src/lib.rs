//! Tensor-buffer synchronization codec for distributed training runs.
//!
//! Converts one region of a training buffer (params or grads) into a
//! self-describing wire update, and merges received updates back into local
//! state with a weighted accumulate (`dst = alpha * src + beta * dst`).
//! Includes the length-prefixed async framing used to move updates between
//! cooperating nodes.

mod align;
mod buffer;
mod codec;
mod deserialize;
mod element;
mod error;
pub mod msg;
mod part;
mod receiver;
mod sender;
mod serialize;
pub mod specs;

use tokio::io::{AsyncRead, AsyncWrite};

pub use align::{Align1, Align8};
pub use buffer::{DenseBuffer, RegionKind, SyncBuffer};
pub use codec::BlobCodec;
pub use deserialize::Deserialize;
pub use element::{Element, ElementKind};
pub use error::{CodecErr, Result};
pub use msg::{Compression, Update};
pub use part::Part;
pub use receiver::{MAX_FRAME_LEN, SyncReceiver};
pub use sender::SyncSender;
pub use serialize::Serialize;

type LenType = u64;
const LEN_TYPE_SIZE: usize = size_of::<LenType>();

/// Creates both `SyncReceiver` and `SyncSender` network channel parts.
///
/// Given a writer and reader creates and returns both ends of the
/// communication.
///
/// # Arguments
/// * `rx` - An async readable.
/// * `tx` - An async writable.
///
/// # Returns
/// A communication stream in the form of a sync receiver and sender.
pub fn channel<R, W>(rx: R, tx: W) -> (SyncReceiver<R>, SyncSender<W>)
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    (SyncReceiver::new(rx), SyncSender::new(tx))
}

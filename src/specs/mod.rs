//! Run-configuration records consumed by the codec factory.

mod sync;

pub use sync::{CompressionSpec, SyncSpec};

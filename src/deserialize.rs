use std::io;

/// Zero-copy deserialization borrowing from a receive buffer.
pub trait Deserialize<'a>: Sized {
    fn deserialize(buf: &'a [u8]) -> io::Result<Self>;
}

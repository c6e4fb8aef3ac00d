/// Zero-copy serialization into a framing buffer.
///
/// Implementors append their fixed-size header into `buf` and may return a
/// borrowed tail slice; the sender writes it after the header, so large
/// payloads are never copied into the frame.
pub trait Serialize<'a> {
    fn serialize(&'a self, buf: &mut Vec<u8>) -> Option<&'a [u8]>;
}

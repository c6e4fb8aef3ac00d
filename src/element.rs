use std::fmt;

use serde::{Deserialize, Serialize};

/// The wire tag for the numeric element type of an update's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    F32,
    F64,
}

impl ElementKind {
    /// The size of one element of this kind in bytes.
    pub const fn size(self) -> usize {
        match self {
            ElementKind::F32 => size_of::<f32>(),
            ElementKind::F64 => size_of::<f64>(),
        }
    }

    pub(crate) const fn wire_tag(self) -> u8 {
        match self {
            ElementKind::F32 => 0,
            ElementKind::F64 => 1,
        }
    }

    pub(crate) const fn from_wire_tag(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(ElementKind::F32),
            1 => Some(ElementKind::F64),
            _ => None,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ElementKind::F32 => "f32",
            ElementKind::F64 => "f64",
        })
    }
}

/// The numeric element types the codec can move over the wire.
///
/// Payload bytes are the element's host-native representation; blending runs
/// in the element's native precision, one multiply-add per element.
pub trait Element: bytemuck::Pod + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// The wire tag stamped on updates of this element type.
    const KIND: ElementKind;

    const ZERO: Self;
    const ONE: Self;

    /// One weighted accumulate step: `alpha * src + beta * dst`.
    fn blend(alpha: Self, src: Self, beta: Self, dst: Self) -> Self;
}

impl Element for f32 {
    const KIND: ElementKind = ElementKind::F32;

    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    #[inline]
    fn blend(alpha: Self, src: Self, beta: Self, dst: Self) -> Self {
        alpha * src + beta * dst
    }
}

impl Element for f64 {
    const KIND: ElementKind = ElementKind::F64;

    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    #[inline]
    fn blend(alpha: Self, src: Self, beta: Self, dst: Self) -> Self {
        alpha * src + beta * dst
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::element::Element;

/// Which of the two buffer regions an update represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    /// The primary values, the model parameters.
    Params,
    /// The gradient values accumulated during a training step.
    Grads,
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RegionKind::Params => "params",
            RegionKind::Grads => "grads",
        })
    }
}

/// Borrowed, typed views into the two regions of a training buffer.
///
/// The codec only ever borrows one region at a time, read-only for encode
/// and mutable for decode. Implementors own allocation, shape bookkeeping
/// and placement; both regions must have `element_count` elements.
pub trait SyncBuffer {
    type Elem: Element;

    /// The number of elements in either region.
    fn element_count(&self) -> u64;

    /// A read view of the selected region.
    fn region(&self, kind: RegionKind) -> &[Self::Elem];

    /// A write view of the selected region.
    fn region_mut(&mut self, kind: RegionKind) -> &mut [Self::Elem];
}

/// An owned host-memory buffer with parallel params and grads regions.
///
/// The element count is the product of the shape extents; both regions are
/// flat, contiguous and row-major.
#[derive(Debug, Clone)]
pub struct DenseBuffer<E> {
    shape: Vec<usize>,
    params: Vec<E>,
    grads: Vec<E>,
}

impl<E: Element> DenseBuffer<E> {
    /// Allocates a zero-filled buffer for the given shape.
    ///
    /// # Panics
    /// Panics if the shape is empty or any extent is zero.
    pub fn new(shape: &[usize]) -> Self {
        assert!(!shape.is_empty(), "shape must have at least one extent");
        assert!(
            shape.iter().all(|&extent| extent > 0),
            "shape extents must be positive"
        );

        let count = shape.iter().product();
        Self {
            shape: shape.to_vec(),
            params: vec![E::ZERO; count],
            grads: vec![E::ZERO; count],
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn params(&self) -> &[E] {
        &self.params
    }

    pub fn grads(&self) -> &[E] {
        &self.grads
    }

    /// Overwrites the params region.
    ///
    /// # Panics
    /// Panics if `values` does not have exactly `element_count` elements.
    pub fn set_params(&mut self, values: &[E]) {
        self.params.copy_from_slice(values);
    }

    /// Overwrites the grads region.
    ///
    /// # Panics
    /// Panics if `values` does not have exactly `element_count` elements.
    pub fn set_grads(&mut self, values: &[E]) {
        self.grads.copy_from_slice(values);
    }
}

impl<E: Element> SyncBuffer for DenseBuffer<E> {
    type Elem = E;

    fn element_count(&self) -> u64 {
        self.params.len() as u64
    }

    fn region(&self, kind: RegionKind) -> &[E] {
        match kind {
            RegionKind::Params => &self.params,
            RegionKind::Grads => &self.grads,
        }
    }

    fn region_mut(&mut self, kind: RegionKind) -> &mut [E] {
        match kind {
            RegionKind::Params => &mut self.params,
            RegionKind::Grads => &mut self.grads,
        }
    }
}

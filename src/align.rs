// Trait to generalize over primitive number types that are 1 byte aligned.
pub trait Align1: bytemuck::Pod {}

impl Align1 for u8 {}
impl Align1 for i8 {}
impl Align1 for u16 {}
impl Align1 for i16 {}
impl Align1 for u32 {}
impl Align1 for i32 {}
impl Align1 for u64 {}
impl Align1 for i64 {}
impl Align1 for u128 {}
impl Align1 for i128 {}
impl Align1 for f32 {}
impl Align1 for f64 {}

// Trait to generalize over primitive number types that are at least 8 bytes
// aligned. Receive buffers of these keep any element payload aligned for
// in-place reinterpretation, f64 included.
pub trait Align8: Align1 {}

impl Align8 for u64 {}
impl Align8 for i64 {}
impl Align8 for u128 {}
impl Align8 for i128 {}
impl Align8 for f64 {}

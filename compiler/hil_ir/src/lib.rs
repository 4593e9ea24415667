//! HIL IR - shared source location types.
//!
//! Every component of the HIL tooling reports positions as byte offsets into
//! the literal text it was handed. This crate holds the [`Span`] type those
//! offsets travel in, so the standalone scanner and the decoding layer agree
//! on one representation.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod span;

pub use span::{Span, SpanError};

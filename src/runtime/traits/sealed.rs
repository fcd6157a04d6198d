// ABOUTME: Sealed trait pattern for engine traits.
// ABOUTME: Only types inside this crate may implement the capability traits.

/// Implemented by the bollard runtime and by in-crate test doubles.
pub trait Sealed {}

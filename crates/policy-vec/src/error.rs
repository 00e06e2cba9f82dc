//! Recoverable errors.
//!
//! Only allocation can fail in a way the caller is expected to handle.
//! Contract violations (out-of-range index, popping an empty vector,
//! releasing a dead shared object) are not represented here.

use std::alloc::Layout;
use thiserror::Error;

/// A buffer could not be obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AllocError {
    /// The requested slot count overflows the addressable size.
    #[error("capacity overflow")]
    CapacityOverflow,

    /// The allocator refused a buffer of `capacity` slots.
    #[error("out of memory allocating {capacity} slots")]
    OutOfMemory { capacity: usize },
}

impl AllocError {
    /// Classify a failed reservation of `capacity` slots of `T`.
    pub(crate) fn for_slots<T>(capacity: usize) -> Self {
        if Layout::array::<T>(capacity).is_err() {
            AllocError::CapacityOverflow
        } else {
            AllocError::OutOfMemory { capacity }
        }
    }
}

//! Intrusive reference counting.
//!
//! `RefCounted` is the capability a type exposes to be co-owned through
//! [`SharedPtr`](crate::SharedPtr). Instead of inheriting from a base
//! object, a type embeds a [`RefCount`] and hands it out:
//!
//! ```
//! use policy_vec::{RefCount, RefCounted, SharedPtr};
//!
//! struct Texture {
//!     refs: RefCount,
//!     id: u32,
//! }
//!
//! // SAFETY: `ref_counter` always returns the embedded counter.
//! unsafe impl RefCounted for Texture {
//!     fn ref_counter(&self) -> &RefCount {
//!         &self.refs
//!     }
//! }
//!
//! let tex = Texture { refs: RefCount::new(), id: 7 };
//! assert_eq!(tex.ref_count(), 0);
//!
//! let shared = SharedPtr::new(tex);
//! assert_eq!(shared.ref_count(), 1);
//! # assert_eq!(shared.id, 7);
//! ```
//!
//! The count can only be moved by `SharedPtr` itself: cloning a handle
//! increments it, dropping one decrements it.

use std::cell::Cell;

/// An embeddable reference count, starting at zero.
///
/// Zero means "not owned by anyone yet". Wrapping the object in a
/// [`SharedPtr`](crate::SharedPtr) takes the first reference.
#[derive(Default)]
pub struct RefCount {
    count: Cell<u32>,
}

impl RefCount {
    #[inline]
    pub const fn new() -> Self {
        Self {
            count: Cell::new(0),
        }
    }

    #[inline]
    pub fn get(&self) -> u32 {
        self.count.get()
    }

    /// Increment, returning the new count.
    ///
    /// Aborts on overflow, like `Rc`: a wrapped count would free the
    /// object while it is still referenced.
    #[inline]
    pub(crate) fn increment(&self) -> u32 {
        let Some(next) = self.count.get().checked_add(1) else {
            std::process::abort();
        };
        self.count.set(next);
        next
    }

    /// Decrement, returning the new count.
    #[inline]
    pub(crate) fn decrement(&self) -> u32 {
        let val = self.count.get();
        debug_assert!(val > 0, "Decrementing zero reference count");
        let next = val.saturating_sub(1);
        self.count.set(next);
        next
    }
}

impl std::fmt::Debug for RefCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RefCount({})", self.get())
    }
}

/// Capability of being intrusively reference counted.
///
/// Only `ref_counter` has to be provided. Incrementing, decrementing and
/// destroying the object at zero are the job of the owning handle
/// ([`SharedPtr`](crate::SharedPtr)), since only it knows how the object
/// was allocated.
///
/// # Safety
///
/// `ref_counter` must return the same [`RefCount`], embedded in `self`,
/// on every call. `SharedPtr` frees the object when that counter drops to
/// zero, so handing out different counters would free it while handles
/// still point at it.
pub unsafe trait RefCounted {
    fn ref_counter(&self) -> &RefCount;

    #[inline]
    fn ref_count(&self) -> u32 {
        self.ref_counter().get()
    }
}

//! # Policy-Vec
//!
//! A growable vector whose element ownership is chosen by a lifetime policy,
//! plus the intrusive reference counting the shared policy relies on.
//!
//! ## Features
//!
//! - **One buffer, three behaviours**: `Plain` values, `Owning` boxes,
//!   `Shared` reference-counted pointers, all through the same `Vector`
//! - **Hooks resolved at compile time**: policies are zero-sized marker types
//! - **Move-only owning vectors**: `Owning` has no copy hook, so cloning an
//!   owning vector does not compile
//! - **Intrusive counts by composition**: embed a `RefCount`, implement
//!   `RefCounted`, no base type required
//! - **Counted handles**: `SharedPtr` retains on clone and releases on drop,
//!   so shared slots can be pushed, popped and overwritten without `unsafe`
//! - **Reported allocation failure**: `push` and `grow` return `AllocError`
//!   and leave the vector untouched
//!
//! ## Quick Start
//!
//! ```rust
//! use policy_vec::{RefCount, RefCounted, SharedPtr, SharedVector};
//!
//! struct Sprite {
//!     refs: RefCount,
//! }
//!
//! // SAFETY: `ref_counter` always returns the embedded counter.
//! unsafe impl RefCounted for Sprite {
//!     fn ref_counter(&self) -> &RefCount {
//!         &self.refs
//!     }
//! }
//!
//! let sprite = SharedPtr::new(Sprite { refs: RefCount::new() });
//! let mut sprites: SharedVector<Sprite> = SharedVector::new();
//! sprites.push(Some(sprite.clone())).unwrap();
//! assert_eq!(sprite.ref_count(), 2);
//!
//! drop(sprite);
//! sprites.pop(); // last reference: sprite is destroyed
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]

mod error;
mod pointer;
mod policy;
mod refcount;
mod shared;
mod vector;

pub use error::AllocError;
pub use pointer::IsPointer;
pub use policy::{CopyPolicy, LifetimePolicy, Owning, Plain, Shared};
pub use refcount::{RefCount, RefCounted};
pub use shared::SharedPtr;
pub use vector::Vector;

/// Vector that exclusively owns boxed pointees.
pub type AutoVector<U> = Vector<Option<Box<U>>, Owning>;

/// Vector that co-owns intrusively counted pointees.
pub type SharedVector<U> = Vector<Option<SharedPtr<U>>, Shared>;

//! Element lifetime policies.
//!
//! A policy decides what happens to elements when a [`Vector`](crate::Vector)
//! fills fresh slots, is copied, is destroyed, and when elements are pushed
//! or popped. Policies are zero-sized marker types picked through the
//! vector's second type parameter, so every hook is resolved at compile
//! time.
//!
//! | Policy | Slot type | Push | Pop / destroy | Copy |
//! |---|---|---|---|---|
//! | [`Plain`] | any `T: Default` | - | - | plain clone |
//! | [`Owning`] | `Option<Box<U>>` | - | drop pointee | not allowed |
//! | [`Shared`] | `Option<SharedPtr<U>>` | handle moves in | release | retain each |
//!
//! Hooks never see elements that are merely relocated by growth.

use crate::refcount::RefCounted;
use crate::shared::SharedPtr;

/// Hooks a vector runs over its slots.
pub trait LifetimePolicy<T> {
    /// Value stored in every freshly allocated slot.
    fn init_slot() -> T;

    /// Called over the live region before the buffer is released.
    fn destroy(live: &mut [T]);

    /// Called on the element just stored at the end.
    fn on_push(item: &T);

    /// Called on the last element right before it leaves the live region.
    fn on_pop(item: &mut T);
}

/// Policies under which a vector can be duplicated.
///
/// Not implemented by [`Owning`]: two vectors both deleting the same
/// pointees would free them twice.
pub trait CopyPolicy<T>: LifetimePolicy<T> {
    /// Called over the live region of a freshly copied buffer.
    fn copy(live: &[T]);
}

/// No hooks. The caller keeps full ownership of whatever the elements
/// point to.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plain;

impl<T: Default> LifetimePolicy<T> for Plain {
    #[inline]
    fn init_slot() -> T {
        T::default()
    }

    #[inline]
    fn destroy(_live: &mut [T]) {}

    #[inline]
    fn on_push(_item: &T) {}

    #[inline]
    fn on_pop(_item: &mut T) {}
}

impl<T: Default> CopyPolicy<T> for Plain {
    #[inline]
    fn copy(_live: &[T]) {}
}

/// The vector exclusively owns its pointees and drops each one exactly
/// once, when it is popped or when the vector is destroyed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Owning;

impl<U> LifetimePolicy<Option<Box<U>>> for Owning {
    #[inline]
    fn init_slot() -> Option<Box<U>> {
        None
    }

    fn destroy(live: &mut [Option<Box<U>>]) {
        for slot in live {
            drop(slot.take());
        }
    }

    #[inline]
    fn on_push(_item: &Option<Box<U>>) {}

    #[inline]
    fn on_pop(item: &mut Option<Box<U>>) {
        drop(item.take());
    }
}

/// The vector co-owns its pointees through their intrusive count.
///
/// Every slot holding a [`SharedPtr`] holds one counted reference. Pushing
/// moves the caller's handle, and its reference, into the slot; cloning the
/// buffer retains each pointee again, so copies of the vector are
/// independent owners. Overwriting a slot through `IndexMut` releases the
/// handle it replaces.
#[derive(Debug, Clone, Copy, Default)]
pub struct Shared;

impl<U: RefCounted> LifetimePolicy<Option<SharedPtr<U>>> for Shared {
    #[inline]
    fn init_slot() -> Option<SharedPtr<U>> {
        None
    }

    fn destroy(live: &mut [Option<SharedPtr<U>>]) {
        for slot in live {
            if let Some(p) = slot.take() {
                p.release();
            }
        }
    }

    // The pushed handle already carries its reference.
    #[inline]
    fn on_push(_item: &Option<SharedPtr<U>>) {}

    #[inline]
    fn on_pop(item: &mut Option<SharedPtr<U>>) {
        if let Some(p) = item.take() {
            p.release();
        }
    }
}

impl<U: RefCounted> CopyPolicy<Option<SharedPtr<U>>> for Shared {
    // Cloning each slot already retained its pointee.
    #[inline]
    fn copy(_live: &[Option<SharedPtr<U>>]) {}
}

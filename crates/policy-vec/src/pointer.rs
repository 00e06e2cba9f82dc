//! Compile-time pointer classification.
//!
//! `IsPointer` answers, per element type, whether the type is a pointer.
//! A vector exposes the answer through
//! [`Vector::holds_pointers`](crate::Vector::holds_pointers); no policy
//! changes behaviour on it.
//!
//! # Example
//!
//! ```
//! use policy_vec::IsPointer;
//!
//! struct Particle {
//!     mass: f32,
//! }
//!
//! impl IsPointer for Particle {}
//!
//! assert!(!Particle::IS_POINTER);
//! assert!(<Box<Particle>>::IS_POINTER);
//! assert!(<Option<&Particle>>::IS_POINTER);
//! # let _ = Particle { mass: 1.0 }.mass;
//! ```

use crate::refcount::RefCounted;
use crate::shared::SharedPtr;
use std::ptr::NonNull;
use std::rc::Rc;

/// Whether a type is a pointer. Defaults to `false`.
pub trait IsPointer {
    const IS_POINTER: bool = false;
}

// Value types
impl IsPointer for i8 {}
impl IsPointer for i16 {}
impl IsPointer for i32 {}
impl IsPointer for i64 {}
impl IsPointer for i128 {}
impl IsPointer for isize {}
impl IsPointer for u8 {}
impl IsPointer for u16 {}
impl IsPointer for u32 {}
impl IsPointer for u64 {}
impl IsPointer for u128 {}
impl IsPointer for usize {}
impl IsPointer for f32 {}
impl IsPointer for f64 {}
impl IsPointer for bool {}
impl IsPointer for char {}
impl IsPointer for () {}
impl IsPointer for String {}

impl<A> IsPointer for (A,) {}
impl<A, B> IsPointer for (A, B) {}
impl<A, B, C> IsPointer for (A, B, C) {}
impl<A, B, C, D> IsPointer for (A, B, C, D) {}

impl<T, const N: usize> IsPointer for [T; N] {}

// Pointer types
impl<T: ?Sized> IsPointer for &T {
    const IS_POINTER: bool = true;
}

impl<T: ?Sized> IsPointer for &mut T {
    const IS_POINTER: bool = true;
}

impl<T: ?Sized> IsPointer for *const T {
    const IS_POINTER: bool = true;
}

impl<T: ?Sized> IsPointer for *mut T {
    const IS_POINTER: bool = true;
}

impl<T: ?Sized> IsPointer for NonNull<T> {
    const IS_POINTER: bool = true;
}

impl<T: ?Sized> IsPointer for Box<T> {
    const IS_POINTER: bool = true;
}

impl<T: ?Sized> IsPointer for Rc<T> {
    const IS_POINTER: bool = true;
}

impl<T: RefCounted> IsPointer for SharedPtr<T> {
    const IS_POINTER: bool = true;
}

// A nullable pointer is still a pointer
impl<T: IsPointer> IsPointer for Option<T> {
    const IS_POINTER: bool = T::IS_POINTER;
}

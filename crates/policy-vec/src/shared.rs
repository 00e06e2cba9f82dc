//! Counted handle to a heap-allocated, intrusively counted object.

use crate::refcount::RefCounted;
use log::trace;
use std::marker::PhantomData;
use std::mem::ManuallyDrop;
use std::ops::Deref;
use std::ptr::NonNull;

/// An owning pointer to a [`RefCounted`] object living on the heap.
///
/// Every `SharedPtr` holds exactly one reference: [`new`](Self::new) takes
/// the first one, `clone` takes another, and dropping a handle (or
/// [`release`](Self::release)) gives one back. The transition from 1 to 0
/// drops the object and frees its storage. Because a handle keeps its
/// pointee alive, it can be dereferenced without `unsafe`.
///
/// The count lives inside the object, so a [`SharedVector`](crate::SharedVector)
/// slot co-owns its pointee simply by holding a handle.
///
/// # Example
///
/// ```
/// use policy_vec::{RefCount, RefCounted, SharedPtr};
///
/// struct Mesh {
///     refs: RefCount,
/// }
///
/// // SAFETY: `ref_counter` always returns the embedded counter.
/// unsafe impl RefCounted for Mesh {
///     fn ref_counter(&self) -> &RefCount {
///         &self.refs
///     }
/// }
///
/// let mesh = SharedPtr::new(Mesh { refs: RefCount::new() });
/// assert_eq!(mesh.ref_count(), 1);
///
/// let other = mesh.clone();
/// assert_eq!(mesh.ref_count(), 2);
/// assert_eq!(other.release(), 1);
/// drop(mesh); // destroyed here
/// ```
pub struct SharedPtr<T: RefCounted> {
    ptr: NonNull<T>,
    _owns: PhantomData<T>,
}

impl<T: RefCounted> SharedPtr<T> {
    /// Move `value` to the heap and take the first reference to it.
    pub fn new(value: T) -> Self {
        let ptr = NonNull::from(Box::leak(Box::new(value)));
        // SAFETY: just allocated, nobody else can see it.
        unsafe { ptr.as_ref() }.ref_counter().increment();
        Self {
            ptr,
            _owns: PhantomData,
        }
    }

    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Whether both handles point at the same object.
    #[inline]
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        this.ptr == other.ptr
    }

    /// Current count, including this handle.
    #[inline]
    pub fn ref_count(&self) -> u32 {
        (**self).ref_count()
    }

    /// Give back this handle's reference, returning the remaining count.
    ///
    /// Equivalent to dropping the handle; 0 means the object was just
    /// destroyed.
    pub fn release(self) -> u32 {
        let this = ManuallyDrop::new(self);
        // SAFETY: `this` owned one reference and is never used again.
        unsafe { Self::release_raw(this.ptr) }
    }

    /// Store a copy of `src` into `dest`.
    ///
    /// `src` is retained before the previous occupant of `dest` is
    /// released, so assigning a pointer over itself never passes through
    /// zero. The old occupant is destroyed if that was its last reference.
    pub fn assign(src: Option<&Self>, dest: &mut Option<Self>) {
        *dest = src.cloned();
    }

    /// Turn the handle into a raw pointer without giving back its
    /// reference.
    pub fn into_raw(self) -> NonNull<T> {
        ManuallyDrop::new(self).ptr
    }

    /// Adopt a reference previously leaked by [`into_raw`](Self::into_raw).
    ///
    /// # Safety
    ///
    /// `ptr` must come from `into_raw`, and the reference it carried must
    /// not have been adopted already.
    pub unsafe fn from_raw(ptr: NonNull<T>) -> Self {
        Self {
            ptr,
            _owns: PhantomData,
        }
    }

    /// # Safety
    ///
    /// The caller must own one counted reference to `ptr` and give it up.
    unsafe fn release_raw(ptr: NonNull<T>) -> u32 {
        let remaining = ptr.as_ref().ref_counter().decrement();
        if remaining == 0 {
            trace!("destroying shared object at {:p}", ptr);
            drop(Box::from_raw(ptr.as_ptr()));
        }
        remaining
    }
}

impl<T: RefCounted> Clone for SharedPtr<T> {
    /// Take another reference to the same object.
    #[inline]
    fn clone(&self) -> Self {
        self.ref_counter().increment();
        Self {
            ptr: self.ptr,
            _owns: PhantomData,
        }
    }
}

impl<T: RefCounted> Drop for SharedPtr<T> {
    fn drop(&mut self) {
        // SAFETY: every handle owns one reference, given up exactly once here.
        unsafe {
            Self::release_raw(self.ptr);
        }
    }
}

impl<T: RefCounted> Deref for SharedPtr<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        // SAFETY: the reference this handle holds keeps the object alive.
        unsafe { self.ptr.as_ref() }
    }
}

// Identity comparison, not value comparison
impl<T: RefCounted> PartialEq for SharedPtr<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other)
    }
}

impl<T: RefCounted> Eq for SharedPtr<T> {}

impl<T: RefCounted> std::hash::Hash for SharedPtr<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.ptr.hash(state);
    }
}

impl<T: RefCounted> std::fmt::Debug for SharedPtr<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedPtr")
            .field("ptr", &self.ptr)
            .field("refs", &self.ref_count())
            .finish()
    }
}

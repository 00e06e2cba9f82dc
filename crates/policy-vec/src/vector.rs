//! Growable vector generic over a lifetime policy.

use crate::error::AllocError;
use crate::pointer::IsPointer;
use crate::policy::{CopyPolicy, LifetimePolicy, Plain};
use log::{debug, trace};
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// A growable array whose element ownership is decided by `P`.
///
/// Every slot of the buffer is always initialized: slots past the live
/// region hold `P::init_slot()` (or whatever was last written there), so
/// indexing anywhere below [`capacity`](Self::capacity) is valid. Only the
/// first [`len`](Self::len) slots are live, and only they are seen by the
/// policy's destroy hook.
///
/// # Type Parameters
///
/// - `T`: The slot type
/// - `P`: The lifetime policy ([`Plain`], [`Owning`](crate::Owning) or
///   [`Shared`](crate::Shared))
///
/// # Example
///
/// ```
/// use policy_vec::Vector;
///
/// let mut v: Vector<i32> = Vector::new();
/// for i in 0..20 {
///     v.push(i).unwrap();
/// }
/// assert_eq!(v.len(), 20);
/// assert!(v.capacity() >= 20);
/// assert_eq!(v[19], 19);
/// ```
pub struct Vector<T, P: LifetimePolicy<T> = Plain> {
    slots: Box<[T]>,
    len: usize,
    _policy: PhantomData<P>,
}

impl<T, P: LifetimePolicy<T>> Vector<T, P> {
    /// Minimum number of slots allocated at construction.
    pub const DEFAULT_CAPACITY: usize = 16;

    /// Largest number of slots a single growth step adds.
    pub const GROWTH_STEP: usize = 16;

    /// Create an empty vector with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create an empty vector with room for at least `capacity` elements.
    ///
    /// Requests above the floor get the floor added as slack. Aborts on
    /// allocation failure, like `Vec::with_capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = Self::floored(capacity);
        Self {
            slots: (0..capacity).map(|_| P::init_slot()).collect(),
            len: 0,
            _policy: PhantomData,
        }
    }

    /// Fallible [`with_capacity`](Self::with_capacity).
    pub fn try_with_capacity(capacity: usize) -> Result<Self, AllocError> {
        let capacity = Self::floored(capacity);
        let mut slots = reserve_slots::<T>(capacity)?;
        slots.resize_with(capacity, P::init_slot);
        Ok(Self {
            slots: slots.into_boxed_slice(),
            len: 0,
            _policy: PhantomData,
        })
    }

    fn floored(requested: usize) -> usize {
        if requested > Self::DEFAULT_CAPACITY {
            requested.saturating_add(Self::DEFAULT_CAPACITY)
        } else {
            Self::DEFAULT_CAPACITY
        }
    }

    /// Returns the number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if there are no live elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of allocated slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// The live region.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.slots[..self.len]
    }

    /// The live region, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.slots[..self.len]
    }

    /// The whole buffer, including slots past the live region.
    #[inline]
    pub fn slots(&self) -> &[T] {
        &self.slots
    }

    /// Get a live element, or `None` past the live region.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// Mutable [`get`](Self::get).
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(index)
    }

    /// Append `item`, growing the buffer when it is full.
    ///
    /// On allocation failure the vector is left untouched and `item` is
    /// dropped without any policy hook running on it.
    pub fn push(&mut self, item: T) -> Result<(), AllocError> {
        if self.len == self.capacity() {
            self.grow(Self::GROWTH_STEP)?;
        }
        let index = self.len;
        self.slots[index] = item;
        self.len += 1;
        P::on_push(&self.slots[index]);
        Ok(())
    }

    /// Remove the last element through the policy's pop hook.
    ///
    /// # Panics
    ///
    /// Panics if the vector is empty.
    pub fn pop(&mut self) {
        assert!(self.len > 0, "pop on an empty vector");
        let last = self.len - 1;
        P::on_pop(&mut self.slots[last]);
        self.len = last;
    }

    /// Reallocate with `min(by, GROWTH_STEP)` more slots.
    ///
    /// Live elements are moved to the new buffer in order; no hook runs on
    /// them. Stale slots past the live region are not carried over. On
    /// failure nothing changes, including when `P::init_slot` panics.
    pub fn grow(&mut self, by: usize) -> Result<(), AllocError> {
        let old_capacity = self.capacity();
        let new_capacity = old_capacity
            .checked_add(by.min(Self::GROWTH_STEP))
            .ok_or(AllocError::CapacityOverflow)?;
        let mut fresh = reserve_slots::<T>(new_capacity)?;
        fresh.resize_with(new_capacity - self.len, P::init_slot);

        // Nothing below can unwind until the new buffer is installed.
        let mut old = std::mem::take(&mut self.slots).into_vec();
        fresh.extend(old.drain(..self.len));
        fresh.rotate_right(self.len);
        self.slots = fresh.into_boxed_slice();
        drop(old);

        trace!(
            "grew vector from {} to {} slots ({} live)",
            old_capacity,
            new_capacity,
            self.len
        );
        Ok(())
    }

    /// Run the destroy hook over the live region and release the buffer.
    ///
    /// Leaves the vector with no capacity; the next push allocates again.
    pub fn clear(&mut self) {
        P::destroy(&mut self.slots[..self.len]);
        self.len = 0;
        self.slots = Box::default();
    }

    /// Hand the whole buffer to the caller without running the destroy
    /// hook. Whatever the policy owned is now owned by the returned slots.
    pub fn detach(mut self) -> Box<[T]> {
        self.len = 0;
        std::mem::take(&mut self.slots)
    }
}

impl<T: IsPointer, P: LifetimePolicy<T>> Vector<T, P> {
    /// Whether the slot type is a pointer. Informational only.
    #[inline]
    pub const fn holds_pointers(&self) -> bool {
        T::IS_POINTER
    }
}

impl<T: Clone, P: CopyPolicy<T>> Vector<T, P> {
    /// Fallible clone: copies every slot, then runs the copy hook over the
    /// live region.
    pub fn try_clone(&self) -> Result<Self, AllocError> {
        let mut slots = reserve_slots::<T>(self.capacity())?;
        slots.extend_from_slice(&self.slots);
        let slots = slots.into_boxed_slice();
        P::copy(&slots[..self.len]);
        Ok(Self {
            slots,
            len: self.len,
            _policy: PhantomData,
        })
    }

    /// Replace the contents with a copy of `other`.
    ///
    /// The copy is made before the current contents are destroyed, so on
    /// failure `self` is unchanged.
    pub fn assign_from(&mut self, other: &Self) -> Result<(), AllocError> {
        *self = other.try_clone()?;
        Ok(())
    }
}

impl<T: Clone, P: CopyPolicy<T>> Clone for Vector<T, P> {
    fn clone(&self) -> Self {
        let slots = self.slots.clone();
        P::copy(&slots[..self.len]);
        Self {
            slots,
            len: self.len,
            _policy: PhantomData,
        }
    }
}

impl<T, P: LifetimePolicy<T>> Drop for Vector<T, P> {
    fn drop(&mut self) {
        P::destroy(&mut self.slots[..self.len]);
    }
}

impl<T, P: LifetimePolicy<T>> Default for Vector<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P: LifetimePolicy<T>> Index<usize> for Vector<T, P> {
    type Output = T;

    /// Any slot below the capacity, live or not.
    #[inline]
    fn index(&self, index: usize) -> &T {
        &self.slots[index]
    }
}

impl<T, P: LifetimePolicy<T>> IndexMut<usize> for Vector<T, P> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.slots[index]
    }
}

impl<T: std::fmt::Debug, P: LifetimePolicy<T>> std::fmt::Debug for Vector<T, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vector")
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("live", &self.as_slice())
            .finish()
    }
}

/// An empty `Vec` with room for exactly `capacity` slots.
fn reserve_slots<T>(capacity: usize) -> Result<Vec<T>, AllocError> {
    let mut slots = Vec::new();
    if slots.try_reserve_exact(capacity).is_err() {
        let err = AllocError::for_slots::<T>(capacity);
        debug!("slot allocation failed: {}", err);
        return Err(err);
    }
    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Owning;

    #[test]
    fn test_default_capacity() {
        let v: Vector<i32> = Vector::new();
        assert_eq!(v.len(), 0);
        assert!(v.is_empty());
        assert_eq!(v.capacity(), 16);
    }

    #[test]
    fn test_requested_capacity_is_floored() {
        let small: Vector<u8> = Vector::with_capacity(3);
        assert_eq!(small.capacity(), 16);

        let exact: Vector<u8> = Vector::with_capacity(16);
        assert_eq!(exact.capacity(), 16);

        // Above the floor, the floor is added as slack
        let large: Vector<u8> = Vector::with_capacity(40);
        assert_eq!(large.capacity(), 56);
    }

    #[test]
    fn test_try_with_capacity_overflow() {
        let result: Result<Vector<u64>, _> = Vector::try_with_capacity(usize::MAX);
        assert_eq!(result.err(), Some(AllocError::CapacityOverflow));
    }

    #[test]
    fn test_fresh_slots_hold_init_value() {
        let v: Vector<Option<Box<i32>>, Owning> = Vector::new();
        assert!(v.slots().iter().all(Option::is_none));

        let v: Vector<i32> = Vector::with_capacity(20);
        assert!(v.slots().iter().all(|&x| x == 0));
    }

    #[test]
    fn test_push_twenty() {
        let mut v: Vector<i32> = Vector::new();
        for i in 0..20 {
            v.push(i).unwrap();
        }
        assert_eq!(v.len(), 20);
        assert!(v.capacity() >= 20);
        for i in 0..20 {
            assert_eq!(v[i], i as i32);
        }
    }

    #[test]
    fn test_growth_is_step_bounded() {
        let mut v: Vector<u32> = Vector::new();
        v.grow(1000).unwrap();
        assert_eq!(v.capacity(), 32);
        v.grow(4).unwrap();
        assert_eq!(v.capacity(), 36);
    }

    #[test]
    fn test_grow_preserves_live_prefix() {
        let mut v: Vector<String> = Vector::new();
        v.push("a".to_string()).unwrap();
        v.push("b".to_string()).unwrap();
        // Stale slot past the live region is not carried over
        v[5] = "stale".to_string();

        v.grow(16).unwrap();
        assert_eq!(v.as_slice(), &["a".to_string(), "b".to_string()]);
        assert_eq!(v[5], "");
    }

    #[test]
    fn test_grow_survives_panicking_init() {
        use std::cell::Cell;
        use std::panic::{catch_unwind, AssertUnwindSafe};

        thread_local! {
            static FAIL_DEFAULT: Cell<bool> = const { Cell::new(false) };
        }

        #[derive(Debug, Clone, PartialEq)]
        struct Fragile(u32);

        impl Default for Fragile {
            fn default() -> Self {
                assert!(!FAIL_DEFAULT.with(Cell::get), "default construction failed");
                Fragile(0)
            }
        }

        let mut v: Vector<Fragile> = Vector::new();
        for i in 0..16 {
            v.push(Fragile(i)).unwrap();
        }

        FAIL_DEFAULT.with(|f| f.set(true));
        let result = catch_unwind(AssertUnwindSafe(|| v.grow(16)));
        FAIL_DEFAULT.with(|f| f.set(false));

        assert!(result.is_err());
        assert_eq!(v.len(), 16);
        assert_eq!(v.capacity(), 16);
        assert_eq!(v[15], Fragile(15));

        // Still usable afterwards
        v.push(Fragile(16)).unwrap();
        assert_eq!(v.capacity(), 32);
        assert_eq!(v.as_slice().last(), Some(&Fragile(16)));
    }

    #[test]
    fn test_get_is_bounded_by_len() {
        let mut v: Vector<i32> = Vector::new();
        v.push(7).unwrap();
        assert_eq!(v.get(0), Some(&7));
        assert_eq!(v.get(1), None);
        // Indexing only checks the capacity
        assert_eq!(v[1], 0);
    }

    #[test]
    fn test_mutable_access_is_bounded_by_len() {
        let mut v: Vector<i32> = Vector::new();
        v.push(1).unwrap();
        v.push(2).unwrap();

        *v.get_mut(0).unwrap() = 10;
        assert!(v.get_mut(2).is_none());
        v.as_mut_slice().reverse();
        assert_eq!(v.as_slice(), &[2, 10]);
    }

    #[test]
    #[should_panic]
    fn test_index_past_capacity_panics() {
        let v: Vector<i32> = Vector::new();
        let _ = v[16];
    }

    #[test]
    #[should_panic(expected = "pop on an empty vector")]
    fn test_pop_empty_panics() {
        let mut v: Vector<i32> = Vector::new();
        v.pop();
    }

    #[test]
    fn test_pop_keeps_slot_value_for_plain() {
        let mut v: Vector<i32> = Vector::new();
        v.push(1).unwrap();
        v.push(2).unwrap();
        v.pop();
        assert_eq!(v.len(), 1);
        assert_eq!(v.as_slice(), &[1]);
        assert_eq!(v[1], 2);
    }

    #[test]
    fn test_clear_releases_buffer() {
        let mut v: Vector<i32> = Vector::new();
        v.push(1).unwrap();
        v.clear();
        assert_eq!(v.len(), 0);
        assert_eq!(v.capacity(), 0);

        // Usable again after clearing
        v.push(9).unwrap();
        assert_eq!(v.capacity(), 16);
        assert_eq!(v[0], 9);
    }

    #[test]
    fn test_clone_copies_all_slots() {
        let mut v: Vector<i32> = Vector::new();
        v.push(1).unwrap();
        v[10] = 42;

        let copy = v.clone();
        assert_eq!(copy.len(), 1);
        assert_eq!(copy.capacity(), v.capacity());
        assert_eq!(copy[10], 42);
    }

    #[test]
    fn test_assign_from_replaces_contents() {
        let mut source: Vector<i32> = Vector::with_capacity(30);
        source.push(5).unwrap();

        let mut target: Vector<i32> = Vector::new();
        target.push(1).unwrap();
        target.push(2).unwrap();

        target.assign_from(&source).unwrap();
        assert_eq!(target.as_slice(), &[5]);
        assert_eq!(target.capacity(), 46);
    }

    #[test]
    fn test_detach_returns_buffer() {
        let mut v: Vector<i32> = Vector::new();
        v.push(3).unwrap();
        let slots = v.detach();
        assert_eq!(slots.len(), 16);
        assert_eq!(slots[0], 3);
    }

    #[test]
    fn test_holds_pointers() {
        let values: Vector<i32> = Vector::new();
        assert!(!values.holds_pointers());

        let boxes: Vector<Option<Box<i32>>, Owning> = Vector::new();
        assert!(boxes.holds_pointers());
    }

    #[test]
    fn test_debug_shows_live_region() {
        let mut v: Vector<i32> = Vector::new();
        v.push(4).unwrap();
        let s = format!("{:?}", v);
        assert!(s.contains("len: 1"));
        assert!(s.contains("capacity: 16"));
        assert!(s.contains("[4]"));
    }
}

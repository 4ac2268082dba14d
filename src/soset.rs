use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use core::iter::FusedIterator;

use crate::comparator::{Comparator, Natural, NaturalOrder};
use crate::error::Result;
use crate::snapshot::Snapshot;
use crate::somap::{self, SoMap};

/// A sorted set built on [`SoMap`].
///
/// Every member is stored in the inner map as both key and value, so adding a member clones it
/// once. Ordering, null-like members and errors behave exactly as for [`SoMap`] keys.
///
/// # Examples
///
/// ```
/// use somap::SoSet;
///
/// let mut set = SoSet::new();
/// set.add("b").unwrap().add("a").unwrap().add("c").unwrap();
///
/// assert!(set.has("a").unwrap());
/// assert_eq!(set.min(), Some(&"a"));
///
/// set.delete("a").unwrap();
/// assert_eq!(set.to_string(), "SoSet 2 { b, c }");
/// ```
pub struct SoSet<T, C = Natural> {
    map: SoMap<T, T, C>,
    len: usize,
}

/// A borrowing iterator over the members of a [`SoSet`], in ascending order.
///
/// This `struct` is created by [`SoSet::iter`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T> {
    inner: somap::Iter<'a, T, T>,
}

impl<T> SoSet<T> {
    /// Makes a new, empty set ordered by [`Natural`].
    #[must_use]
    pub const fn new() -> Self {
        SoSet {
            map: SoMap::new(),
            len: 0,
        }
    }

    /// Makes a new, empty set with room for `capacity` members.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        SoSet {
            map: SoMap::with_capacity(capacity),
            len: 0,
        }
    }

    /// Builds a set by calling [`add`](SoSet::add) for each value in turn.
    ///
    /// # Errors
    ///
    /// Stops at the first value that cannot be compared.
    ///
    /// # Examples
    ///
    /// ```
    /// use somap::SoSet;
    ///
    /// let set = SoSet::from_values([3, 1, 2, 1]).unwrap();
    /// assert_eq!(set.len(), 3);
    /// assert_eq!(set.values().collect::<Vec<_>>(), [1, 2, 3]);
    /// ```
    pub fn from_values<I>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: NaturalOrder + Clone,
    {
        let mut set = SoSet::new();
        set.try_extend(values)?;
        Ok(set)
    }
}

impl<T, C> SoSet<T, C> {
    /// Makes a new, empty set ordered by `comparator`.
    ///
    /// # Examples
    ///
    /// ```
    /// use somap::SoSet;
    ///
    /// let mut set = SoSet::<u8, _>::with_comparator(|a, b| b.cmp(a));
    /// set.add(1).unwrap().add(2).unwrap();
    /// assert_eq!(set.min(), Some(&2));
    /// ```
    #[must_use]
    pub fn with_comparator(comparator: C) -> Self
    where
        C: Fn(&T, &T) -> Ordering,
    {
        SoSet {
            map: SoMap::with_comparator(comparator),
            len: 0,
        }
    }

    /// Makes a new, empty set ordered by any [`Comparator`].
    #[must_use]
    pub const fn with_ordering(comparator: C) -> Self {
        SoSet {
            map: SoMap::with_ordering(comparator),
            len: 0,
        }
    }

    /// Builds a set ordered by `comparator` by calling [`add`](SoSet::add) for each value.
    ///
    /// # Errors
    ///
    /// Stops at the first value that cannot be compared.
    pub fn from_values_with<I>(values: I, comparator: C) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Clone,
        C: Fn(&T, &T) -> Ordering,
    {
        let mut set = SoSet::with_comparator(comparator);
        set.try_extend(values)?;
        Ok(set)
    }

    /// The set's comparator.
    pub const fn comparator(&self) -> &C {
        self.map.comparator()
    }

    /// Returns the number of members.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the set has no members.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of members the set can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.map.capacity()
    }

    /// Removes every member.
    pub fn clear(&mut self) {
        self.map.clear();
        self.len = self.map.len();
    }

    /// Returns the smallest member.
    #[must_use]
    pub fn min(&self) -> Option<&T> {
        self.map.min().map(|(_, value)| value)
    }

    /// Returns the largest member.
    #[must_use]
    pub fn max(&self) -> Option<&T> {
        self.map.max().map(|(_, value)| value)
    }

    /// Gets an iterator over the members, in ascending order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.map.iter(),
        }
    }

    /// Calls `visit(value, value, set, position)` for every member in ascending order.
    ///
    /// The member is passed twice so that the callback shape matches [`SoMap::for_each`].
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(&T, &T, &Self, usize),
    {
        for (position, (key, value)) in self.map.iter().enumerate() {
            visit(value, key, self, position);
        }
    }

    /// Like [`for_each`](SoSet::for_each), with `context` handed to every call.
    pub fn for_each_with<X, F>(&self, context: &mut X, mut visit: F)
    where
        F: FnMut(&mut X, &T, &T, &Self, usize),
    {
        for (position, (key, value)) in self.map.iter().enumerate() {
            visit(context, value, key, self, position);
        }
    }

    /// Takes a snapshot of every member, in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use somap::SoSet;
    ///
    /// let mut set = SoSet::from_values(["b", "a"]).unwrap();
    /// let mut values = set.values();
    /// set.clear();
    /// assert_eq!(values.next(), Some("a"));
    /// assert_eq!(values.next(), Some("b"));
    /// assert_eq!(values.next(), None);
    /// ```
    pub fn values(&self) -> Snapshot<T>
    where
        T: Clone,
    {
        self.map.values()
    }

    /// Same as [`values`](SoSet::values).
    pub fn keys(&self) -> Snapshot<T>
    where
        T: Clone,
    {
        self.map.keys()
    }

    /// Takes a snapshot of `(member, member)` pairs, in ascending order.
    pub fn entries(&self) -> Snapshot<(T, T)>
    where
        T: Clone,
    {
        self.map.entries()
    }
}

impl<T: Clone, C: Comparator<T>> SoSet<T, C> {
    /// Adds `value`, returning the set for chaining.
    ///
    /// Adding a member that is already present replaces it with `value`.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the set unchanged, if `value` cannot be compared with a
    /// member.
    pub fn add(&mut self, value: T) -> Result<&mut Self> {
        let outcome = self.map.set(value.clone(), value).map(|_| ());
        self.len = self.map.len();
        outcome?;
        Ok(self)
    }

    /// Adds `value`, returning `true` if the set grew.
    ///
    /// A null-like value only joins an empty set; elsewhere this returns `false`.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the set unchanged, if `value` cannot be compared with a
    /// member.
    ///
    /// # Examples
    ///
    /// ```
    /// use somap::SoSet;
    ///
    /// let mut set = SoSet::new();
    /// assert!(set.insert(2).unwrap());
    /// assert!(!set.insert(2).unwrap());
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> Result<bool> {
        let before = self.map.len();
        let outcome = self.map.insert(value.clone(), value);
        self.len = self.map.len();
        outcome?;
        Ok(self.len > before)
    }

    /// Calls [`add`](SoSet::add) for each value in turn.
    ///
    /// # Errors
    ///
    /// Stops at the first value that cannot be compared; values before it stay added.
    pub fn try_extend<I>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        for value in values {
            self.add(value)?;
        }
        Ok(())
    }
}

impl<T, C> SoSet<T, C> {
    /// Returns `true` if `value` is a member.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be compared with a member.
    pub fn has<Q>(&self, value: &Q) -> Result<bool>
    where
        T: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.map.has(value)
    }

    /// Returns the stored member equal to `value`.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be compared with a member.
    pub fn get<Q>(&self, value: &Q) -> Result<Option<&T>>
    where
        T: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.map.get(value)
    }

    /// Removes `value`, returning `true` if it was a member.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the set unchanged, if `value` cannot be compared with a
    /// member.
    ///
    /// # Examples
    ///
    /// ```
    /// use somap::SoSet;
    ///
    /// let mut set = SoSet::from_values([1, 2]).unwrap();
    /// assert!(set.delete(&1).unwrap());
    /// assert!(!set.delete(&1).unwrap());
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn delete<Q>(&mut self, value: &Q) -> Result<bool>
    where
        T: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let outcome = self.map.delete(value);
        self.len = self.map.len();
        outcome
    }

    /// Removes and returns the stored member equal to `value`.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the set unchanged, if `value` cannot be compared with a
    /// member.
    pub fn take<Q>(&mut self, value: &Q) -> Result<Option<T>>
    where
        T: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let outcome = self.map.remove(value);
        self.len = self.map.len();
        outcome
    }
}

impl<T: Clone, C: Clone> Clone for SoSet<T, C> {
    fn clone(&self) -> Self {
        SoSet {
            map: self.map.clone(),
            len: self.len,
        }
    }
}

impl<T: PartialEq, C> PartialEq for SoSet<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq, C> Eq for SoSet<T, C> {}

impl<T: fmt::Debug, C> fmt::Debug for SoSet<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Renders `SoSet <len> { v1, v2 }` in ascending order.
impl<T: fmt::Display, C> fmt::Display for SoSet<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SoSet {} {{", self.len)?;
        for (position, value) in self.iter().enumerate() {
            if position > 0 {
                f.write_str(",")?;
            }
            write!(f, " {value}")?;
        }
        f.write_str(" }")
    }
}

impl<T, C: Default> Default for SoSet<T, C> {
    fn default() -> Self {
        SoSet::with_ordering(C::default())
    }
}

impl<'a, T, C> IntoIterator for &'a SoSet<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T, C> IntoIterator for SoSet<T, C> {
    type Item = T;
    type IntoIter = Snapshot<T>;

    /// Consumes the set into a snapshot of its members, in ascending order.
    fn into_iter(self) -> Snapshot<T> {
        self.map.into_values()
    }
}

impl<'a, T: 'a> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

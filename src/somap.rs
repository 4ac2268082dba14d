use alloc::vec::Vec;
use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use core::iter::FusedIterator;

use crate::comparator::{Comparator, Natural, NaturalOrder};
use crate::error::Result;
use crate::raw::{InOrder, RawSoMap};
use crate::snapshot::Snapshot;

/// A sorted map over an unbalanced binary search tree.
///
/// Keys are kept in the order defined by the map's comparator `C`: by default [`Natural`],
/// the key type's own [`NaturalOrder`]; otherwise any `Fn(&K, &K) -> Ordering` or
/// [`Comparator`] given at construction.
///
/// The tree is never rebalanced. Operations cost O(depth), which is O(log n) for keys that
/// arrive in random order and O(n) for keys that arrive sorted.
///
/// Traversal comes in two flavours:
/// - [`iter`](SoMap::iter) and [`for_each`](SoMap::for_each) borrow the map and walk it in
///   ascending key order;
/// - [`entries`](SoMap::entries), [`keys`](SoMap::keys) and [`values`](SoMap::values) copy the
///   map's contents into a [`Snapshot`] up front, so the map can be changed while the snapshot is
///   being consumed.
///
/// # Errors
///
/// Operations that compare keys return a [`Result`]. With a statically typed key they cannot
/// fail; with [`Value`](crate::Value) keys the natural ordering refuses to compare different
/// kinds and returns [`Error::TypeMismatch`](crate::Error::TypeMismatch), before anything is
/// changed.
///
/// # Examples
///
/// ```
/// use somap::SoMap;
///
/// let mut map = SoMap::new();
/// for (key, value) in [("x", 24), ("z", 26), ("y", 25), ("b", 2), ("a", 1)] {
///     map.set(key, value).unwrap();
/// }
///
/// assert_eq!(map.len(), 5);
/// assert_eq!(map.get("y").unwrap(), Some(&25));
/// assert_eq!(map.min(), Some((&"a", &1)));
///
/// map.delete("x").unwrap();
/// assert_eq!(map.to_string(), "SoMap 4 { a => 1, b => 2, y => 25, z => 26 }");
/// ```
pub struct SoMap<K, V, C = Natural> {
    raw: RawSoMap<K, V, C>,
}

/// A borrowing iterator over the entries of a [`SoMap`], in ascending key order.
///
/// This `struct` is created by [`SoMap::iter`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    inner: InOrder<'a, K, V>,
}

impl<K, V> SoMap<K, V> {
    /// Makes a new, empty map ordered by [`Natural`].
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use somap::SoMap;
    ///
    /// let mut map = SoMap::new();
    /// map.set(1, "a").unwrap();
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        SoMap {
            raw: RawSoMap::new(Natural),
        }
    }

    /// Makes a new, empty map with room for `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        SoMap {
            raw: RawSoMap::with_capacity(capacity, Natural),
        }
    }

    /// Builds a map by calling [`set`](SoMap::set) for each pair in turn.
    ///
    /// Later pairs overwrite the values of earlier pairs with the same key.
    ///
    /// # Errors
    ///
    /// Stops at the first key that cannot be compared.
    ///
    /// # Examples
    ///
    /// ```
    /// use somap::SoMap;
    ///
    /// let map = SoMap::from_entries([(2, "two"), (5, "five"), (2, "deux")]).unwrap();
    /// assert_eq!(map.to_string(), "SoMap 2 { 2 => deux, 5 => five }");
    /// ```
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: NaturalOrder,
    {
        let mut map = SoMap::new();
        map.try_extend(entries)?;
        Ok(map)
    }
}

impl<K, V, C> SoMap<K, V, C> {
    /// Makes a new, empty map ordered by `comparator`.
    ///
    /// # Examples
    ///
    /// ```
    /// use somap::SoMap;
    ///
    /// let mut map = SoMap::<i32, &str, _>::with_comparator(|a, b| b.cmp(a));
    /// map.set(1, "one").unwrap().set(2, "two").unwrap();
    /// assert_eq!(map.to_string(), "SoMap 2 { 2 => two, 1 => one }");
    /// ```
    #[must_use]
    pub fn with_comparator(comparator: C) -> Self
    where
        C: Fn(&K, &K) -> Ordering,
    {
        SoMap {
            raw: RawSoMap::new(comparator),
        }
    }

    /// Makes a new, empty map ordered by any [`Comparator`].
    #[must_use]
    pub const fn with_ordering(comparator: C) -> Self {
        SoMap {
            raw: RawSoMap::new(comparator),
        }
    }

    /// Builds a map ordered by `comparator` by calling [`set`](SoMap::set) for each pair.
    ///
    /// # Errors
    ///
    /// Stops at the first key that cannot be compared.
    pub fn from_entries_with<I>(entries: I, comparator: C) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        C: Fn(&K, &K) -> Ordering,
    {
        let mut map = SoMap::with_comparator(comparator);
        map.try_extend(entries)?;
        Ok(map)
    }

    /// The map's comparator.
    pub const fn comparator(&self) -> &C {
        self.raw.comparator()
    }

    /// Returns the number of entries in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use somap::SoMap;
    ///
    /// let mut a = SoMap::new();
    /// assert_eq!(a.len(), 0);
    /// a.set(1, "a").unwrap();
    /// assert_eq!(a.len(), 1);
    /// ```
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map holds no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns how many entries the map can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the entry with the smallest key.
    ///
    /// # Examples
    ///
    /// ```
    /// use somap::SoMap;
    ///
    /// let mut map = SoMap::new();
    /// assert_eq!(map.min(), None);
    /// map.set(2, "b").unwrap().set(1, "a").unwrap();
    /// assert_eq!(map.min(), Some((&1, &"a")));
    /// ```
    #[must_use]
    pub fn min(&self) -> Option<(&K, &V)> {
        self.raw.first_key_value()
    }

    /// Returns the entry with the largest key.
    #[must_use]
    pub fn max(&self) -> Option<(&K, &V)> {
        self.raw.last_key_value()
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.raw.in_order(),
        }
    }

    /// Calls `visit(value, key, map, position)` for every entry in ascending key order.
    ///
    /// `position` counts from zero and goes up by one per entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use somap::SoMap;
    ///
    /// let map = SoMap::from_entries([("b", 2), ("a", 1)]).unwrap();
    /// map.for_each(|value, key, map, position| {
    ///     assert_eq!(map.len(), 2);
    ///     println!("#{position}: {key} => {value}");
    /// });
    /// ```
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(&V, &K, &Self, usize),
    {
        for (position, (key, value)) in self.iter().enumerate() {
            visit(value, key, self, position);
        }
    }

    /// Like [`for_each`](SoMap::for_each), with `context` handed to every call.
    ///
    /// # Examples
    ///
    /// ```
    /// use somap::SoMap;
    ///
    /// #[derive(Default)]
    /// struct Counter {
    ///     sum: i32,
    ///     count: usize,
    /// }
    ///
    /// let map = SoMap::from_entries([(2, "two"), (5, "five"), (9, "nine")]).unwrap();
    /// let mut counter = Counter::default();
    /// map.for_each_with(&mut counter, |counter, _, key, _, _| {
    ///     counter.sum += key;
    ///     counter.count += 1;
    /// });
    /// assert_eq!((counter.sum, counter.count), (16, 3));
    /// ```
    pub fn for_each_with<T, F>(&self, context: &mut T, mut visit: F)
    where
        F: FnMut(&mut T, &V, &K, &Self, usize),
    {
        for (position, (key, value)) in self.iter().enumerate() {
            visit(context, value, key, self, position);
        }
    }

    /// Takes a snapshot of every `(key, value)` pair, in ascending key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use somap::SoMap;
    ///
    /// let mut map = SoMap::from_entries([(1, 'a'), (2, 'b')]).unwrap();
    /// let entries = map.entries();
    /// map.clear();
    /// assert_eq!(entries.collect::<Vec<_>>(), [(1, 'a'), (2, 'b')]);
    /// ```
    pub fn entries(&self) -> Snapshot<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        let mut buffer = Vec::with_capacity(self.len());
        self.for_each(|value, key, _, _| buffer.push((key.clone(), value.clone())));
        Snapshot::new(buffer)
    }

    /// Takes a snapshot of every key, in ascending order.
    pub fn keys(&self) -> Snapshot<K>
    where
        K: Clone,
    {
        let mut buffer = Vec::with_capacity(self.len());
        self.for_each(|_, key, _, _| buffer.push(key.clone()));
        Snapshot::new(buffer)
    }

    /// Takes a snapshot of every value, in ascending key order.
    pub fn values(&self) -> Snapshot<V>
    where
        V: Clone,
    {
        let mut buffer = Vec::with_capacity(self.len());
        self.for_each(|value, _, _, _| buffer.push(value.clone()));
        Snapshot::new(buffer)
    }

    /// Consumes the map into a snapshot of its keys.
    pub fn into_keys(mut self) -> Snapshot<K> {
        Snapshot::new(self.raw.drain_to_vec().into_iter().map(|(key, _)| key).collect())
    }

    /// Consumes the map into a snapshot of its values, in ascending key order.
    pub fn into_values(mut self) -> Snapshot<V> {
        Snapshot::new(self.raw.drain_to_vec().into_iter().map(|(_, value)| value).collect())
    }
}

impl<K, V, C: Comparator<K>> SoMap<K, V, C> {
    /// Sets the value for `key`, returning the map for chaining.
    ///
    /// If the key is already present only its value is replaced; the stored key is kept.
    ///
    /// Under [`Natural`] ordering (or any [`Comparator`] whose
    /// [`is_absent`](Comparator::is_absent) says so) the null-like keys `None`,
    /// [`Value::Null`](crate::Value::Null) and [`Value::Undefined`](crate::Value::Undefined) are
    /// never compared. Into an empty map such a key is planted as the root; into any other map
    /// the call changes nothing. Closure comparators see every key.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the map unchanged, if `key` cannot be compared with a stored
    /// key.
    ///
    /// # Examples
    ///
    /// ```
    /// use somap::SoMap;
    ///
    /// let mut map = SoMap::new();
    /// map.set("a", 1).unwrap().set("a", 2).unwrap();
    /// assert_eq!(map.get("a").unwrap(), Some(&2));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn set(&mut self, key: K, value: V) -> Result<&mut Self> {
        self.raw.insert(key, value)?;
        Ok(self)
    }

    /// Inserts a key-value pair, returning the value it replaced.
    ///
    /// Same semantics as [`set`](SoMap::set).
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the map unchanged, if `key` cannot be compared with a stored
    /// key.
    ///
    /// # Examples
    ///
    /// ```
    /// use somap::SoMap;
    ///
    /// let mut map = SoMap::new();
    /// assert_eq!(map.insert(37, "a").unwrap(), None);
    /// assert_eq!(map.insert(37, "b").unwrap(), Some("a"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>> {
        self.raw.insert(key, value)
    }

    /// Calls [`set`](SoMap::set) for each pair in turn.
    ///
    /// # Errors
    ///
    /// Stops at the first key that cannot be compared; pairs before it stay inserted.
    pub fn try_extend<I>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in entries {
            self.raw.insert(key, value)?;
        }
        Ok(())
    }
}

impl<K, V, C> SoMap<K, V, C> {
    /// Returns a reference to the value stored for `key`, or `None` when there is none.
    ///
    /// Null-like probes always miss.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` cannot be compared with a stored key.
    ///
    /// # Examples
    ///
    /// ```
    /// use somap::SoMap;
    ///
    /// let mut map = SoMap::new();
    /// map.set(String::from("a"), 1).unwrap();
    /// assert_eq!(map.get("a").unwrap(), Some(&1));
    /// assert_eq!(map.get("b").unwrap(), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Result<Option<&V>>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.get(key)
    }

    /// Returns the stored key and value for `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` cannot be compared with a stored key.
    pub fn get_key_value<Q>(&self, key: &Q) -> Result<Option<(&K, &V)>>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.get_key_value(key)
    }

    /// Returns a mutable reference to the value stored for `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` cannot be compared with a stored key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<Option<&mut V>>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.get_mut(key)
    }

    /// Returns `true` if a value is stored for `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` cannot be compared with a stored key.
    ///
    /// # Examples
    ///
    /// ```
    /// use somap::SoMap;
    ///
    /// let mut map = SoMap::new();
    /// map.set(1, None::<&str>).unwrap();
    /// assert!(map.has(&1).unwrap());
    /// assert!(!map.has(&2).unwrap());
    /// ```
    pub fn has<Q>(&self, key: &Q) -> Result<bool>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        Ok(self.raw.get(key)?.is_some())
    }

    /// Removes `key`, returning `true` if it was present.
    ///
    /// Removing an absent key does nothing.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the map unchanged, if `key` cannot be compared with a stored
    /// key.
    ///
    /// # Examples
    ///
    /// ```
    /// use somap::SoMap;
    ///
    /// let mut map = SoMap::from_entries([(1, "a"), (2, "b")]).unwrap();
    /// assert!(map.delete(&1).unwrap());
    /// assert!(!map.delete(&1).unwrap());
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn delete<Q>(&mut self, key: &Q) -> Result<bool>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        Ok(self.raw.remove_entry(key)?.is_some())
    }

    /// Removes `key`, returning its value if it was present.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the map unchanged, if `key` cannot be compared with a stored
    /// key.
    pub fn remove<Q>(&mut self, key: &Q) -> Result<Option<V>>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        Ok(self.raw.remove_entry(key)?.map(|(_, value)| value))
    }

    /// Removes `key`, returning the stored key and its value if it was present.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the map unchanged, if `key` cannot be compared with a stored
    /// key.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Result<Option<(K, V)>>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.remove_entry(key)
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for SoMap<K, V, C> {
    fn clone(&self) -> Self {
        SoMap { raw: self.raw.clone() }
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for SoMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<K: Eq, V: Eq, C> Eq for SoMap<K, V, C> {}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for SoMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Renders `SoMap <len> { k1 => v1, k2 => v2 }` in ascending key order.
impl<K: fmt::Display, V: fmt::Display, C> fmt::Display for SoMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SoMap {} {{", self.len())?;
        for (position, (key, value)) in self.iter().enumerate() {
            if position > 0 {
                f.write_str(",")?;
            }
            write!(f, " {key} => {value}")?;
        }
        f.write_str(" }")
    }
}

impl<K, V, C: Default> Default for SoMap<K, V, C> {
    fn default() -> Self {
        SoMap::with_ordering(C::default())
    }
}

impl<'a, K, V, C> IntoIterator for &'a SoMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K, V, C> IntoIterator for SoMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = Snapshot<(K, V)>;

    /// Consumes the map into a snapshot of its entries, sorted by key.
    fn into_iter(mut self) -> Snapshot<(K, V)> {
        Snapshot::new(self.raw.drain_to_vec())
    }
}

impl<'a, K: 'a, V: 'a> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

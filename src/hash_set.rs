use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::fmt::Debug;
use core::fmt::Display;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::sync::atomic::AtomicUsize;
use core::sync::atomic::Ordering;

use crate::config::Config;
use crate::dump;
use crate::error::InsertError;
use crate::hash::DefaultHashBuilder;
use crate::hash::hash_code;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;

static NEXT_SET_ID: AtomicUsize = AtomicUsize::new(0);

/// Identifies one set instance so that a [`SnapshotIter`] only removes from the
/// set it was taken from. Clones get a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SetId(usize);

impl SetId {
    fn next() -> Self {
        Self(NEXT_SET_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A hash set implemented using the chained [`HashTable`] as the underlying
/// storage.
///
/// `HashSet<T, S>` stores values of type `T` where `T` implements `Hash + Eq`
/// and uses a configurable hasher builder `S` to hash values. It grows by
/// doubling under the same load factor rule as [`HashMap`](crate::HashMap).
///
/// Besides the usual borrowing iterator, [`iterator`](HashSet::iterator)
/// returns a [`SnapshotIter`] that walks a copy of the elements and can remove
/// the element it last returned from the live set.
pub struct HashSet<T, S = DefaultHashBuilder> {
    table: HashTable<T>,
    hash_builder: S,
    id: SetId,
}

impl<T, S> Clone for HashSet<T, S>
where
    T: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            hash_builder: self.hash_builder.clone(),
            id: SetId::next(),
        }
    }
}

impl<T, S> PartialEq for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|v| other.contains(v))
    }
}

impl<T, S> Eq for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
}

impl<T, S> Debug for HashSet<T, S>
where
    T: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Renders `[a, b, c]` in bucket-scan order, or `[]` when empty.
impl<T, S> Display for HashSet<T, S>
where
    T: Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dump::write_list(f, self.iter())
    }
}

impl<T, S> HashSet<T, S> {
    pub(crate) fn from_parts(table: HashTable<T>, hash_builder: S) -> Self {
        Self {
            table,
            hash_builder,
            id: SetId::next(),
        }
    }

    /// Returns the number of elements in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of buckets. Always a power of two.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the load factor threshold.
    pub fn load_factor(&self) -> f32 {
        self.table.load_factor()
    }

    /// Returns the largest number of buckets the set may grow to.
    pub fn max_capacity(&self) -> usize {
        self.table.max_capacity()
    }

    /// Returns a reference to the set's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Clears the set, removing all values. The capacity is kept.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns an iterator over the elements of the set in bucket-scan order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashSet;
    ///
    /// let mut set = HashSet::new();
    /// set.add(1).unwrap();
    /// set.add(2).unwrap();
    ///
    /// let mut values: Vec<_> = set.iter().copied().collect();
    /// values.sort();
    /// assert_eq!(values, vec![1, 2]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Clears the set, returning all elements as an iterator.
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Retains only the elements specified by the predicate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashSet;
    ///
    /// let mut set = HashSet::new();
    /// for i in 1..=6 {
    ///     set.add(i).unwrap();
    /// }
    /// set.retain(|&x| x % 2 == 0);
    /// assert_eq!(set.len(), 3);
    /// ```
    pub fn retain(&mut self, f: impl FnMut(&T) -> bool) {
        self.table.retain(f);
    }

    /// Returns a [`SnapshotIter`] over a copy of the current elements.
    ///
    /// Later changes to the set do not affect the iteration. The iterator can
    /// remove the element it last returned from both its copy and this set,
    /// see [`SnapshotIter::remove`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashSet;
    ///
    /// let mut set = HashSet::new();
    /// set.add("A").unwrap();
    /// set.add("B").unwrap();
    ///
    /// let mut it = set.iterator();
    /// while let Some(value) = it.next() {
    ///     if value == "A" {
    ///         assert!(it.remove(&mut set));
    ///     }
    /// }
    /// assert!(!set.contains(&"A"));
    /// assert!(set.contains(&"B"));
    /// ```
    pub fn iterator(&self) -> SnapshotIter<T>
    where
        T: Clone,
    {
        SnapshotIter {
            snapshot: self.table.iter().cloned().collect(),
            cursor: 0,
            last_returned: None,
            owner: self.id,
        }
    }

    /// Returns a copy of the elements in bucket-scan order, or `None` when the
    /// set is empty.
    pub fn to_array(&self) -> Option<Vec<T>>
    where
        T: Clone,
    {
        if self.is_empty() {
            return None;
        }
        Some(self.table.iter().cloned().collect())
    }

    /// Copies the elements into the front of `target` in bucket-scan order and
    /// returns the filled prefix.
    ///
    /// Returns `None`, leaving `target` untouched, when the set is empty or
    /// `target` is shorter than [`len`](HashSet::len).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashSet;
    ///
    /// let mut set = HashSet::new();
    /// set.add(7).unwrap();
    ///
    /// let mut buf = [0; 4];
    /// assert_eq!(set.to_array_into(&mut buf), Some(&mut [7][..]));
    /// assert_eq!(buf, [7, 0, 0, 0]);
    ///
    /// let mut empty: [i32; 0] = [];
    /// assert_eq!(set.to_array_into(&mut empty), None);
    /// ```
    pub fn to_array_into<'a>(&self, target: &'a mut [T]) -> Option<&'a mut [T]>
    where
        T: Clone,
    {
        let len = self.len();
        if len == 0 || target.len() < len {
            return None;
        }
        for (slot, value) in target.iter_mut().zip(self.table.iter()) {
            slot.clone_from(value);
        }
        Some(&mut target[..len])
    }

    /// Renders the set as a single-column listing headed by `label` and a
    /// dashed underline, one element per line padded to 30 characters.
    pub fn dump_column(&self, label: &str) -> String
    where
        T: Display,
    {
        dump::one_column(label, self.iter())
    }

    /// Returns statistics about the underlying bucket table.
    #[cfg(feature = "stats")]
    pub fn debug_stats(&self) -> crate::hash_table::DebugStats {
        self.table.debug_stats()
    }

    /// Returns a histogram of chain lengths in the underlying bucket table.
    #[cfg(feature = "stats")]
    pub fn chain_histogram(&self) -> Vec<usize> {
        self.table.chain_histogram()
    }
}

impl<T, S> HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    /// Creates a new hash set with the given hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::collections::hash_map::RandomState;
    ///
    /// use chain_hash::HashSet;
    ///
    /// let set: HashSet<i32, _> = HashSet::with_hasher(RandomState::new());
    /// assert!(set.is_empty());
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_config_and_hasher(Config::default(), hash_builder)
    }

    /// Creates a new hash set with at least `capacity` buckets and the given
    /// hasher builder.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self::with_config_and_hasher(Config::new().initial_capacity(capacity), hash_builder)
    }

    /// Creates a new hash set configured by `config` with the given hasher
    /// builder.
    pub fn with_config_and_hasher(config: Config, hash_builder: S) -> Self {
        Self::from_parts(HashTable::with_config(config), hash_builder)
    }

    /// Adds a value to the set.
    ///
    /// Returns `Ok(true)` if the value was added and `Ok(false)` if an equal
    /// value was already present, in which case the set is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`InsertError::CapacityExceeded`] when the value is new and the
    /// set is already at its maximum capacity. The set is left unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashSet;
    ///
    /// let mut set = HashSet::new();
    /// assert_eq!(set.add(2), Ok(true));
    /// assert_eq!(set.add(2), Ok(false));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn add(&mut self, value: T) -> Result<bool, InsertError> {
        let hash = hash_code(&self.hash_builder, &value);
        match self.table.entry(hash, |v| v == &value) {
            TableEntry::Occupied(_) => Ok(false),
            TableEntry::Vacant(entry) => {
                entry.insert(value)?;
                Ok(true)
            }
        }
    }

    /// Returns `true` if the set contains a value.
    pub fn contains(&self, value: &T) -> bool {
        self.get(value).is_some()
    }

    /// Returns a reference to the stored value equal to `value`, if any.
    pub fn get(&self, value: &T) -> Option<&T> {
        let hash = hash_code(&self.hash_builder, value);
        self.table.find(hash, |v| v == value)
    }

    /// Removes a value from the set. Returns whether the value was present.
    pub fn remove(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    /// Removes and returns the stored value equal to `value`, if any.
    pub fn take(&mut self, value: &T) -> Option<T> {
        let hash = hash_code(&self.hash_builder, value);
        self.table.remove(hash, |v| v == value)
    }

    /// Adds every value from `values`.
    ///
    /// Returns `Ok(false)` without touching the set when `values` is empty and
    /// `Ok(true)` otherwise, whether or not any value was new.
    ///
    /// # Errors
    ///
    /// Stops at the first value that cannot be added because the set is at its
    /// maximum capacity. Values added before that point stay in the set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashSet;
    ///
    /// let mut set = HashSet::new();
    /// assert_eq!(set.add_all(Vec::<&str>::new()), Ok(false));
    /// assert_eq!(set.add_all(["X", "Y"]), Ok(true));
    /// assert_eq!(set.add_all(["X"]), Ok(true));
    /// assert_eq!(set.len(), 2);
    /// ```
    pub fn add_all<I>(&mut self, values: I) -> Result<bool, InsertError>
    where
        I: IntoIterator<Item = T>,
    {
        let mut values = values.into_iter().peekable();
        if values.peek().is_none() {
            return Ok(false);
        }
        for value in values {
            self.add(value)?;
        }
        Ok(true)
    }

    /// Returns `true` if every value in `values` is in the set.
    ///
    /// An empty `values` yields `false`.
    pub fn contains_all<'a, I>(&self, values: I) -> bool
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let mut values = values.into_iter().peekable();
        if values.peek().is_none() {
            return false;
        }
        values.all(|v| self.contains(v))
    }

    /// Removes every value in `values` from the set.
    ///
    /// Returns `false` when `values` is empty and `true` otherwise, whether or
    /// not anything was removed.
    pub fn remove_all<'a, I>(&mut self, values: I) -> bool
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let mut values = values.into_iter().peekable();
        if values.peek().is_none() {
            return false;
        }
        for value in values {
            self.remove(value);
        }
        true
    }

    /// Keeps only the values that also appear in `values`.
    ///
    /// When `values` is empty the set is left unchanged and `false` is
    /// returned. Otherwise the common values are taken out, the set is
    /// cleared and they are put back at the current capacity, and `true` is
    /// returned. Putting them back never grows the set or fails, since it held
    /// them all before.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashSet;
    ///
    /// let mut set = HashSet::new();
    /// set.add_all(["A", "B", "C"]).unwrap();
    /// assert!(set.retain_all(&["B", "C", "D"]));
    /// assert_eq!(set.len(), 2);
    /// assert!(!set.contains(&"A"));
    /// ```
    pub fn retain_all<'a, I>(&mut self, values: I) -> bool
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let mut values = values.into_iter().peekable();
        if values.peek().is_none() {
            return false;
        }
        let common: Vec<(u32, T)> = values
            .filter_map(|v| {
                let hash = hash_code(&self.hash_builder, v);
                self.table.remove(hash, |x| x == v).map(|x| (hash, x))
            })
            .collect();
        self.table.clear();
        for (hash, value) in common {
            self.table.reinsert(hash, value);
        }
        true
    }
}

impl<T> HashSet<T, DefaultHashBuilder>
where
    T: Hash + Eq,
{
    /// Creates a new hash set with 4 buckets, a load factor of 0.75, and the
    /// default hasher builder.
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }

    /// Creates a new hash set with at least `capacity` buckets using the
    /// default hasher builder.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }

    /// Creates a new hash set with at least `capacity` buckets and the given
    /// load factor threshold.
    ///
    /// # Panics
    ///
    /// Panics if `load_factor` is not in `(0, 1]`.
    pub fn with_capacity_and_load_factor(capacity: usize, load_factor: f32) -> Self {
        Self::with_config(
            Config::new()
                .initial_capacity(capacity)
                .load_factor(load_factor),
        )
    }

    /// Creates a new hash set configured by `config` using the default hasher
    /// builder.
    pub fn with_config(config: Config) -> Self {
        Self::with_config_and_hasher(config, DefaultHashBuilder::default())
    }
}

impl<T, S> Default for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

/// An iterator over a copy of a set's elements, taken when the iterator was
/// created.
///
/// Created by [`HashSet::iterator`]. Each call to `next` clones the element out
/// of the copy. [`remove`](SnapshotIter::remove) deletes the element most
/// recently returned from both the copy and the live set.
#[derive(Debug, Clone)]
pub struct SnapshotIter<T> {
    snapshot: Vec<T>,
    cursor: usize,
    last_returned: Option<usize>,
    owner: SetId,
}

impl<T> SnapshotIter<T> {
    /// Returns `true` if another element remains.
    pub fn has_next(&self) -> bool {
        self.cursor < self.snapshot.len()
    }

    /// The elements not yet returned.
    pub fn remaining(&self) -> &[T] {
        &self.snapshot[self.cursor..]
    }

    /// Removes the element most recently returned by `next` from the copy and
    /// from `set`.
    ///
    /// Returns `false` and does nothing when `next` has not been called, when
    /// the last returned element was already removed, or when `set` is not the
    /// set this iterator was created from.
    pub fn remove<S>(&mut self, set: &mut HashSet<T, S>) -> bool
    where
        T: Hash + Eq,
        S: BuildHasher,
    {
        if set.id != self.owner {
            return false;
        }
        let Some(position) = self.last_returned.take() else {
            return false;
        };
        let value = self.snapshot.remove(position);
        self.cursor -= 1;
        set.remove(&value);
        true
    }
}

impl<T> Iterator for SnapshotIter<T>
where
    T: Clone,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let value = self.snapshot.get(self.cursor)?.clone();
        self.last_returned = Some(self.cursor);
        self.cursor += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.snapshot.len() - self.cursor;
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for SnapshotIter<T> where T: Clone {}

/// An iterator over the elements of a `HashSet`.
pub struct Iter<'a, T> {
    inner: crate::hash_table::Iter<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

/// A draining iterator over the elements of a `HashSet`.
pub struct Drain<'a, T> {
    inner: crate::hash_table::Drain<'a, T>,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// An owning iterator over the elements of a `HashSet`.
pub struct IntoIter<T> {
    inner: crate::hash_table::IntoIter<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl<T, S> IntoIterator for HashSet<T, S> {
    type IntoIter = IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, T, S> IntoIterator for &'a HashSet<T, S> {
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

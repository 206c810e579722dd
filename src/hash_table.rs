use alloc::vec::Vec;
use core::fmt::Debug;
use core::marker::PhantomData;

use crate::config::Config;
use crate::error::InsertError;
use crate::hash::index;

/// A stored value together with the hash code it was inserted under.
///
/// Keeping the hash lets a rehash recompute bucket indices without calling back
/// into user `Hash` implementations.
#[derive(Clone)]
struct Slot<V> {
    hash: u32,
    value: V,
}

type Bucket<V> = Vec<Slot<V>>;

fn empty_buckets<V>(capacity: usize) -> Vec<Bucket<V>> {
    // Empty chains do not allocate, so buckets only cost memory once something
    // lands in them.
    let mut buckets = Vec::with_capacity(capacity);
    buckets.resize_with(capacity, Vec::new);
    buckets
}

/// Debug statistics for bucket table analysis.
///
/// Only available with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of values currently in the table
    pub populated: usize,
    /// Number of buckets
    pub capacity: usize,
    /// Largest number of buckets the table may grow to
    pub max_capacity: usize,
    /// Number of buckets holding at least one value
    pub occupied_buckets: usize,
    /// Length of the longest chain
    pub longest_chain: usize,
    /// Load (populated / capacity)
    pub load: f64,
    /// Configured load factor threshold
    pub load_factor: f32,
    /// Number of times the table has doubled since construction
    pub rehashes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Bucket Table Debug Statistics ===");
        println!(
            "Population: {}/{} buckets ({:.2}% load, threshold {:.2}%)",
            self.populated,
            self.capacity,
            self.load * 100.0,
            self.load_factor * 100.0
        );
        println!(
            "Buckets: {} occupied ({:.2}%), longest chain {}",
            self.occupied_buckets,
            if self.capacity == 0 {
                0.0
            } else {
                (self.occupied_buckets as f64 / self.capacity as f64) * 100.0
            },
            self.longest_chain
        );
        println!(
            "Growth: {} rehashes, max capacity {}",
            self.rehashes, self.max_capacity
        );
    }
}

/// A bucket table using separate chaining over a power-of-two array of chains.
///
/// `HashTable<V>` stores values of type `V`. Like the containers built on top
/// of it, it never hashes anything itself: every operation takes the value's
/// 32-bit hash code and an equality predicate. The code is run through
/// [`mix`](crate::hash::mix) and masked down to a bucket index; the bucket is
/// then scanned in insertion order.
///
/// Inserting a new value first checks the load factor threshold and, if it
/// would be exceeded, doubles the table and reinserts every value before
/// continuing. Once the configured maximum capacity is reached the insertion is
/// refused with [`InsertError::CapacityExceeded`].
///
/// ## Example
///
/// ```rust
/// # use core::hash::BuildHasherDefault;
/// # use std::collections::hash_map::DefaultHasher;
/// #
/// # use chain_hash::hash::hash_code;
/// # use chain_hash::hash_table::Entry;
/// # use chain_hash::hash_table::HashTable;
/// #
/// #[derive(Debug, PartialEq)]
/// struct Person {
///     id: u64,
///     name: String,
/// }
///
/// let builder = BuildHasherDefault::<DefaultHasher>::default();
/// let mut table = HashTable::new();
/// let hash = hash_code(&builder, &123u64);
///
/// match table.entry(hash, |p: &Person| p.id == 123) {
///     Entry::Vacant(entry) => {
///         entry
///             .insert(Person {
///                 id: 123,
///                 name: "Alice".to_string(),
///             })
///             .expect("table has room");
///     }
///     Entry::Occupied(_) => {
///         println!("Person already exists");
///     }
/// }
/// assert_eq!(table.len(), 1);
/// ```
#[derive(Clone)]
pub struct HashTable<V> {
    buckets: Vec<Bucket<V>>,
    populated: usize,
    config: Config,

    #[cfg(any(test, feature = "stats"))]
    rehashes: usize,
}

impl<V> Debug for HashTable<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HashTable")
            .field(
                "chains",
                &self.buckets.iter().map(Vec::len).collect::<Vec<_>>(),
            )
            .field("populated", &self.populated)
            .field("capacity", &self.capacity())
            .field("max_capacity", &self.config.get_max_capacity())
            .field("load_factor", &self.config.get_load_factor())
            .finish()
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> HashTable<V> {
    /// Creates an empty table with 4 buckets and a load factor of 0.75.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an empty table with at least `capacity` buckets.
    ///
    /// The count is rounded up to a power of two.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<String> = HashTable::with_capacity(100);
    /// assert_eq!(table.capacity(), 128);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(Config::new().initial_capacity(capacity))
    }

    /// Creates an empty table sized and configured by `config`.
    pub fn with_config(config: Config) -> Self {
        let capacity = config.get_initial_capacity();
        tracing::trace!(
            capacity,
            load_factor = config.get_load_factor(),
            max_capacity = config.get_max_capacity(),
            "allocating bucket table"
        );

        Self {
            buckets: empty_buckets(capacity),
            populated: 0,
            config,
            #[cfg(any(test, feature = "stats"))]
            rehashes: 0,
        }
    }

    /// The settings this table was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the number of values in the table.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table contains no values.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of buckets. Always a power of two.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the load factor threshold.
    pub fn load_factor(&self) -> f32 {
        self.config.get_load_factor()
    }

    /// Returns the largest number of buckets the table may grow to.
    pub fn max_capacity(&self) -> usize {
        self.config.get_max_capacity()
    }

    #[inline]
    fn bucket_index(&self, hash: u32) -> usize {
        index(hash, self.buckets.len())
    }

    #[inline]
    fn position(&self, hash: u32, eq: impl Fn(&V) -> bool) -> Option<(usize, usize)> {
        let bucket = self.bucket_index(hash);
        self.buckets[bucket]
            .iter()
            .position(|slot| slot.hash == hash && eq(&slot.value))
            .map(|slot| (bucket, slot))
    }

    /// Finds a value by its hash code and an equality predicate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(42, |&v: &i32| v == 5).or_insert(5).unwrap();
    ///
    /// assert_eq!(table.find(42, |&v| v == 5), Some(&5));
    /// assert_eq!(table.find(42, |&v| v == 6), None);
    /// ```
    pub fn find(&self, hash: u32, eq: impl Fn(&V) -> bool) -> Option<&V> {
        let bucket = self.bucket_index(hash);
        self.buckets[bucket]
            .iter()
            .find(|slot| slot.hash == hash && eq(&slot.value))
            .map(|slot| &slot.value)
    }

    /// Finds a value by its hash code and an equality predicate, returning a
    /// mutable reference.
    ///
    /// The caller must not change the value in a way that changes its hash or
    /// equality.
    pub fn find_mut(&mut self, hash: u32, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        let bucket = self.bucket_index(hash);
        self.buckets[bucket]
            .iter_mut()
            .find(|slot| slot.hash == hash && eq(&slot.value))
            .map(|slot| &mut slot.value)
    }

    /// Gets the entry for the given hash code and equality predicate.
    ///
    /// Looking up an entry never grows the table. Growth happens only when a
    /// [`VacantEntry`] is filled.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::hash_table::Entry;
    /// # use chain_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    ///
    /// match table.entry(7, |s: &String| s == "hello") {
    ///     Entry::Vacant(entry) => {
    ///         entry.insert("hello".to_string()).unwrap();
    ///     }
    ///     Entry::Occupied(mut entry) => {
    ///         entry.get_mut().push_str(" again");
    ///     }
    /// }
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn entry(&mut self, hash: u32, eq: impl Fn(&V) -> bool) -> Entry<'_, V> {
        match self.position(hash, eq) {
            Some((bucket, slot)) => Entry::Occupied(OccupiedEntry {
                table: self,
                bucket,
                slot,
            }),
            None => Entry::Vacant(VacantEntry { table: self, hash }),
        }
    }

    /// Removes and returns the first value matching the hash code and
    /// predicate. Returns `None` if there is no such value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(42, |&n: &u64| n == 42).or_insert(42).unwrap();
    ///
    /// assert_eq!(table.remove(42, |&n| n == 42), Some(42));
    /// assert!(table.is_empty());
    /// assert_eq!(table.remove(99, |&n| n == 99), None);
    /// ```
    pub fn remove(&mut self, hash: u32, eq: impl Fn(&V) -> bool) -> Option<V> {
        let (bucket, slot) = self.position(hash, eq)?;
        self.populated -= 1;
        Some(self.buckets[bucket].remove(slot).value)
    }

    /// Removes all values from the table, keeping its capacity.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.populated = 0;
    }

    /// Keeps only the values for which `f` returns `true`.
    pub fn retain(&mut self, mut f: impl FnMut(&V) -> bool) {
        for bucket in &mut self.buckets {
            let before = bucket.len();
            bucket.retain(|slot| f(&slot.value));
            self.populated -= before - bucket.len();
        }
    }

    /// Returns an iterator over all values in bucket-scan order: bucket 0
    /// first, and insertion order within each bucket.
    ///
    /// The order is not insertion order and changes when the table grows.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            buckets: self.buckets.iter(),
            chain: Default::default(),
            remaining: self.populated,
        }
    }

    /// Returns an iterator that removes and yields every value in bucket-scan
    /// order. The table keeps its capacity.
    pub fn drain(&mut self) -> Drain<'_, V> {
        let capacity = self.capacity();
        let buckets = core::mem::replace(&mut self.buckets, empty_buckets(capacity));
        let remaining = core::mem::take(&mut self.populated);
        Drain {
            inner: buckets.into_iter().flatten(),
            remaining,
            _table: PhantomData,
        }
    }

    /// Builds a table with the same capacity, configuration and layout whose
    /// values are `f` applied to each of this table's values.
    ///
    /// `f` must preserve the equality that the hash codes were computed for;
    /// the stored hash codes are carried over as they are.
    pub(crate) fn clone_with<U>(&self, mut f: impl FnMut(&V) -> U) -> HashTable<U> {
        HashTable {
            buckets: self
                .buckets
                .iter()
                .map(|bucket| {
                    bucket
                        .iter()
                        .map(|slot| Slot {
                            hash: slot.hash,
                            value: f(&slot.value),
                        })
                        .collect()
                })
                .collect(),
            populated: self.populated,
            config: self.config,
            #[cfg(any(test, feature = "stats"))]
            rehashes: 0,
        }
    }

    /// Applies the growth policy ahead of inserting one new value.
    fn reserve_one(&mut self) -> Result<(), InsertError> {
        let capacity = self.capacity();
        if !self.config.exceeds_threshold(self.populated + 1, capacity) {
            return Ok(());
        }

        if capacity >= self.config.get_max_capacity() {
            tracing::warn!(
                capacity,
                len = self.populated,
                "refusing insertion: table is at maximum capacity"
            );
            return Err(InsertError::CapacityExceeded { capacity });
        }

        self.rehash(capacity << 1);
        Ok(())
    }

    #[cold]
    fn rehash(&mut self, new_capacity: usize) {
        debug_assert!(new_capacity.is_power_of_two());
        let old_capacity = self.capacity();

        let values: Vec<Slot<V>> = core::mem::take(&mut self.buckets)
            .into_iter()
            .flatten()
            .collect();
        tracing::debug!(
            old_capacity,
            new_capacity,
            len = values.len(),
            "rehashing bucket table"
        );

        self.buckets = empty_buckets(new_capacity);
        self.populated = 0;
        for slot in values {
            self.push_slot(slot);
        }

        #[cfg(any(test, feature = "stats"))]
        {
            self.rehashes += 1;
        }
    }

    /// Appends `value` to its bucket without applying the growth policy.
    ///
    /// Only for values taken out of this table since its last growth, which it
    /// already held at the current capacity.
    pub(crate) fn reinsert(&mut self, hash: u32, value: V) {
        self.push_slot(Slot { hash, value });
    }

    /// Appends `slot` to the end of its bucket's chain.
    fn push_slot(&mut self, slot: Slot<V>) -> (usize, usize) {
        let bucket = self.bucket_index(slot.hash);
        let chain = &mut self.buckets[bucket];
        let position = chain.len();
        chain.push(slot);
        self.populated += 1;
        (bucket, position)
    }

    /// Returns a histogram of chain lengths: entry `n` is the number of
    /// buckets whose chain holds exactly `n` values.
    #[cfg(any(test, feature = "stats"))]
    pub fn chain_histogram(&self) -> Vec<usize> {
        let longest = self.buckets.iter().map(Vec::len).max().unwrap_or(0);
        let mut histogram = alloc::vec![0; longest + 1];
        for bucket in &self.buckets {
            histogram[bucket.len()] += 1;
        }
        histogram
    }

    /// Returns statistics about the table's layout and growth.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let capacity = self.capacity();
        DebugStats {
            populated: self.populated,
            capacity,
            max_capacity: self.config.get_max_capacity(),
            occupied_buckets: self.buckets.iter().filter(|b| !b.is_empty()).count(),
            longest_chain: self.buckets.iter().map(Vec::len).max().unwrap_or(0),
            load: self.populated as f64 / capacity as f64,
            load_factor: self.config.get_load_factor(),
            rehashes: self.rehashes,
        }
    }
}

/// A view into a single entry in the table, which may either be vacant or
/// occupied.
pub enum Entry<'a, V> {
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, V>),
    /// A vacant entry.
    Vacant(VacantEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Inserts `default` if the entry is vacant and returns a mutable reference
    /// to the value in the entry.
    ///
    /// # Errors
    ///
    /// Returns [`InsertError::CapacityExceeded`] if the entry is vacant and the
    /// table cannot grow to make room.
    pub fn or_insert(self, default: V) -> Result<&'a mut V, InsertError> {
        match self {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns a
    /// mutable reference to the value in the entry.
    ///
    /// # Errors
    ///
    /// Returns [`InsertError::CapacityExceeded`] if the entry is vacant and the
    /// table cannot grow to make room. `default` is not called in that case.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> Result<&'a mut V, InsertError> {
        match self {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                entry.table.reserve_one()?;
                Ok(entry.insert_reserved(default()))
            }
        }
    }

    /// Calls `f` on the value if the entry is occupied.
    pub fn and_modify(self, f: impl FnOnce(&mut V)) -> Self {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }
}

impl<'a, V> Entry<'a, V>
where
    V: Default,
{
    /// Inserts `V::default()` if the entry is vacant and returns a mutable
    /// reference to the value in the entry.
    ///
    /// # Errors
    ///
    /// Returns [`InsertError::CapacityExceeded`] if the entry is vacant and the
    /// table cannot grow to make room.
    pub fn or_default(self) -> Result<&'a mut V, InsertError> {
        self.or_insert_with(V::default)
    }
}

/// A view into a vacant entry in the table.
pub struct VacantEntry<'a, V> {
    table: &'a mut HashTable<V>,
    hash: u32,
}

impl<'a, V> VacantEntry<'a, V> {
    /// The hash code the value will be stored under.
    pub fn hash(&self) -> u32 {
        self.hash
    }

    /// Inserts `value` and returns a mutable reference to it.
    ///
    /// If the insertion pushes the table past its load factor threshold, the
    /// table doubles and rehashes first.
    ///
    /// # Errors
    ///
    /// Returns [`InsertError::CapacityExceeded`] if the table would have to
    /// grow past its maximum capacity. `value` is dropped and the table is
    /// left unchanged.
    pub fn insert(self, value: V) -> Result<&'a mut V, InsertError> {
        self.table.reserve_one()?;
        Ok(self.insert_reserved(value))
    }

    fn insert_reserved(self, value: V) -> &'a mut V {
        let table = self.table;
        let (bucket, slot) = table.push_slot(Slot {
            hash: self.hash,
            value,
        });
        &mut table.buckets[bucket][slot].value
    }
}

/// A view into an occupied entry in the table.
pub struct OccupiedEntry<'a, V> {
    table: &'a mut HashTable<V>,
    bucket: usize,
    slot: usize,
}

impl<'a, V> OccupiedEntry<'a, V> {
    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        &self.table.buckets[self.bucket][self.slot].value
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.table.buckets[self.bucket][self.slot].value
    }

    /// Converts the entry into a mutable reference to the value with the
    /// table's lifetime.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.table.buckets[self.bucket][self.slot].value
    }

    /// Removes the value from the table and returns it.
    ///
    /// The remaining values in the bucket keep their relative order.
    pub fn remove(self) -> V {
        self.table.populated -= 1;
        self.table.buckets[self.bucket].remove(self.slot).value
    }
}

/// An iterator over the values in a [`HashTable`], in bucket-scan order.
///
/// This struct is created by the [`iter`] method on [`HashTable`].
///
/// [`iter`]: HashTable::iter
pub struct Iter<'a, V> {
    buckets: core::slice::Iter<'a, Bucket<V>>,
    chain: core::slice::Iter<'a, Slot<V>>,
    remaining: usize,
}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Iter {
            buckets: self.buckets.clone(),
            chain: self.chain.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(slot) = self.chain.next() {
                self.remaining -= 1;
                return Some(&slot.value);
            }
            if self.remaining == 0 {
                return None;
            }
            self.chain = self.buckets.next()?.iter();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

/// A draining iterator over the values of a [`HashTable`].
///
/// This struct is created by the [`drain`] method on [`HashTable`]. Values not
/// yet yielded when it is dropped are dropped with it.
///
/// [`drain`]: HashTable::drain
pub struct Drain<'a, V> {
    inner: core::iter::Flatten<alloc::vec::IntoIter<Bucket<V>>>,
    remaining: usize,
    _table: PhantomData<&'a mut HashTable<V>>,
}

impl<V> Iterator for Drain<'_, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.inner.next()?;
        self.remaining -= 1;
        Some(slot.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Drain<'_, V> {}

/// A consuming iterator over the values of a [`HashTable`], in bucket-scan
/// order.
pub struct IntoIter<V> {
    inner: core::iter::Flatten<alloc::vec::IntoIter<Bucket<V>>>,
    remaining: usize,
}

impl<V> Iterator for IntoIter<V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.inner.next()?;
        self.remaining -= 1;
        Some(slot.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}

impl<V> IntoIterator for HashTable<V> {
    type IntoIter = IntoIter<V>;
    type Item = V;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.buckets.into_iter().flatten(),
            remaining: self.populated,
        }
    }
}

impl<'a, V> IntoIterator for &'a HashTable<V> {
    type IntoIter = Iter<'a, V>;
    type Item = &'a V;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::fmt::Debug;
use core::fmt::Display;
use core::hash::BuildHasher;
use core::hash::Hash;

use crate::config::Config;
use crate::dump;
use crate::error::InsertError;
use crate::hash::DefaultHashBuilder;
use crate::hash::hash_code;
use crate::hash_set::HashSet;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;

/// A hash map implemented using the chained [`HashTable`] as the underlying
/// storage.
///
/// `HashMap<K, V, S>` stores key-value pairs where keys implement `Hash + Eq`
/// and uses a configurable hasher builder `S` to hash keys. Entries live in
/// per-bucket chains; the table doubles whenever an insertion would take it
/// past its load factor threshold, up to a configured maximum capacity.
///
/// Iteration and the dump formats follow bucket-scan order, which is neither
/// insertion order nor stable across growth.
#[derive(Clone)]
pub struct HashMap<K, V, S = DefaultHashBuilder> {
    table: HashTable<(K, V)>,
    hash_builder: S,
}

/// An owned key-value pair, as returned by [`HashMap::entry_set`].
///
/// Displays as `[key, value]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MapEntry<K, V> {
    key: K,
    value: V,
}

impl<K, V> MapEntry<K, V> {
    /// Creates an entry from its parts.
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    /// The entry's key.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The entry's value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Splits the entry into its key and value.
    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K, V> Display for MapEntry<K, V>
where
    K: Display,
    V: Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.key, self.value)
    }
}

impl<K, V, S> Debug for HashMap<K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Renders `[[k1, v1][k2, v2]]` in bucket-scan order.
impl<K, V, S> Display for HashMap<K, V, S>
where
    K: Display,
    V: Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dump::write_concatenated(f, self.iter().map(|(key, value)| MapEntry { key, value }))
    }
}

impl<K, V, S> HashMap<K, V, S> {
    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no entries.
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

    /// Returns the largest number of buckets the map may grow to.
    pub fn max_capacity(&self) -> usize {
        self.table.max_capacity()
    }

    /// Returns a reference to the map's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Removes all entries from the map.
    ///
    /// This operation preserves the map's capacity.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// for i in 0..10 {
    ///     map.put(i, i).unwrap();
    /// }
    /// let capacity = map.capacity();
    /// map.clear();
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), capacity);
    /// ```
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns an iterator over the key-value pairs of the map in bucket-scan
    /// order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the keys of the map in bucket-scan order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values of the map in bucket-scan order.
    ///
    /// Unlike [`values`](HashMap::values), this borrows from the map instead of
    /// copying.
    pub fn values_iter(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Returns an iterator that removes and yields all key-value pairs from the
    /// map.
    ///
    /// After calling `drain()`, the map will be empty.
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Returns `true` if any entry holds `value`. Scans every bucket.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.put("Ohio", 11_799_448).unwrap();
    /// assert!(map.contains_value(&11_799_448));
    /// assert!(!map.contains_value(&0));
    /// ```
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.table.iter().any(|(_, v)| v == value)
    }

    /// Returns a copy of every value, in bucket-scan order.
    ///
    /// The copy is independent of the map. Values held under several keys
    /// appear once per key.
    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.table.iter().map(|(_, v)| v.clone()).collect()
    }

    /// Returns a copy of every entry, in bucket-scan order.
    ///
    /// The copy is independent of the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.put("a", 1).unwrap();
    /// let entries = map.entry_set();
    /// map.put("a", 2).unwrap();
    ///
    /// assert_eq!(entries.len(), 1);
    /// assert_eq!(*entries[0].value(), 1);
    /// ```
    pub fn entry_set(&self) -> Vec<MapEntry<K, V>>
    where
        K: Clone,
        V: Clone,
    {
        self.table
            .iter()
            .map(|(k, v)| MapEntry::new(k.clone(), v.clone()))
            .collect()
    }

    /// Renders the map as a two-column listing: a header of `key_label` and
    /// `value_label`, a dashed underline, then one line per entry with the key
    /// left-justified in a 30-character column.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.put("Guam", 159_358).unwrap();
    ///
    /// let dump = map.dump_columns("State/Territory", "Total Population");
    /// let lines: Vec<&str> = dump.lines().collect();
    /// assert_eq!(lines[0], format!("{:<30}Total Population", "State/Territory"));
    /// assert_eq!(lines[2], format!("{:<30}159358", "Guam"));
    /// ```
    pub fn dump_columns(&self, key_label: &str, value_label: &str) -> String
    where
        K: Display,
        V: Display,
    {
        dump::two_columns(key_label, value_label, self.iter())
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

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Creates a new hash map with the given hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::collections::hash_map::RandomState;
    ///
    /// use chain_hash::HashMap;
    ///
    /// let map: HashMap<i32, String, _> = HashMap::with_hasher(RandomState::new());
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 4);
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_config_and_hasher(Config::default(), hash_builder)
    }

    /// Creates a new hash map with at least `capacity` buckets and the given
    /// hasher builder.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self::with_config_and_hasher(Config::new().initial_capacity(capacity), hash_builder)
    }

    /// Creates a new hash map configured by `config` with the given hasher
    /// builder.
    pub fn with_config_and_hasher(config: Config, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_config(config),
            hash_builder,
        }
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already had this key, the value is replaced in place and the
    /// previous value is returned as `Some`. Otherwise the pair is added as a
    /// new entry and `None` is returned; the map may double and rehash first.
    ///
    /// # Errors
    ///
    /// Returns [`InsertError::CapacityExceeded`] when the key is new and the
    /// map is already at its maximum capacity. The map is left unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// assert_eq!(map.put(37, "a"), Ok(None));
    /// assert_eq!(map.put(37, "b"), Ok(Some("a")));
    /// assert_eq!(map.get(&37), Some(&"b"));
    /// ```
    pub fn put(&mut self, key: K, value: V) -> Result<Option<V>, InsertError> {
        let hash = hash_code(&self.hash_builder, &key);
        match self.table.entry(hash, |(k, _)| k == &key) {
            TableEntry::Occupied(mut entry) => {
                let old_value = core::mem::replace(&mut entry.get_mut().1, value);
                Ok(Some(old_value))
            }
            TableEntry::Vacant(entry) => {
                entry.insert((key, value))?;
                Ok(None)
            }
        }
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.put(1, "a").unwrap();
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    pub fn get(&self, key: &K) -> Option<&V> {
        let hash = hash_code(&self.hash_builder, key);
        self.table.find(hash, |(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let hash = hash_code(&self.hash_builder, key);
        self.table.find_mut(hash, |(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns `true` if the map contains a value for the specified key.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Removes a key from the map, returning the value at the key if the key
    /// was previously in the map. Removing a missing key does nothing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.put(1, "a").unwrap();
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from the map, returning the stored key and value if the
    /// key was previously in the map.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let hash = hash_code(&self.hash_builder, key);
        self.table.remove(hash, |(k, _)| k == key)
    }

    /// Gets the given key's corresponding entry in the map for in-place
    /// manipulation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashMap;
    ///
    /// let mut map: HashMap<&str, u32> = HashMap::new();
    /// for word in ["a", "b", "a"] {
    ///     *map.entry(word).or_insert(0).unwrap() += 1;
    /// }
    /// assert_eq!(map.get(&"a"), Some(&2));
    /// assert_eq!(map.get(&"b"), Some(&1));
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V> {
        let hash = hash_code(&self.hash_builder, &key);
        match self.table.entry(hash, |(k, _)| k == &key) {
            TableEntry::Occupied(entry) => Entry::Occupied(OccupiedEntry { entry }),
            TableEntry::Vacant(entry) => Entry::Vacant(VacantEntry { entry, key }),
        }
    }

    /// Returns a new set holding a copy of every key.
    ///
    /// The set has the same capacity, configuration and hasher builder as the
    /// map, and is independent of it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.put("a", 1).unwrap();
    /// map.put("b", 2).unwrap();
    ///
    /// let keys = map.key_set();
    /// map.remove(&"a");
    /// assert!(keys.contains(&"a"));
    /// assert_eq!(keys.len(), 2);
    /// ```
    pub fn key_set(&self) -> HashSet<K, S>
    where
        K: Clone,
        S: Clone,
    {
        HashSet::from_parts(
            self.table.clone_with(|(k, _)| k.clone()),
            self.hash_builder.clone(),
        )
    }
}

impl<K, V> HashMap<K, V, DefaultHashBuilder>
where
    K: Hash + Eq,
{
    /// Creates a new hash map with 4 buckets, a load factor of 0.75, and the
    /// default hasher builder.
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }

    /// Creates a new hash map with at least `capacity` buckets using the
    /// default hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashMap;
    ///
    /// let map: HashMap<i32, String> = HashMap::with_capacity(100);
    /// assert_eq!(map.capacity(), 128);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }

    /// Creates a new hash map with at least `capacity` buckets and the given
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

    /// Creates a new hash map configured by `config` using the default hasher
    /// builder.
    pub fn with_config(config: Config) -> Self {
        Self::with_config_and_hasher(config, DefaultHashBuilder::default())
    }
}

impl<K, V, S> Default for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashMap<K, V, S> {
    type IntoIter = Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A view into a single entry in the map, which may either be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashMap`].
///
/// [`entry`]: HashMap::entry
pub enum Entry<'a, K, V> {
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V>),
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V>),
}

impl<'a, K, V> Entry<'a, K, V> {
    /// Inserts a default value if the entry is vacant and returns a mutable
    /// reference.
    ///
    /// # Errors
    ///
    /// Returns [`InsertError::CapacityExceeded`] if the entry is vacant and the
    /// map cannot grow to make room.
    pub fn or_insert(self, default: V) -> Result<&'a mut V, InsertError> {
        match self {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts a value computed from a closure if the entry is vacant and
    /// returns a mutable reference.
    ///
    /// # Errors
    ///
    /// Returns [`InsertError::CapacityExceeded`] if the entry is vacant and the
    /// map cannot grow to make room. `default` is not called in that case.
    pub fn or_insert_with<F>(self, default: F) -> Result<&'a mut V, InsertError>
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(VacantEntry { entry, key }) => TableEntry::Vacant(entry)
                .or_insert_with(|| (key, default()))
                .map(|(_, value)| value),
        }
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts.
    pub fn and_modify<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Returns a reference to this entry's key.
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }
}

impl<'a, K, V> Entry<'a, K, V>
where
    V: Default,
{
    /// Inserts the default value if the entry is vacant and returns a mutable
    /// reference.
    ///
    /// # Errors
    ///
    /// Returns [`InsertError::CapacityExceeded`] if the entry is vacant and the
    /// map cannot grow to make room.
    pub fn or_default(self) -> Result<&'a mut V, InsertError> {
        self.or_insert_with(Default::default)
    }
}

/// A view into a vacant entry in the map.
pub struct VacantEntry<'a, K, V> {
    entry: crate::hash_table::VacantEntry<'a, (K, V)>,
    key: K,
}

impl<'a, K, V> VacantEntry<'a, K, V> {
    /// Gets a reference to the key that would be used when inserting a value.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Take ownership of the key.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Inserts the value into the map and returns a mutable reference to it.
    ///
    /// # Errors
    ///
    /// Returns [`InsertError::CapacityExceeded`] if the map cannot grow to make
    /// room. The map is left unchanged.
    pub fn insert(self, value: V) -> Result<&'a mut V, InsertError> {
        Ok(&mut self.entry.insert((self.key, value))?.1)
    }
}

/// A view into an occupied entry in the map.
pub struct OccupiedEntry<'a, K, V> {
    entry: crate::hash_table::OccupiedEntry<'a, (K, V)>,
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    /// Gets a reference to the key in the entry.
    pub fn key(&self) -> &K {
        &self.entry.get().0
    }

    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        &self.entry.get().1
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.entry.get_mut().1
    }

    /// Converts the entry into a mutable reference to the value.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.entry.into_mut().1
    }

    /// Inserts a value into the entry and returns the old value.
    pub fn insert(&mut self, value: V) -> V {
        core::mem::replace(&mut self.entry.get_mut().1, value)
    }

    /// Removes the entry from the map and returns the value.
    pub fn remove(self) -> V {
        self.entry.remove().1
    }

    /// Removes the entry from the map and returns the key and value.
    pub fn remove_entry(self) -> (K, V) {
        self.entry.remove()
    }
}

/// An iterator over the key-value pairs of a `HashMap`.
pub struct Iter<'a, K, V> {
    inner: crate::hash_table::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// An iterator over the keys of a `HashMap`.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }
}

/// An iterator over the values of a `HashMap`.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }
}

/// A draining iterator over the key-value pairs of a `HashMap`.
pub struct Drain<'a, K, V> {
    inner: crate::hash_table::Drain<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Drain<'a, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

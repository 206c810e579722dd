use crate::hash::next_power_of_two;

/// The number of buckets a table starts with unless told otherwise.
pub const DEFAULT_INITIAL_CAPACITY: usize = 4;

/// The hard ceiling on the number of buckets in any table.
pub const MAXIMUM_CAPACITY: usize = 1 << 30;

/// The fraction of capacity that may be filled before the table doubles.
pub const DEFAULT_LOAD_FACTOR: f32 = 0.75;

/// Sizing and growth settings for a [`HashMap`](crate::HashMap),
/// [`HashSet`](crate::HashSet) or [`HashTable`](crate::HashTable).
///
/// # Examples
///
/// ```rust
/// use chain_hash::Config;
///
/// let config = Config::new().initial_capacity(10).load_factor(0.5).max_capacity(100);
/// assert_eq!(config.get_initial_capacity(), 16);
/// assert_eq!(config.get_load_factor(), 0.5);
/// assert_eq!(config.get_max_capacity(), 128);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    initial_capacity: usize,
    load_factor: f32,
    max_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
            max_capacity: MAXIMUM_CAPACITY,
        }
    }
}

impl Config {
    /// Creates a config with the default capacity of 4 buckets, load factor
    /// 0.75 and maximum capacity 2^30.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of buckets to start with.
    ///
    /// The value is rounded up to a power of two when read, and clamped to the
    /// maximum capacity.
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Sets the load factor threshold.
    ///
    /// # Panics
    ///
    /// Panics if `load_factor` is not in `(0, 1]`.
    pub fn load_factor(mut self, load_factor: f32) -> Self {
        assert!(
            load_factor > 0.0 && load_factor <= 1.0,
            "load factor must be in (0, 1], got {load_factor}"
        );
        self.load_factor = load_factor;
        self
    }

    /// Sets the maximum number of buckets the table may grow to.
    ///
    /// Rounded up to a power of two and clamped to [`MAXIMUM_CAPACITY`].
    pub fn max_capacity(mut self, capacity: usize) -> Self {
        self.max_capacity = next_power_of_two(capacity.min(MAXIMUM_CAPACITY));
        self
    }

    /// The number of buckets a table built from this config starts with.
    pub fn get_initial_capacity(&self) -> usize {
        next_power_of_two(self.initial_capacity.min(self.max_capacity))
    }

    /// The load factor threshold.
    pub fn get_load_factor(&self) -> f32 {
        self.load_factor
    }

    /// The maximum number of buckets.
    pub fn get_max_capacity(&self) -> usize {
        self.max_capacity
    }

    /// Returns `true` if holding `len` items in `capacity` buckets would go
    /// over the load factor threshold.
    #[inline]
    pub(crate) fn exceeds_threshold(&self, len: usize, capacity: usize) -> bool {
        len as f64 > capacity as f64 * f64::from(self.load_factor)
    }
}

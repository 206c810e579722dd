use core::hash::BuildHasher;
use core::hash::Hash;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hasher builder used when a container is created without an
        /// explicit one.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// The hasher builder used when a container is created without an
        /// explicit one.
        pub type DefaultHashBuilder = std::hash::RandomState;
    } else {
        /// The hasher builder used when a container is created without an
        /// explicit one.
        ///
        /// Without `foldhash` or `std` there is no source of randomness, so this
        /// falls back to unkeyed 64-bit FNV-1a.
        pub type DefaultHashBuilder = core::hash::BuildHasherDefault<FnvHasher>;

        /// Unkeyed 64-bit FNV-1a, only used when no better hasher is enabled.
        #[derive(Clone, Copy)]
        pub struct FnvHasher(u64);

        impl Default for FnvHasher {
            fn default() -> Self {
                FnvHasher(0xcbf2_9ce4_8422_2325)
            }
        }

        impl core::hash::Hasher for FnvHasher {
            fn finish(&self) -> u64 {
                self.0
            }

            fn write(&mut self, bytes: &[u8]) {
                for byte in bytes {
                    self.0 ^= u64::from(*byte);
                    self.0 = self.0.wrapping_mul(0x0100_0000_01b3);
                }
            }
        }
    }
}

/// Hashes `value` with `builder` and folds the 64-bit result into the 32-bit
/// hash code the bucket table indexes with.
///
/// # Examples
///
/// ```rust
/// # use core::hash::BuildHasherDefault;
/// # use std::collections::hash_map::DefaultHasher;
/// #
/// use chain_hash::hash::hash_code;
///
/// let builder = BuildHasherDefault::<DefaultHasher>::default();
/// assert_eq!(hash_code(&builder, "key"), hash_code(&builder, "key"));
/// ```
#[inline]
pub fn hash_code<Q, S>(builder: &S, value: &Q) -> u32
where
    Q: Hash + ?Sized,
    S: BuildHasher,
{
    let hash = builder.hash_one(value);
    (hash ^ (hash >> 32)) as u32
}

/// Folds the high bits of a hash code into its low bits.
///
/// Only the low bits survive masking with `capacity - 1`, so hash functions
/// that vary mostly in their upper bits would otherwise pile into a handful of
/// buckets.
///
/// # Examples
///
/// ```rust
/// use chain_hash::hash::mix;
///
/// // Small codes are left alone.
/// assert_eq!(mix(3), 3);
/// // Codes that differ only above bit 20 land in different low bits.
/// assert_ne!(mix(1 << 20) & 0xF, mix(1 << 21) & 0xF);
/// ```
#[inline]
pub fn mix(mut h: u32) -> u32 {
    h ^= (h >> 20) ^ (h >> 12);
    h ^ (h >> 7) ^ (h >> 4)
}

/// Maps a hash code to a bucket index for a table of `capacity` buckets.
///
/// `capacity` must be a power of two.
///
/// # Examples
///
/// ```rust
/// use chain_hash::hash::index;
///
/// assert_eq!(index(5, 4), 1);
/// assert!(index(0xDEAD_BEEF, 8) < 8);
/// ```
#[inline]
pub fn index(hash: u32, capacity: usize) -> usize {
    debug_assert!(capacity.is_power_of_two());
    mix(hash) as usize & (capacity - 1)
}

/// Returns the smallest power of two greater than or equal to `n`, counting up
/// from 1.
///
/// # Examples
///
/// ```rust
/// use chain_hash::hash::next_power_of_two;
///
/// assert_eq!(next_power_of_two(0), 1);
/// assert_eq!(next_power_of_two(1), 1);
/// assert_eq!(next_power_of_two(5), 8);
/// assert_eq!(next_power_of_two(64), 64);
/// ```
#[inline]
pub fn next_power_of_two(n: usize) -> usize {
    let mut capacity = 1;
    while capacity < n {
        capacity <<= 1;
    }
    capacity
}

#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// Hash folding, bit mixing and power-of-two index derivation shared by every
/// container in this crate.
pub mod hash;

/// Construction-time sizing and growth settings.
pub mod config;

mod dump;
mod error;

/// A HashMap implementation over the chained bucket table.
///
/// This module provides a `HashMap` that wraps the `HashTable` and provides
/// a key-value map interface with configurable hashers.
pub mod hash_map;

/// The separate-chaining bucket table both containers are built on.
pub mod hash_table;

/// A hash set implementation over the chained bucket table.
///
/// This module provides a `HashSet` that wraps the `HashTable`, together with
/// the snapshot iterator returned by [`HashSet::iterator`].
pub mod hash_set;

pub use config::Config;
pub use error::InsertError;
pub use hash::DefaultHashBuilder;
pub use hash_map::Entry;
pub use hash_map::HashMap;
pub use hash_map::MapEntry;
pub use hash_set::HashSet;
pub use hash_set::SnapshotIter;
pub use hash_table::HashTable;

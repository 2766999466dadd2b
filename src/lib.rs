#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// Errors reported by fallible table operations.
pub mod error;

pub mod hash;

/// A string-keyed hash table using linear probing.
///
/// This module provides the [`HashTable`] along with its entry API and
/// iterators.
pub mod hash_table;

pub use error::TryReserveError;
pub use hash_table::Entry;
pub use hash_table::HashTable;

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::mem;
use core::ops::Index;

use crate::error::TryReserveError;
use crate::hash::bucket_index;
use crate::hash::hash_str;

cfg_if::cfg_if! {
    if #[cfg(feature = "load-factor-fifty")] {
        /// Numerator of the maximum ratio of entries to slots.
        pub const LOAD_FACTOR_NUMERATOR: usize = 1;
        /// Denominator of the maximum ratio of entries to slots.
        pub const LOAD_FACTOR_DENOMINATOR: usize = 2;
    } else if #[cfg(feature = "load-factor-seventy-five")] {
        /// Numerator of the maximum ratio of entries to slots.
        pub const LOAD_FACTOR_NUMERATOR: usize = 3;
        /// Denominator of the maximum ratio of entries to slots.
        pub const LOAD_FACTOR_DENOMINATOR: usize = 4;
    } else if #[cfg(feature = "load-factor-eighty-seven-point-five")] {
        /// Numerator of the maximum ratio of entries to slots.
        pub const LOAD_FACTOR_NUMERATOR: usize = 7;
        /// Denominator of the maximum ratio of entries to slots.
        pub const LOAD_FACTOR_DENOMINATOR: usize = 8;
    } else {
        /// Numerator of the maximum ratio of entries to slots.
        pub const LOAD_FACTOR_NUMERATOR: usize = 3;
        /// Denominator of the maximum ratio of entries to slots.
        pub const LOAD_FACTOR_DENOMINATOR: usize = 4;
    }
}

/// Number of slots a table starts with when no capacity is requested.
pub const DEFAULT_CAPACITY: usize = 16;

/// Returns `true` if `populated / capacity` is above the load factor.
#[inline(always)]
fn exceeds_load(populated: usize, capacity: usize) -> bool {
    populated as u128 * LOAD_FACTOR_DENOMINATOR as u128
        > capacity as u128 * LOAD_FACTOR_NUMERATOR as u128
}

#[cold]
#[inline(never)]
fn capacity_overflow() -> ! {
    panic!("capacity overflow")
}

#[derive(Clone)]
struct Bucket<V> {
    hash: i32,
    key: String,
    value: V,
}

type Slot<V> = Option<Bucket<V>>;

fn empty_slots<V>(capacity: usize) -> Vec<Slot<V>> {
    let mut slots = Vec::with_capacity(capacity);
    slots.resize_with(capacity, || None);
    slots
}

fn try_empty_slots<V>(capacity: usize) -> Result<Vec<Slot<V>>, TryReserveError> {
    match capacity.checked_mul(mem::size_of::<Slot<V>>()) {
        Some(bytes) if bytes <= isize::MAX as usize => {}
        _ => return Err(TryReserveError::CapacityOverflow),
    }

    let mut slots = Vec::new();
    slots
        .try_reserve_exact(capacity)
        .map_err(|_| TryReserveError::AllocError { slots: capacity })?;
    slots.resize_with(capacity, || None);
    Ok(slots)
}

/// A string-keyed hash table using open addressing with linear probing.
///
/// Keys are placed by the 32-bit polynomial hash in [`crate::hash`]. A key
/// whose home bucket is taken is stored in the next free slot after it,
/// wrapping around the end of the slot array. Removal refills the vacated
/// slot by shifting later members of the same cluster back, so lookups never
/// have to step over tombstones and every probe stops at the first empty
/// slot.
///
/// The slot count is always a power of two. It doubles whenever an insertion
/// pushes the ratio of entries to slots above
/// `LOAD_FACTOR_NUMERATOR / LOAD_FACTOR_DENOMINATOR` (3/4 by default).
///
/// ## Example
///
/// ```rust
/// use strtab::HashTable;
///
/// let mut table = HashTable::new();
/// table.set("a", 4);
/// assert_eq!(table.get("a"), Some(&4));
///
/// table.set("a", 3);
/// table.set("b", 3);
/// assert_eq!(table.get("a"), Some(&3));
/// assert_eq!(table.len(), 2);
/// assert!(!table.has("c"));
/// ```
#[derive(Clone)]
pub struct HashTable<V> {
    slots: Vec<Slot<V>>,
    populated: usize,
    initial_capacity: usize,
}

impl<V> Debug for HashTable<V>
where
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> PartialEq for HashTable<V>
where
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|(key, value)| other.get(key) == Some(value))
    }
}

impl<V> Eq for HashTable<V> where V: Eq {}

impl<V> HashTable<V> {
    /// Creates an empty table with [`DEFAULT_CAPACITY`] slots.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty table with at least `capacity` slots.
    ///
    /// The slot count is rounded up to a power of two. A `capacity` of zero
    /// falls back to [`DEFAULT_CAPACITY`]. Whatever capacity results is also
    /// the one [`clear`] returns to.
    ///
    /// [`clear`]: HashTable::clear
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use strtab::HashTable;
    /// #
    /// let table: HashTable<u32> = HashTable::with_capacity(100);
    /// assert_eq!(table.capacity(), 128);
    ///
    /// let table: HashTable<u32> = HashTable::with_capacity(0);
    /// assert_eq!(table.capacity(), 16);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = if capacity == 0 {
            DEFAULT_CAPACITY
        } else {
            capacity
                .checked_next_power_of_two()
                .unwrap_or_else(|| capacity_overflow())
        };

        Self {
            slots: empty_slots(capacity),
            populated: 0,
            initial_capacity: capacity,
        }
    }

    /// Returns the number of slots in the table.
    ///
    /// This is the bucket count keys are indexed against, not the number of
    /// entries the table can take before growing.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of entries in the table.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table contains no entries.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Inserts or updates the value for `key`.
    ///
    /// Grows the table if the new entry pushes it past the load factor.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use strtab::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.set("key", 1);
    /// table.set("key", 2);
    /// assert_eq!(table.get("key"), Some(&2));
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn set(&mut self, key: impl Into<String>, value: V) {
        self.insert(key, value);
    }

    /// Inserts or updates the value for `key`, returning the value it
    /// replaced.
    ///
    /// On update the stored key is kept and the passed one is dropped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use strtab::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// assert_eq!(table.insert("key", 1), None);
    /// assert_eq!(table.insert("key", 2), Some(1));
    /// ```
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        match self.entry(key) {
            Entry::Occupied(mut entry) => Some(entry.insert(value)),
            Entry::Vacant(entry) => {
                entry.insert(value);
                None
            }
        }
    }

    /// Returns the value stored for `key`, if any.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use strtab::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.set("present", 1);
    /// assert_eq!(table.get("present"), Some(&1));
    /// assert_eq!(table.get("absent"), None);
    /// ```
    #[inline]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.find(key).map(|index| &self.bucket(index).value)
    }

    /// Returns a mutable reference to the value stored for `key`, if any.
    #[inline]
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let index = self.find(key)?;
        Some(&mut self.bucket_mut(index).value)
    }

    /// Returns the stored key and value for `key`, if any.
    pub fn get_key_value(&self, key: &str) -> Option<(&str, &V)> {
        self.find(key).map(|index| {
            let bucket = self.bucket(index);
            (bucket.key.as_str(), &bucket.value)
        })
    }

    /// Returns `true` if the table holds a value for `key`.
    #[inline]
    pub fn has(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Removes `key` from the table, returning whether it was present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use strtab::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.set("key", 1);
    /// assert!(table.remove("key"));
    /// assert!(!table.remove("key"));
    /// assert!(table.is_empty());
    /// ```
    pub fn remove(&mut self, key: &str) -> bool {
        self.remove_entry(key).is_some()
    }

    /// Removes `key` from the table, returning the stored key and value.
    pub fn remove_entry(&mut self, key: &str) -> Option<(String, V)> {
        let index = self.find(key)?;
        Some(self.take(index))
    }

    /// Removes every entry and returns the table to its initial capacity.
    ///
    /// Afterwards the table is indistinguishable from one freshly built with
    /// the same capacity argument.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use strtab::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// for i in 0..100 {
    ///     table.set(i.to_string(), i);
    /// }
    /// assert!(table.capacity() > 16);
    ///
    /// table.clear();
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), 16);
    /// ```
    pub fn clear(&mut self) {
        log::trace!(
            "clearing {} entries, capacity {} -> {}",
            self.populated,
            self.slots.len(),
            self.initial_capacity
        );
        self.slots = empty_slots(self.initial_capacity);
        self.populated = 0;
    }

    /// Returns an iterator over the keys in slot order.
    ///
    /// [`values`] and [`entries`] walk the same order, so the `i`th item of
    /// each refers to the same entry as long as the table is not modified in
    /// between.
    ///
    /// [`values`]: HashTable::values
    /// [`entries`]: HashTable::entries
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use strtab::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.set("a", 1);
    /// table.set("b", 2);
    ///
    /// let keys: Vec<&str> = table.keys().collect();
    /// let values: Vec<&i32> = table.values().collect();
    /// let entries: Vec<(&str, &i32)> = table.entries().collect();
    /// for i in 0..entries.len() {
    ///     assert_eq!(entries[i], (keys[i], values[i]));
    /// }
    /// ```
    pub fn keys(&self) -> Keys<'_, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values in slot order.
    pub fn values(&self) -> Values<'_, V> {
        Values { inner: self.iter() }
    }

    /// Returns an iterator over mutable references to the values in slot
    /// order.
    pub fn values_mut(&mut self) -> ValuesMut<'_, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Returns an iterator over `(key, value)` pairs in slot order.
    pub fn entries(&self) -> Iter<'_, V> {
        self.iter()
    }

    /// Returns an iterator over `(key, value)` pairs in slot order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.populated,
        }
    }

    /// Returns an iterator over `(key, &mut value)` pairs in slot order.
    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            slots: self.slots.iter_mut(),
            remaining: self.populated,
        }
    }

    /// Removes and yields every entry, keeping the current capacity.
    ///
    /// The table is empty as soon as this returns. Entries not consumed before the iterator is dropped are dropped with
    /// it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use strtab::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.set("a", 1);
    /// table.set("b", 2);
    ///
    /// let mut drained: Vec<(String, i32)> = table.drain().collect();
    /// drained.sort();
    /// assert_eq!(drained, [("a".to_string(), 1), ("b".to_string(), 2)]);
    /// assert!(table.is_empty());
    /// ```
    pub fn drain(&mut self) -> Drain<'_, V> {
        let capacity = self.slots.len();
        let slots = mem::replace(&mut self.slots, empty_slots(capacity));
        let remaining = mem::take(&mut self.populated);
        Drain {
            inner: IntoIter {
                slots: slots.into_iter(),
                remaining,
            },
            marker: PhantomData,
        }
    }

    /// Consumes the table, returning an iterator over its keys.
    pub fn into_keys(self) -> IntoKeys<V> {
        IntoKeys {
            inner: self.into_iter(),
        }
    }

    /// Consumes the table, returning an iterator over its values.
    pub fn into_values(self) -> IntoValues<V> {
        IntoValues {
            inner: self.into_iter(),
        }
    }

    /// Gets the entry for `key` for in-place insertion or modification.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use strtab::HashTable;
    /// #
    /// let mut counts = HashTable::new();
    /// for word in ["a", "b", "a"] {
    ///     *counts.entry(word).or_insert(0) += 1;
    /// }
    /// assert_eq!(counts.get("a"), Some(&2));
    /// assert_eq!(counts.get("b"), Some(&1));
    /// ```
    pub fn entry(&mut self, key: impl Into<String>) -> Entry<'_, V> {
        let key = key.into();
        let hash = hash_str(&key);
        match self.probe(hash, &key) {
            Ok(index) => Entry::Occupied(OccupiedEntry { table: self, index }),
            Err(index) => Entry::Vacant(VacantEntry {
                table: self,
                hash,
                key,
                index,
            }),
        }
    }

    /// Grows the table so that `additional` more entries fit without another
    /// resize.
    ///
    /// # Panics
    ///
    /// Panics if the required slot count overflows `usize`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use strtab::HashTable;
    /// #
    /// let mut table: HashTable<u32> = HashTable::new();
    /// table.reserve(100);
    /// let capacity = table.capacity();
    /// for i in 0..100 {
    ///     table.set(i.to_string(), i);
    /// }
    /// assert_eq!(table.capacity(), capacity);
    /// ```
    pub fn reserve(&mut self, additional: usize) {
        let capacity = self
            .populated
            .checked_add(additional)
            .and_then(|required| self.grown_capacity(required).ok())
            .unwrap_or_else(|| capacity_overflow());

        if capacity > self.slots.len() {
            log::debug!(
                "reserving {additional} entries, capacity {} -> {capacity}",
                self.slots.len()
            );
            self.rehash(empty_slots(capacity), None);
        }
    }

    /// Fallible version of [`reserve`].
    ///
    /// The table is left untouched when an error is returned.
    ///
    /// [`reserve`]: HashTable::reserve
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use strtab::HashTable;
    /// # use strtab::TryReserveError;
    /// #
    /// let mut table: HashTable<u32> = HashTable::new();
    /// assert_eq!(table.try_reserve(10), Ok(()));
    /// assert_eq!(
    ///     table.try_reserve(usize::MAX),
    ///     Err(TryReserveError::CapacityOverflow)
    /// );
    /// ```
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        let required = self
            .populated
            .checked_add(additional)
            .ok_or(TryReserveError::CapacityOverflow)?;
        let capacity = self.grown_capacity(required)?;

        if capacity > self.slots.len() {
            let slots = try_empty_slots(capacity)?;
            log::debug!(
                "reserving {additional} entries, capacity {} -> {capacity}",
                self.slots.len()
            );
            self.rehash(slots, None);
        }
        Ok(())
    }

    /// Shrinks the slot array as far as the load factor allows, but never
    /// below the initial capacity.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use strtab::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// for i in 0..100 {
    ///     table.set(i.to_string(), i);
    /// }
    /// for i in 2..100 {
    ///     table.remove(&i.to_string());
    /// }
    ///
    /// table.shrink_to_fit();
    /// assert_eq!(table.capacity(), 16);
    /// assert_eq!(table.get("1"), Some(&1));
    /// ```
    pub fn shrink_to_fit(&mut self) {
        let mut capacity = self.initial_capacity;
        while exceeds_load(self.populated, capacity) {
            capacity *= 2;
        }

        if capacity < self.slots.len() {
            log::trace!("shrinking capacity {} -> {capacity}", self.slots.len());
            self.rehash(empty_slots(capacity), None);
        }
    }

    /// Smallest doubling of the current capacity that holds `required`
    /// entries within the load factor.
    fn grown_capacity(&self, required: usize) -> Result<usize, TryReserveError> {
        let mut capacity = self.slots.len();
        while exceeds_load(required, capacity) {
            capacity = capacity
                .checked_mul(2)
                .ok_or(TryReserveError::CapacityOverflow)?;
        }
        Ok(capacity)
    }

    #[inline(always)]
    fn mask(&self) -> usize {
        self.slots.len() - 1
    }

    /// Walks the probe sequence for `key`.
    ///
    /// Returns `Ok` with the slot holding `key`, or `Err` with the first empty
    /// slot, which is where `key` belongs. Terminates because the load factor
    /// keeps at least one slot empty.
    #[inline]
    fn probe(&self, hash: i32, key: &str) -> Result<usize, usize> {
        let mask = self.mask();
        let mut index = bucket_index(hash, self.slots.len());
        loop {
            match &self.slots[index] {
                None => return Err(index),
                Some(bucket) if bucket.hash == hash && bucket.key == key => return Ok(index),
                Some(_) => index = (index + 1) & mask,
            }
        }
    }

    #[inline]
    fn find(&self, key: &str) -> Option<usize> {
        if self.populated == 0 {
            return None;
        }
        self.probe(hash_str(key), key).ok()
    }

    /// First empty slot on the probe sequence of `hash`. Only valid for keys
    /// known to be absent.
    #[inline]
    fn vacant_slot(&self, hash: i32) -> usize {
        let mask = self.mask();
        let mut index = bucket_index(hash, self.slots.len());
        while self.slots[index].is_some() {
            index = (index + 1) & mask;
        }
        index
    }

    #[inline(always)]
    fn bucket(&self, index: usize) -> &Bucket<V> {
        match &self.slots[index] {
            Some(bucket) => bucket,
            None => unreachable!("slot {index} is vacant"),
        }
    }

    #[inline(always)]
    fn bucket_mut(&mut self, index: usize) -> &mut Bucket<V> {
        match &mut self.slots[index] {
            Some(bucket) => bucket,
            None => unreachable!("slot {index} is vacant"),
        }
    }

    /// Stores `bucket` in the empty slot `index`, growing the table if that
    /// crosses the load factor. Returns the slot the bucket ends up in.
    fn occupy(&mut self, index: usize, bucket: Bucket<V>) -> usize {
        debug_assert!(self.slots[index].is_none());
        self.slots[index] = Some(bucket);
        self.populated += 1;

        if !exceeds_load(self.populated, self.slots.len()) {
            return index;
        }

        match self.resize(Some(index)) {
            Some(index) => index,
            None => unreachable!("slot {index} lost during resize"),
        }
    }

    /// Doubles the slot array and reinserts every entry.
    ///
    /// Returns where the entry previously at `tracked` now lives.
    fn resize(&mut self, tracked: Option<usize>) -> Option<usize> {
        let old_capacity = self.slots.len();
        let new_capacity = old_capacity
            .checked_mul(2)
            .unwrap_or_else(|| capacity_overflow());

        log::debug!(
            "resizing table with {} entries, capacity {old_capacity} -> {new_capacity}",
            self.populated
        );
        self.rehash(empty_slots(new_capacity), tracked)
    }

    fn rehash(&mut self, slots: Vec<Slot<V>>, tracked: Option<usize>) -> Option<usize> {
        debug_assert!(slots.len().is_power_of_two());
        debug_assert!(!exceeds_load(self.populated, slots.len()));

        let old_slots = mem::replace(&mut self.slots, slots);
        let mut relocated = None;
        for (old_index, slot) in old_slots.into_iter().enumerate() {
            if let Some(bucket) = slot {
                let index = self.vacant_slot(bucket.hash);
                if tracked == Some(old_index) {
                    relocated = Some(index);
                }
                self.slots[index] = Some(bucket);
            }
        }
        relocated
    }

    /// Empties the occupied slot `index` and closes the gap it leaves in its
    /// cluster.
    fn take(&mut self, index: usize) -> (String, V) {
        let bucket = match self.slots[index].take() {
            Some(bucket) => bucket,
            None => unreachable!("slot {index} is vacant"),
        };
        self.populated -= 1;
        self.backward_shift(index);
        (bucket.key, bucket.value)
    }

    /// Refills the empty slot `hole` from later members of its cluster.
    ///
    /// An entry at `probe` may move into the hole only if the hole lies on its
    /// probe path, i.e. between its home bucket and `probe`. Moving it leaves
    /// a new hole at `probe`, and the scan continues until it reaches an empty
    /// slot.
    fn backward_shift(&mut self, mut hole: usize) {
        let mask = self.mask();
        let mut probe = (hole + 1) & mask;

        while let Some(bucket) = &self.slots[probe] {
            let home = bucket_index(bucket.hash, self.slots.len());
            let displacement = probe.wrapping_sub(home) & mask;
            let gap = probe.wrapping_sub(hole) & mask;
            if displacement >= gap {
                self.slots.swap(hole, probe);
                hole = probe;
            }
            probe = (probe + 1) & mask;
        }
    }
}

#[cfg(any(test, feature = "stats"))]
impl<V> HashTable<V> {
    /// Counts entries by their distance from their home bucket.
    ///
    /// Bin `d` of the result holds the number of entries stored `d` slots
    /// past their home bucket. An empty table yields no bins.
    pub fn probe_histogram(&self) -> ProbeHistogram {
        let mask = self.mask();
        let mut bins: Vec<usize> = Vec::new();
        for (index, slot) in self.slots.iter().enumerate() {
            if let Some(bucket) = slot {
                let home = bucket_index(bucket.hash, self.slots.len());
                let distance = index.wrapping_sub(home) & mask;
                if bins.len() <= distance {
                    bins.resize(distance + 1, 0);
                }
                bins[distance] += 1;
            }
        }
        ProbeHistogram { bins }
    }

    /// Returns utilization statistics for the table.
    pub fn debug_stats(&self) -> DebugStats {
        let histogram = self.probe_histogram();
        let total_probe: usize = histogram
            .bins
            .iter()
            .enumerate()
            .map(|(distance, count)| distance * count)
            .sum();

        DebugStats {
            populated: self.populated,
            capacity: self.slots.len(),
            max_load: (self.slots.len() as u128 * LOAD_FACTOR_NUMERATOR as u128
                / LOAD_FACTOR_DENOMINATOR as u128) as usize,
            load_factor: self.populated as f64 / self.slots.len() as f64,
            longest_probe: histogram.bins.len().saturating_sub(1),
            mean_probe: if self.populated == 0 {
                0.0
            } else {
                total_probe as f64 / self.populated as f64
            },
            slot_bytes: self.slots.len() * mem::size_of::<Slot<V>>(),
        }
    }
}

/// Probe distances of the entries in a [`HashTable`].
///
/// Returned by [`HashTable::probe_histogram`].
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeHistogram {
    /// `bins[d]` is the number of entries `d` slots past their home bucket.
    pub bins: Vec<usize>,
}

#[cfg(any(test, feature = "stats"))]
impl ProbeHistogram {
    /// Pretty-prints the histogram as a horizontal bar chart.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let max = self.bins.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("probe histogram: empty");
            return;
        }

        let max_bar = 60usize;
        let total: usize = self.bins.iter().sum();
        println!("probe histogram ({total} entries):");
        for (distance, &count) in self.bins.iter().enumerate() {
            let width = (count * max_bar).div_ceil(max);
            println!("{distance:>3} | {} ({count})", "█".repeat(width));
        }
    }
}

/// Statistics for hash table analysis.
///
/// Returned by [`HashTable::debug_stats`].
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of entries currently in the table
    pub populated: usize,
    /// Number of slots
    pub capacity: usize,
    /// Number of entries the table holds before it grows
    pub max_load: usize,
    /// Entries per slot
    pub load_factor: f64,
    /// Largest distance of an entry from its home bucket
    pub longest_probe: usize,
    /// Average distance of an entry from its home bucket
    pub mean_probe: f64,
    /// Bytes allocated for the slot array, not counting key strings
    pub slot_bytes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} slots ({:.2}% load factor, grows past {})",
            self.populated,
            self.capacity,
            self.load_factor * 100.0,
            self.max_load
        );
        println!(
            "Probe length: {:.2} mean, {} max",
            self.mean_probe, self.longest_probe
        );
        println!("Slot array: {} bytes", self.slot_bytes);
    }
}

impl<V> Index<&str> for HashTable<V> {
    type Output = V;

    /// Returns the value stored for `key`.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not present.
    fn index(&self, key: &str) -> &V {
        match self.get(key) {
            Some(value) => value,
            None => panic!("key {key:?} not present in table"),
        }
    }
}

impl<K, V> Extend<(K, V)> for HashTable<V>
where
    K: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for HashTable<V>
where
    K: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

impl<V> IntoIterator for HashTable<V> {
    type IntoIter = IntoIter<V>;
    type Item = (String, V);

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            remaining: self.populated,
            slots: self.slots.into_iter(),
        }
    }
}

impl<'a, V> IntoIterator for &'a HashTable<V> {
    type IntoIter = Iter<'a, V>;
    type Item = (&'a str, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, V> IntoIterator for &'a mut HashTable<V> {
    type IntoIter = IterMut<'a, V>;
    type Item = (&'a str, &'a mut V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// A view into a single entry in the table, which may be vacant or occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
pub enum Entry<'a, V> {
    /// An entry holding a value.
    Occupied(OccupiedEntry<'a, V>),
    /// An entry with no value yet.
    Vacant(VacantEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Returns the entry's key.
    pub fn key(&self) -> &str {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }

    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns a
    /// mutable reference to the value.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Inserts `V::default()` if the entry is vacant and returns a mutable
    /// reference to the value.
    pub fn or_default(self) -> &'a mut V
    where
        V: Default,
    {
        self.or_insert_with(V::default)
    }

    /// Calls `f` on the value if the entry is occupied.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use strtab::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry("a").and_modify(|v| *v += 1).or_insert(1);
    /// table.entry("a").and_modify(|v| *v += 1).or_insert(1);
    /// assert_eq!(table["a"], 2);
    /// ```
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

/// A view into an occupied entry in a [`HashTable`].
pub struct OccupiedEntry<'a, V> {
    table: &'a mut HashTable<V>,
    index: usize,
}

impl<'a, V> OccupiedEntry<'a, V> {
    /// Returns the stored key.
    pub fn key(&self) -> &str {
        &self.table.bucket(self.index).key
    }

    /// Returns a reference to the value.
    pub fn get(&self) -> &V {
        &self.table.bucket(self.index).value
    }

    /// Returns a mutable reference to the value.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.table.bucket_mut(self.index).value
    }

    /// Converts the entry into a mutable reference to the value, bound to the
    /// table's lifetime.
    pub fn into_mut(self) -> &'a mut V {
        let OccupiedEntry { table, index } = self;
        &mut table.bucket_mut(index).value
    }

    /// Replaces the value, returning the old one.
    pub fn insert(&mut self, value: V) -> V {
        mem::replace(self.get_mut(), value)
    }

    /// Removes the entry from the table, returning its value.
    pub fn remove(self) -> V {
        self.remove_entry().1
    }

    /// Removes the entry from the table, returning its key and value.
    pub fn remove_entry(self) -> (String, V) {
        self.table.take(self.index)
    }
}

/// A view into a vacant entry in a [`HashTable`].
pub struct VacantEntry<'a, V> {
    table: &'a mut HashTable<V>,
    hash: i32,
    key: String,
    index: usize,
}

impl<'a, V> VacantEntry<'a, V> {
    /// Returns the key that would be inserted.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Takes back ownership of the key.
    pub fn into_key(self) -> String {
        self.key
    }

    /// Inserts `value` under the entry's key, growing the table if needed,
    /// and returns a mutable reference to it.
    pub fn insert(self, value: V) -> &'a mut V {
        let VacantEntry {
            table,
            hash,
            key,
            index,
        } = self;
        let index = table.occupy(index, Bucket { hash, key, value });
        &mut table.bucket_mut(index).value
    }
}

/// An iterator over the entries of a [`HashTable`], in slot order.
///
/// This struct is created by the [`iter`] and [`entries`] methods on
/// [`HashTable`].
///
/// [`iter`]: HashTable::iter
/// [`entries`]: HashTable::entries
pub struct Iter<'a, V> {
    slots: core::slice::Iter<'a, Slot<V>>,
    remaining: usize,
}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Iter {
            slots: self.slots.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let bucket = self.slots.find_map(Option::as_ref)?;
        self.remaining -= 1;
        Some((bucket.key.as_str(), &bucket.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> FusedIterator for Iter<'_, V> {}

impl<V: Debug> Debug for Iter<'_, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// A mutable iterator over the entries of a [`HashTable`], in slot order.
pub struct IterMut<'a, V> {
    slots: core::slice::IterMut<'a, Slot<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = (&'a str, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let Bucket { key, value, .. } = self.slots.find_map(Option::as_mut)?;
        self.remaining -= 1;
        Some((key.as_str(), value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IterMut<'_, V> {}

impl<V> FusedIterator for IterMut<'_, V> {}

impl<V: Debug> Debug for IterMut<'_, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(
                self.slots
                    .as_slice()
                    .iter()
                    .flatten()
                    .map(|bucket| (&bucket.key, &bucket.value)),
            )
            .finish()
    }
}

/// An iterator over the keys of a [`HashTable`], in slot order.
pub struct Keys<'a, V> {
    inner: Iter<'a, V>,
}

impl<V> Clone for Keys<'_, V> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, V> Iterator for Keys<'a, V> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Keys<'_, V> {}

impl<V> FusedIterator for Keys<'_, V> {}

impl<V> Debug for Keys<'_, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An iterator over the values of a [`HashTable`], in slot order.
pub struct Values<'a, V> {
    inner: Iter<'a, V>,
}

impl<V> Clone for Values<'_, V> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Values<'_, V> {}

impl<V> FusedIterator for Values<'_, V> {}

impl<V: Debug> Debug for Values<'_, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// A mutable iterator over the values of a [`HashTable`], in slot order.
pub struct ValuesMut<'a, V> {
    inner: IterMut<'a, V>,
}

impl<'a, V> Iterator for ValuesMut<'a, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for ValuesMut<'_, V> {}

impl<V> FusedIterator for ValuesMut<'_, V> {}

impl<V: Debug> Debug for ValuesMut<'_, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(
                self.inner
                    .slots
                    .as_slice()
                    .iter()
                    .flatten()
                    .map(|bucket| &bucket.value),
            )
            .finish()
    }
}

/// A draining iterator over the entries of a [`HashTable`].
///
/// This struct is created by the [`drain`] method on [`HashTable`]. The
/// table keeps its capacity.
///
/// [`drain`]: HashTable::drain
pub struct Drain<'a, V> {
    inner: IntoIter<V>,
    marker: PhantomData<&'a mut HashTable<V>>,
}

impl<V> Iterator for Drain<'_, V> {
    type Item = (String, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Drain<'_, V> {}

impl<V> FusedIterator for Drain<'_, V> {}

impl<V: Debug> Debug for Drain<'_, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.inner.fmt(f)
    }
}

/// An owning iterator over the entries of a [`HashTable`], in slot order.
pub struct IntoIter<V> {
    slots: alloc::vec::IntoIter<Slot<V>>,
    remaining: usize,
}

impl<V> Iterator for IntoIter<V> {
    type Item = (String, V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let bucket = self.slots.by_ref().flatten().next()?;
        self.remaining -= 1;
        Some((bucket.key, bucket.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}

impl<V> FusedIterator for IntoIter<V> {}

impl<V> IntoIter<V> {
    fn buckets(&self) -> impl Iterator<Item = &Bucket<V>> {
        self.slots.as_slice().iter().flatten()
    }
}

impl<V: Debug> Debug for IntoIter<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(self.buckets().map(|bucket| (&bucket.key, &bucket.value)))
            .finish()
    }
}

/// An owning iterator over the keys of a [`HashTable`].
pub struct IntoKeys<V> {
    inner: IntoIter<V>,
}

impl<V> Iterator for IntoKeys<V> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for IntoKeys<V> {}

impl<V> FusedIterator for IntoKeys<V> {}

impl<V> Debug for IntoKeys<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(self.inner.buckets().map(|bucket| &bucket.key))
            .finish()
    }
}

/// An owning iterator over the values of a [`HashTable`].
pub struct IntoValues<V> {
    inner: IntoIter<V>,
}

impl<V> Iterator for IntoValues<V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for IntoValues<V> {}

impl<V> FusedIterator for IntoValues<V> {}

impl<V: Debug> Debug for IntoValues<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(self.inner.buckets().map(|bucket| &bucket.value))
            .finish()
    }
}

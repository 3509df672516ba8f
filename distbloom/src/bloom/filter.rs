// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.


use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;

use tracing::debug;
use tracing::warn;

use crate::error::Error;
use crate::hash::bit_index;
use crate::hash::murmurhash2_32;

/// Smallest accepted number of bits.
pub const MIN_NUM_BITS: u32 = 1;
/// Largest accepted number of bits; the wire format stores it as a signed 32-bit integer.
pub const MAX_NUM_BITS: u32 = i32::MAX as u32;
/// Smallest accepted number of hash rounds.
pub const MIN_NUM_HASHES: u32 = 1;
/// Largest accepted number of hash rounds; the wire format stores it as a signed 32-bit integer.
pub const MAX_NUM_HASHES: u32 = i32::MAX as u32;

/// A Bloom filter for probabilistic set membership testing.
///
/// Provides fast membership queries with:
/// - No false negatives (inserted items always return `true`)
/// - A false positive rate governed by `bit_count`, `hash_count` and the number of insertions
/// - Constant space usage
///
/// Bits are only ever set, never cleared. Filters built independently with the same
/// parameters can be combined with [`union`](Self::union) or
/// [`from_union`](Self::from_union).
#[derive(Debug, Clone)]
pub struct BloomFilter {
    /// Total number of bits in the filter (m)
    pub(super) bit_count: u32,
    /// Number of hash rounds per element (k)
    pub(super) hash_count: u32,
    /// Bit array packed into u64 words, bit `i` at word `i / 64`, offset `i % 64`.
    /// Length = ceil(bit_count / 64); bits at or beyond `bit_count` stay clear.
    pub(super) bit_array: Vec<u64>,
}

impl BloomFilter {
    /// Creates an empty filter with `bit_count` bits and `hash_count` hash rounds.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidParameter`](crate::error::ErrorKind::InvalidParameter) if either value
    /// is zero or larger than `i32::MAX`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use distbloom::bloom::BloomFilter;
    /// let filter = BloomFilter::new(64, 3).unwrap();
    /// assert_eq!(filter.bit_count(), 64);
    /// assert!(filter.is_empty());
    ///
    /// assert!(BloomFilter::new(0, 3).is_err());
    /// ```
    pub fn new(bit_count: u32, hash_count: u32) -> Result<Self, Error> {
        validate_parameters(bit_count, hash_count)?;
        Ok(Self::new_unchecked(bit_count, hash_count))
    }

    pub(super) fn new_unchecked(bit_count: u32, hash_count: u32) -> Self {
        let num_words = bit_count.div_ceil(64) as usize;
        BloomFilter {
            bit_count,
            hash_count,
            bit_array: vec![0u64; num_words],
        }
    }

    /// Creates a filter holding the union of every filter in `filters`.
    ///
    /// Every input must have been built with the same `bit_count` and `hash_count`. All inputs
    /// are checked before any bit is merged. An empty input yields an empty filter. Since
    /// union is commutative and associative, input order never affects the result.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidParameter`](crate::error::ErrorKind::InvalidParameter) for invalid
    /// parameters and [`IncompatibleFilter`](crate::error::ErrorKind::IncompatibleFilter) if
    /// any input was built with different ones.
    ///
    /// # Examples
    ///
    /// ```
    /// # use distbloom::bloom::BloomFilter;
    /// let mut left = BloomFilter::new(32, 2).unwrap();
    /// let mut right = BloomFilter::new(32, 2).unwrap();
    /// left.insert("x");
    /// right.insert("y");
    ///
    /// let merged = BloomFilter::from_union(32, 2, [&left, &right]).unwrap();
    /// assert!(merged.contains("x"));
    /// assert!(merged.contains("y"));
    /// ```
    pub fn from_union<'a, I>(bit_count: u32, hash_count: u32, filters: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = &'a BloomFilter>,
    {
        let mut merged = Self::new(bit_count, hash_count)?;
        let filters: Vec<&BloomFilter> = filters.into_iter().collect();
        for filter in &filters {
            merged.check_compatible(filter)?;
        }
        for filter in &filters {
            merged.or_bits(filter);
        }

        debug!(
            filters = filters.len(),
            bit_count,
            hash_count,
            bits_used = merged.bits_used(),
            "merged Bloom filters"
        );
        Ok(merged)
    }

    /// Inserts an item into the filter.
    ///
    /// After insertion, `contains(item)` will always return `true`. Inserting the same item
    /// again leaves the filter unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// # use distbloom::bloom::BloomFilter;
    /// let mut filter = BloomFilter::new(64, 3).unwrap();
    ///
    /// filter.insert("apple");
    /// filter.insert(b"raw bytes");
    /// filter.insert(String::from("owned"));
    ///
    /// assert!(filter.contains("apple"));
    /// ```
    pub fn insert(&mut self, item: impl AsRef<[u8]>) {
        let item = item.as_ref();
        for index in Self::bit_indices(self.bit_count, self.hash_count, item) {
            self.set_bit(index);
        }
    }

    /// Tests whether an item is possibly in the set.
    ///
    /// Returns:
    /// - `true`: Item was **possibly** inserted (or false positive)
    /// - `false`: Item was **definitely not** inserted
    ///
    /// Stops at the first clear bit.
    ///
    /// # Examples
    ///
    /// ```
    /// # use distbloom::bloom::BloomFilter;
    /// let mut filter = BloomFilter::new(64, 3).unwrap();
    /// filter.insert("alice");
    ///
    /// assert!(filter.contains("alice"));
    /// assert!(!filter.contains("carol"));
    /// ```
    pub fn contains(&self, item: impl AsRef<[u8]>) -> bool {
        Self::bit_indices(self.bit_count, self.hash_count, item.as_ref())
            .all(|index| self.test_bit(index))
    }

    /// Tests and inserts an item in a single operation.
    ///
    /// Returns whether the item was possibly already in the set before insertion.
    ///
    /// # Examples
    ///
    /// ```
    /// # use distbloom::bloom::BloomFilter;
    /// let mut filter = BloomFilter::new(64, 3).unwrap();
    ///
    /// assert!(!filter.contains_and_insert("apple"));
    /// assert!(filter.contains_and_insert("apple"));
    /// ```
    pub fn contains_and_insert(&mut self, item: impl AsRef<[u8]>) -> bool {
        let mut was_present = true;
        for index in Self::bit_indices(self.bit_count, self.hash_count, item.as_ref()) {
            was_present &= self.set_bit(index);
        }
        was_present
    }

    /// Merges another filter into this one via bitwise OR (union).
    ///
    /// After merging, this filter will recognize items from either filter
    /// (plus any false positives from either).
    ///
    /// # Errors
    ///
    /// Returns [`IncompatibleFilter`](crate::error::ErrorKind::IncompatibleFilter) if the
    /// filters differ in `bit_count` or `hash_count`; this filter is left unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// # use distbloom::bloom::BloomFilter;
    /// let mut f1 = BloomFilter::new(32, 2).unwrap();
    /// let mut f2 = BloomFilter::new(32, 2).unwrap();
    ///
    /// f1.insert("a");
    /// f2.insert("b");
    ///
    /// f1.union(&f2).unwrap();
    /// assert!(f1.contains("a"));
    /// assert!(f1.contains("b"));
    ///
    /// let f3 = BloomFilter::new(64, 2).unwrap();
    /// assert!(f1.union(&f3).is_err());
    /// ```
    pub fn union(&mut self, other: &BloomFilter) -> Result<(), Error> {
        self.check_compatible(other)?;
        self.or_bits(other);
        Ok(())
    }

    /// Returns whether the filter is empty (no bit set).
    pub fn is_empty(&self) -> bool {
        self.bit_array.iter().all(|word| *word == 0)
    }

    /// Returns the number of bits set to 1.
    pub fn bits_used(&self) -> u64 {
        self.bit_array
            .iter()
            .map(|word| u64::from(word.count_ones()))
            .sum()
    }

    /// Returns the total number of bits in the filter (m).
    pub fn bit_count(&self) -> u32 {
        self.bit_count
    }

    /// Returns the number of hash rounds per element (k).
    pub fn hash_count(&self) -> u32 {
        self.hash_count
    }

    /// Returns the bit at `index`, or `None` if `index >= bit_count`.
    pub fn get_bit(&self, index: u32) -> Option<bool> {
        (index < self.bit_count).then(|| self.test_bit(index))
    }

    /// Checks if two filters are compatible for merging.
    ///
    /// Filters are compatible if they have the same number of bits and the same number of
    /// hash rounds.
    pub fn is_compatible(&self, other: &BloomFilter) -> bool {
        self.bit_count == other.bit_count && self.hash_count == other.hash_count
    }

    /// Renders the bit array as `'1'`/`'0'` characters in index order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use distbloom::bloom::BloomFilter;
    /// let filter = BloomFilter::new(4, 1).unwrap();
    /// assert_eq!(filter.to_bit_string(), "0000");
    /// ```
    pub fn to_bit_string(&self) -> String {
        (0..self.bit_count)
            .map(|index| if self.test_bit(index) { '1' } else { '0' })
            .collect()
    }

    /// Yields the bit position chosen by each hash round, in round order.
    ///
    /// Round `i` hashes the item with seed `i`.
    fn bit_indices(
        bit_count: u32,
        hash_count: u32,
        item: &[u8],
    ) -> impl Iterator<Item = u32> + '_ {
        (0..hash_count)
            .map(move |round| bit_index(murmurhash2_32(item, round as i32), bit_count))
    }

    fn check_compatible(&self, other: &BloomFilter) -> Result<(), Error> {
        if self.is_compatible(other) {
            return Ok(());
        }

        warn!(
            bit_count = self.bit_count,
            hash_count = self.hash_count,
            other_bit_count = other.bit_count,
            other_hash_count = other.hash_count,
            "rejected union of incompatible Bloom filters"
        );
        Err(
            Error::incompatible("cannot union Bloom filters with different parameters")
                .with_context("bit_count", self.bit_count)
                .with_context("hash_count", self.hash_count)
                .with_context("other_bit_count", other.bit_count)
                .with_context("other_hash_count", other.hash_count),
        )
    }

    fn or_bits(&mut self, other: &BloomFilter) {
        for (word, other_word) in self.bit_array.iter_mut().zip(&other.bit_array) {
            *word |= *other_word;
        }
    }

    /// Gets the value of a single bit.
    fn test_bit(&self, bit_index: u32) -> bool {
        let word_index = (bit_index >> 6) as usize; // Equivalent to bit_index / 64
        let mask = 1u64 << (bit_index & 63);
        (self.bit_array[word_index] & mask) != 0
    }

    /// Sets a single bit, returning whether it was already set.
    fn set_bit(&mut self, bit_index: u32) -> bool {
        let word_index = (bit_index >> 6) as usize;
        let mask = 1u64 << (bit_index & 63);
        let was_set = (self.bit_array[word_index] & mask) != 0;
        self.bit_array[word_index] |= mask;
        was_set
    }
}

fn validate_parameters(bit_count: u32, hash_count: u32) -> Result<(), Error> {
    if !(MIN_NUM_BITS..=MAX_NUM_BITS).contains(&bit_count) {
        return Err(Error::invalid_parameter(format!(
            "bit_count must be between {MIN_NUM_BITS} and {MAX_NUM_BITS}"
        ))
        .with_context("bit_count", bit_count));
    }
    if !(MIN_NUM_HASHES..=MAX_NUM_HASHES).contains(&hash_count) {
        return Err(Error::invalid_parameter(format!(
            "hash_count must be between {MIN_NUM_HASHES} and {MAX_NUM_HASHES}"
        ))
        .with_context("hash_count", hash_count));
    }
    Ok(())
}

impl PartialEq for BloomFilter {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
            || (self.bit_count == other.bit_count
                && self.hash_count == other.hash_count
                && self.bit_array == other.bit_array)
    }
}

impl Eq for BloomFilter {}

impl Hash for BloomFilter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bit_count.hash(state);
        self.hash_count.hash(state);
        self.bit_array.hash(state);
    }
}

impl fmt::Display for BloomFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "bit_count: {}, hash_count: {}",
            self.bit_count, self.hash_count
        )?;
        write!(f, "{}", self.to_bit_string())
    }
}

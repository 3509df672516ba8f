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


//! Bloom Filter implementation for probabilistic set membership testing.
//!
//! A Bloom filter is a space-efficient probabilistic data structure used to test whether
//! an element is a member of a set. False positive matches are possible, but false negatives
//! are not. In other words, a query returns either "possibly in set" or "definitely not in set".
//!
//! # Properties
//!
//! - **No false negatives**: If an item was inserted, `contains()` will always return `true`
//! - **Possible false positives**: `contains()` may return `true` for items never inserted
//! - **Append only**: bits are never cleared, so items cannot be removed
//! - **Mergeable**: filters built with the same parameters combine by bitwise OR
//!
//! # Usage
//!
//! ```rust
//! use distbloom::bloom::BloomFilter;
//!
//! let mut filter = BloomFilter::new(64, 3).unwrap();
//!
//! filter.insert("alice");
//! filter.insert("bob");
//!
//! assert!(filter.contains("alice")); // true - definitely inserted
//! assert!(filter.contains("bob"));
//! assert!(!filter.contains("carol")); // false - never inserted
//! ```
//!
//! # Distributed Builds
//!
//! Each worker builds its own filter over one partition of the input, ships it to an
//! aggregator as bytes, and the aggregator merges all of them:
//!
//! ```rust
//! # use distbloom::bloom::BloomFilter;
//! let partitions = [vec!["a", "b"], vec!["c"], vec!["d", "e"]];
//!
//! let blobs: Vec<Vec<u8>> = partitions
//!     .iter()
//!     .map(|partition| {
//!         let mut filter = BloomFilter::new(1024, 4).unwrap();
//!         for item in partition {
//!             filter.insert(item);
//!         }
//!         filter.serialize()
//!     })
//!     .collect();
//!
//! let filters: Vec<BloomFilter> = blobs
//!     .iter()
//!     .map(|blob| BloomFilter::deserialize(blob))
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! let merged = BloomFilter::from_union(1024, 4, &filters).unwrap();
//!
//! for item in ["a", "b", "c", "d", "e"] {
//!     assert!(merged.contains(item));
//! }
//! ```
//!
//! # Implementation Details
//!
//! - Uses 32-bit MurmurHash2, re-seeded with the round index `0..k`, one bit per round
//! - Bits packed in `u64` words
//! - Big-endian wire format with least-significant-bit-first packed bits, see
//!   [`serialization`]
//!
//! # References
//!
//! - Bloom, Burton H. (1970). "Space/time trade-offs in hash coding with allowable errors"

mod filter;
pub mod serialization;

pub use self::filter::BloomFilter;
pub use self::filter::MAX_NUM_BITS;
pub use self::filter::MAX_NUM_HASHES;
pub use self::filter::MIN_NUM_BITS;
pub use self::filter::MIN_NUM_HASHES;

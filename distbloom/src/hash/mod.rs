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

//! Seeded hashing used to place elements into a Bloom filter.
//!
//! A single algorithm, [`murmurhash2_32`], is re-seeded once per round: round `i` of `k` uses
//! seed `i`. Filters built on different machines therefore set exactly the same bits for the
//! same element, which is what makes partition filters safe to union afterwards.

mod murmurhash;

pub use self::murmurhash::murmurhash2_32;

/// Maps a signed 32-bit hash onto a bit position in `[0, bit_count)`.
///
/// The magnitude of the hash is taken with [`i32::unsigned_abs`], so `i32::MIN` maps to `2^31`
/// instead of overflowing to a negative value. For every other input this equals
/// `|hash| % bit_count`.
///
/// # Panics
///
/// Panics if `bit_count` is zero.
///
/// # Examples
///
/// ```
/// # use distbloom::hash::bit_index;
/// assert_eq!(bit_index(-5, 64), 5);
/// assert_eq!(bit_index(i32::MIN, 1000), 648);
/// ```
#[inline]
pub fn bit_index(hash: i32, bit_count: u32) -> u32 {
    hash.unsigned_abs() % bit_count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_index_extremes() {
        assert_eq!(bit_index(0, 7), 0);
        assert_eq!(bit_index(i32::MAX, 1000), 647);
        assert_eq!(bit_index(i32::MIN, 1000), 648);
        assert_eq!(bit_index(i32::MIN, 1), 0);
        assert_eq!(bit_index(i32::MIN, i32::MAX as u32), 1);
    }

    #[test]
    fn test_bit_index_is_sign_symmetric() {
        for hash in [1, 17, 4096, 123_456_789] {
            assert_eq!(bit_index(hash, 97), bit_index(-hash, 97));
        }
    }
}

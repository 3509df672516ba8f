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


use byteorder::ByteOrder;
use byteorder::LE;

const M: u32 = 0x5bd1e995;
const R: u32 = 24;

/// Computes the 32-bit MurmurHash2 of `bytes` with the given seed.
///
/// Body blocks are read as little-endian `u32`s. Bytes of the trailing partial block are
/// sign-extended before being mixed in, which keeps bit positions identical to the filters
/// produced by the Hadoop partition jobs this format is exchanged with.
///
/// # Examples
///
/// ```
/// # use distbloom::hash::murmurhash2_32;
/// assert_eq!(murmurhash2_32(b"", 0), 0);
/// assert_ne!(murmurhash2_32(b"alice", 0), murmurhash2_32(b"alice", 1));
/// ```
pub fn murmurhash2_32(bytes: &[u8], seed: i32) -> i32 {
    let mut h = (seed as u32) ^ (bytes.len() as u32);

    let mut blocks = bytes.chunks_exact(4);
    for block in &mut blocks {
        let mut k = LE::read_u32(block);
        k = k.wrapping_mul(M);
        k ^= k >> R;
        k = k.wrapping_mul(M);

        h = h.wrapping_mul(M);
        h ^= k;
    }

    // tail
    let tail = blocks.remainder();
    if !tail.is_empty() {
        if tail.len() >= 3 {
            h ^= sign_extend(tail[2]) << 16;
        }
        if tail.len() >= 2 {
            h ^= sign_extend(tail[1]) << 8;
        }
        h ^= sign_extend(tail[0]);
        h = h.wrapping_mul(M);
    }

    h ^= h >> 13;
    h = h.wrapping_mul(M);
    h ^= h >> 15;
    h as i32
}

#[inline]
fn sign_extend(byte: u8) -> u32 {
    byte as i8 as i32 as u32
}

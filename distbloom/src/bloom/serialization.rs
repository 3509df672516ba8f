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


//! Binary wire format for Bloom filters.
//!
//! All integers are big-endian signed 32-bit values:
//!
//! ```text
//! +-----------+------------+-------------+---------------------------+
//! | bit_count | hash_count | byte_length | byte_length packed bytes  |
//! +-----------+------------+-------------+---------------------------+
//! ```
//!
//! Bit `i` lives in byte `i / 8` at position `i % 8` (least significant bit first). Trailing
//! zero bytes may be omitted; [`BloomFilter::serialize`] always omits them.

use std::io;
use std::io::Read;
use std::io::Write;

use tracing::debug;
use tracing::warn;

use super::BloomFilter;
use crate::codec::SketchBytes;
use crate::codec::SketchReader;
use crate::error::Error;

/// Size of the fixed header in bytes: bit count, hash count and packed byte length.
pub const HEADER_SIZE: usize = 12;

impl BloomFilter {
    /// Serializes the filter to a byte vector.
    ///
    /// # Examples
    ///
    /// ```
    /// # use distbloom::bloom::BloomFilter;
    /// let mut filter = BloomFilter::new(64, 3).unwrap();
    /// filter.insert("test");
    ///
    /// let bytes = filter.serialize();
    /// let restored = BloomFilter::deserialize(&bytes).unwrap();
    /// assert_eq!(filter, restored);
    /// ```
    pub fn serialize(&self) -> Vec<u8> {
        let packed_len = self.packed_len();
        let mut bytes = SketchBytes::with_capacity(HEADER_SIZE + packed_len);

        // Both parameters and the packed length are bounded by i32::MAX.
        bytes.write_i32_be(self.bit_count as i32);
        bytes.write_i32_be(self.hash_count as i32);
        bytes.write_i32_be(packed_len as i32);

        // LSB-first byte packing is the little-endian layout of the words.
        let packed: Vec<u8> = self
            .bit_array
            .iter()
            .flat_map(|word| word.to_le_bytes())
            .take(packed_len)
            .collect();
        bytes.write(&packed);

        bytes.into_bytes()
    }

    /// Writes the serialized filter to `writer`.
    ///
    /// # Errors
    ///
    /// Returns any error raised by `writer`.
    pub fn serialize_into<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(&self.serialize())
    }

    /// Returns the length in bytes of [`serialize`](Self::serialize)'s output.
    pub fn serialized_size(&self) -> usize {
        HEADER_SIZE + self.packed_len()
    }

    /// Deserializes a filter from exactly one serialized record.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedWireData`](crate::error::ErrorKind::MalformedWireData) if:
    /// - The data is truncated, or bytes remain after the record
    /// - `bit_count` or `hash_count` is not positive, or `byte_length` is negative
    /// - `byte_length` exceeds the bytes needed for `bit_count` bits
    /// - A bit at or beyond `bit_count` is set
    ///
    /// # Examples
    ///
    /// ```
    /// # use distbloom::bloom::BloomFilter;
    /// let bytes = [0, 0, 0, 16, 0, 0, 0, 2, 0, 0, 0, 1, 0b0000_0101];
    /// let filter = BloomFilter::deserialize(&bytes).unwrap();
    /// assert_eq!(filter.to_bit_string(), "1010000000000000");
    /// ```
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        let mut remaining = bytes;
        let filter = Self::deserialize_from(&mut remaining)?;
        if !remaining.is_empty() {
            warn!(
                trailing_bytes = remaining.len(),
                "rejected trailing bytes after Bloom filter"
            );
            return Err(Error::malformed("trailing bytes after Bloom filter")
                .with_context("trailing_bytes", remaining.len()));
        }
        Ok(filter)
    }

    /// Reads one serialized filter from `reader`.
    ///
    /// The reader is left positioned right after the record, so several filters written
    /// back to back can be read in sequence.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedWireData`](crate::error::ErrorKind::MalformedWireData) for the same
    /// conditions as [`deserialize`](Self::deserialize), except trailing data, and when
    /// `reader` fails.
    ///
    /// # Examples
    ///
    /// ```
    /// # use distbloom::bloom::BloomFilter;
    /// let mut stream = Vec::new();
    /// for word in ["x", "y"] {
    ///     let mut filter = BloomFilter::new(32, 2).unwrap();
    ///     filter.insert(word);
    ///     filter.serialize_into(&mut stream).unwrap();
    /// }
    ///
    /// let mut reader = stream.as_slice();
    /// let first = BloomFilter::deserialize_from(&mut reader).unwrap();
    /// let second = BloomFilter::deserialize_from(&mut reader).unwrap();
    /// assert!(first.contains("x"));
    /// assert!(second.contains("y"));
    /// assert!(reader.is_empty());
    /// ```
    pub fn deserialize_from<R: Read>(reader: R) -> Result<Self, Error> {
        Self::decode(SketchReader::new(reader))
            .inspect_err(|err| warn!(%err, "rejected malformed Bloom filter data"))
    }

    fn decode<R: Read>(mut cursor: SketchReader<R>) -> Result<Self, Error> {
        let bit_count = cursor.read_i32_be().map_err(|err| {
            Error::insufficient_data("bit_count").with_context("cause", err)
        })?;
        let hash_count = cursor.read_i32_be().map_err(|err| {
            Error::insufficient_data("hash_count").with_context("cause", err)
        })?;
        let byte_length = cursor.read_i32_be().map_err(|err| {
            Error::insufficient_data("byte_length").with_context("cause", err)
        })?;

        if bit_count <= 0 || hash_count <= 0 {
            return Err(Error::malformed("bit_count and hash_count must be positive")
                .with_context("bit_count", bit_count)
                .with_context("hash_count", hash_count));
        }
        let (bit_count, hash_count) = (bit_count as u32, hash_count as u32);

        let max_byte_length = bit_count.div_ceil(8) as usize;
        let byte_length = usize::try_from(byte_length).map_err(|_| {
            Error::malformed("byte_length must not be negative")
                .with_context("byte_length", byte_length)
        })?;
        if byte_length > max_byte_length {
            return Err(Error::malformed("byte_length exceeds bit_count")
                .with_context("byte_length", byte_length)
                .with_context("max_byte_length", max_byte_length));
        }

        let packed = cursor.read_bytes(byte_length).map_err(|err| {
            Error::insufficient_data("bit_array").with_context("cause", err)
        })?;
        if packed.len() < byte_length {
            return Err(Error::insufficient_data("bit_array")
                .with_context("byte_length", byte_length)
                .with_context("available", packed.len()));
        }

        let mut filter = BloomFilter::new_unchecked(bit_count, hash_count);
        for (word, chunk) in filter.bit_array.iter_mut().zip(packed.chunks(8)) {
            let mut buf = [0u8; 8];
            buf[..chunk.len()].copy_from_slice(chunk);
            *word = u64::from_le_bytes(buf);
        }

        let excess_bits = bit_count % 64;
        if excess_bits != 0 {
            if let Some(last) = filter.bit_array.last() {
                if *last >> excess_bits != 0 {
                    return Err(Error::malformed("bit set beyond bit_count")
                        .with_context("bit_count", bit_count));
                }
            }
        }

        debug!(
            bit_count,
            hash_count,
            byte_length,
            "decoded Bloom filter from wire data"
        );
        Ok(filter)
    }

    /// Number of packed bytes needed to cover the highest set bit.
    fn packed_len(&self) -> usize {
        match self.bit_array.iter().rposition(|word| *word != 0) {
            None => 0,
            Some(index) => {
                let significant_bits = 64 - self.bit_array[index].leading_zeros();
                index * 8 + significant_bits.div_ceil(8) as usize
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BloomFilter;
    use super::HEADER_SIZE;

    #[test]
    fn test_packed_len() {
        let mut filter = BloomFilter::new(200, 1).unwrap();
        assert_eq!(filter.packed_len(), 0);

        filter.bit_array[0] = 1;
        assert_eq!(filter.packed_len(), 1);

        filter.bit_array[0] = 1 << 8;
        assert_eq!(filter.packed_len(), 2);

        filter.bit_array[1] = 1 << 63;
        assert_eq!(filter.packed_len(), 16);

        filter.bit_array[3] = 1 << 7;
        assert_eq!(filter.packed_len(), 25);
        assert_eq!(filter.serialized_size(), HEADER_SIZE + 25);
    }

    #[test]
    fn test_empty_filter_has_no_payload() {
        let filter = BloomFilter::new(1000, 7).unwrap();
        assert_eq!(
            filter.serialize(),
            [0, 0, 0x03, 0xe8, 0, 0, 0, 7, 0, 0, 0, 0]
        );
    }

    #[test]
    fn test_last_bit_round_trip() {
        let mut filter = BloomFilter::new(65, 1).unwrap();
        filter.bit_array[1] = 1;
        let bytes = filter.serialize();
        assert_eq!(bytes.len(), HEADER_SIZE + 9);
        assert_eq!(BloomFilter::deserialize(&bytes).unwrap(), filter);
    }
}

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


use std::io;
use std::io::Read;

use byteorder::BigEndian;
use byteorder::ReadBytesExt;

/// A wrapper around any reader that provides methods for reading various types of data from it.
///
/// Reading stops exactly at the end of what was asked for, so a reader positioned at the start
/// of one record is left positioned at the start of the next.
pub struct SketchReader<R> {
    reader: R,
}

impl<R: Read> SketchReader<R> {
    /// Creates a new `SketchReader` over the given reader.
    pub fn new(reader: R) -> Self {
        SketchReader { reader }
    }

    /// Reads a 32-bit signed integer in big-endian byte order.
    pub fn read_i32_be(&mut self) -> io::Result<i32> {
        self.reader.read_i32::<BigEndian>()
    }

    /// Reads up to `len` bytes, returning fewer only when the reader is exhausted.
    ///
    /// The buffer grows with the data actually read rather than being sized from `len` up
    /// front, so a corrupt length field cannot force a large allocation.
    pub fn read_bytes(&mut self, len: usize) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        (&mut self.reader).take(len as u64).read_to_end(&mut buf)?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::SketchReader;

    #[test]
    fn test_read_i32_be() {
        let data = [0u8, 0, 0, 64, 0xff, 0xff, 0xff, 0xfe];
        let mut reader = SketchReader::new(&data[..]);
        assert_eq!(reader.read_i32_be().unwrap(), 64);
        assert_eq!(reader.read_i32_be().unwrap(), -2);
        assert!(reader.read_i32_be().is_err());
    }

    #[test]
    fn test_read_bytes_stops_at_len() {
        let data = [1u8, 2, 3, 4, 5];
        let mut slice = &data[..];
        let mut reader = SketchReader::new(&mut slice);
        assert_eq!(reader.read_bytes(3).unwrap(), [1, 2, 3]);
        assert_eq!(reader.read_bytes(10).unwrap(), [4, 5]);
        assert!(reader.read_bytes(1).unwrap().is_empty());
    }
}

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


use distbloom::bloom::BloomFilter;

/// Builds a filter over one partition of the input, the way a worker would.
#[allow(dead_code)] // false-positive
pub fn build_partition<I, T>(bit_count: u32, hash_count: u32, items: I) -> BloomFilter
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let mut filter = BloomFilter::new(bit_count, hash_count).unwrap();
    for item in items {
        filter.insert(item);
    }
    filter
}

/// Deterministic sample of distinct keys with the given prefix.
#[allow(dead_code)] // false-positive
pub fn keys(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{prefix}-{i}")).collect()
}

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


use std::thread;

use distbloom::bloom::BloomFilter;
use distbloom::error::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

const BIT_COUNT: u32 = 95_851;
const HASH_COUNT: u32 = 7;

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into()))
        .init();

    // Stand-in for a large corpus of titles split across workers.
    let titles: Vec<String> = (0..10_000).map(|i| format!("title-{i}")).collect();
    let partitions: Vec<&[String]> = titles.chunks(2_500).collect();

    // Build phase: one private filter per worker, shipped back as bytes.
    let blobs: Vec<Vec<u8>> = thread::scope(|scope| {
        let workers: Vec<_> = partitions
            .iter()
            .map(|partition| {
                scope.spawn(move || -> Result<Vec<u8>, Error> {
                    let mut filter = BloomFilter::new(BIT_COUNT, HASH_COUNT)?;
                    for title in partition.iter() {
                        filter.insert(title);
                    }
                    Ok(filter.serialize())
                })
            })
            .collect();
        workers
            .into_iter()
            .map(|worker| worker.join().expect("worker panicked"))
            .collect::<Result<_, _>>()
    })?;
    for (partition, blob) in blobs.iter().enumerate() {
        info!(partition, bytes = blob.len(), "partition filter built");
    }

    // Merge phase: decode every blob and union them on a single thread.
    let filters = blobs
        .iter()
        .map(|blob| BloomFilter::deserialize(blob))
        .collect::<Result<Vec<_>, _>>()?;
    let merged = BloomFilter::from_union(BIT_COUNT, HASH_COUNT, &filters)?;

    // Query phase.
    let present = titles.iter().filter(|title| merged.contains(title)).count();
    let false_positives = (0..10_000)
        .filter(|i| merged.contains(format!("missing-{i}")))
        .count();

    println!("Merged {} partition filters", filters.len());
    println!("Bits used: {} of {}", merged.bits_used(), merged.bit_count());
    println!("Inserted titles found: {present} of {}", titles.len());
    println!("False positives among 10000 absent titles: {false_positives}");
    Ok(())
}

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


mod common;

use common::build_partition;
use common::keys;
use distbloom::bloom::BloomFilter;
use distbloom::error::ErrorKind;
use googletest::assert_that;
use googletest::prelude::contains_substring;
use googletest::prelude::eq;
use googletest::prelude::lt;
use insta::assert_snapshot;

#[test]
fn test_alice_and_bob() {
    let mut filter = BloomFilter::new(64, 3).unwrap();
    filter.insert("alice");
    filter.insert("bob");

    assert!(filter.contains("alice"));
    assert!(filter.contains("bob"));
    assert!(!filter.contains("carol"));
    assert_that!(filter.bits_used(), eq(6u64));
}

#[test]
fn test_no_false_negatives() {
    for (bit_count, hash_count) in [(1, 1), (7, 3), (64, 3), (1000, 7), (4096, 12)] {
        let items = keys("member", 500);
        let filter = build_partition(bit_count, hash_count, &items);
        for item in &items {
            assert!(
                filter.contains(item),
                "false negative for {item} with m={bit_count}, k={hash_count}"
            );
        }
    }
}

#[test]
fn test_accepts_any_byte_sequence() {
    let mut filter = BloomFilter::new(512, 4).unwrap();
    let binary = [0u8, 0xff, 0x80, 0x7f, 0x01];
    filter.insert(binary);
    filter.insert(Vec::from("vec"));
    filter.insert("");

    assert!(filter.contains(&binary[..]));
    assert!(filter.contains(b"vec"));
    assert!(filter.contains(String::new()));
}

#[test]
fn test_false_positive_rate_is_reasonable() {
    let filter = build_partition(10_000, 5, keys("item", 1000));
    let false_positives = keys("other", 10_000)
        .iter()
        .filter(|key| filter.contains(key))
        .count();
    // Expected rate is roughly 0.94% for this configuration.
    assert_that!(false_positives, lt(200usize));
}

#[test]
fn test_add_twice_equals_add_once() {
    let once = build_partition(256, 5, ["apple", "banana"]);
    let twice = build_partition(256, 5, ["apple", "banana", "apple", "banana"]);
    assert_eq!(once, twice);
    assert_eq!(once.serialize(), twice.serialize());
}

#[test]
fn test_union_of_x_and_y() {
    let mut x = build_partition(32, 2, ["x"]);
    let y = build_partition(32, 2, ["y"]);
    x.union(&y).unwrap();

    assert!(x.contains("x"));
    assert!(x.contains("y"));
}

#[test]
fn test_union_is_order_independent() {
    let a = build_partition(300, 4, keys("a", 20));
    let b = build_partition(300, 4, keys("b", 20));
    let c = build_partition(300, 4, keys("c", 20));

    let mut abc = a.clone();
    abc.union(&b).unwrap();
    abc.union(&c).unwrap();

    let mut cab = c.clone();
    cab.union(&a).unwrap();
    cab.union(&b).unwrap();

    let mut bc = b.clone();
    bc.union(&c).unwrap();
    let mut a_bc = a.clone();
    a_bc.union(&bc).unwrap();

    assert_eq!(abc, cab);
    assert_eq!(abc, a_bc);
    assert_eq!(abc, BloomFilter::from_union(300, 4, [&b, &c, &a]).unwrap());
}

#[test]
fn test_union_with_self_copy_is_noop() {
    let filter = build_partition(128, 3, keys("k", 10));
    let mut merged = filter.clone();
    merged.union(&filter).unwrap();
    assert_eq!(merged, filter);
}

#[test]
fn test_union_rejects_different_bit_count() {
    let mut left = build_partition(64, 3, ["alice"]);
    let before = left.clone();
    let right = build_partition(128, 3, ["bob"]);

    let err = left.union(&right).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IncompatibleFilter);
    assert_that!(err.message(), contains_substring("different parameters"));
    assert_eq!(left, before);
}

#[test]
fn test_from_union_rejects_without_side_effects() {
    let good = build_partition(64, 3, ["alice"]);
    let bad = build_partition(65, 3, ["bob"]);
    let good_before = good.clone();

    let err = BloomFilter::from_union(64, 3, [&good, &bad]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IncompatibleFilter);
    assert_eq!(err.context("other_bit_count"), Some("65"));
    assert_eq!(good, good_before);
}

#[test]
fn test_from_union_rejects_invalid_parameters() {
    let err = BloomFilter::from_union(0, 3, []).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
}

#[test]
fn test_from_union_of_nothing_is_empty() {
    let merged = BloomFilter::from_union(64, 3, []).unwrap();
    assert!(merged.is_empty());
    assert_eq!(merged, BloomFilter::new(64, 3).unwrap());
}

#[test]
fn test_equality() {
    let filter = build_partition(64, 3, ["alice"]);
    let alias = &filter;
    assert_eq!(&filter, alias);
    assert_eq!(filter, filter.clone());

    // same bits, different parameters
    assert_ne!(BloomFilter::new(64, 3).unwrap(), BloomFilter::new(64, 4).unwrap());
    assert_ne!(BloomFilter::new(64, 3).unwrap(), BloomFilter::new(63, 3).unwrap());
    assert_ne!(filter, build_partition(64, 3, ["bob"]));
}

#[test]
fn test_invalid_parameters() {
    let err = BloomFilter::new(0, 3).unwrap_err();
    assert_snapshot!(err, @"InvalidParameter, context: { bit_count: 0 } => bit_count must be between 1 and 2147483647");

    let err = BloomFilter::new(64, 0).unwrap_err();
    assert_snapshot!(err, @"InvalidParameter, context: { hash_count: 0 } => hash_count must be between 1 and 2147483647");
}

#[test]
fn test_debug_rendering() {
    let filter = build_partition(32, 2, ["x", "y"]);
    assert_snapshot!(filter, @r"
    bit_count: 32, hash_count: 2
    00001000000000000000010000000000
    ");
}

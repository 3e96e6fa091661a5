/*
 * Copyright © 2025, the Wastech project developers. All rights reserved.
 *
 * The “Wastech” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use serde::{Serialize,Deserialize};
use wastech_common::kv_store::KvStore;

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
struct Sample {
    values: Vec<f64>,
    label: String
}

#[test]
fn test_in_memory() {
    let store: KvStore<Sample> = KvStore::in_memory();
    assert!( store.is_empty());
    assert_eq!( store.get_clone("x").unwrap(), None);

    store.insert( "x", Sample { values: vec![1.0, 2.5], label: "first".into() }).unwrap();
    store.insert( "x", Sample { values: vec![3.0], label: "second".into() }).unwrap();
    assert_eq!( store.len(), 1);

    let label = store.with( "x", |s| s.label.clone()).unwrap();
    assert_eq!( label.as_deref(), Some("second"));

    assert!( store.remove("x").unwrap());
    assert!( !store.contains_key("x").unwrap());
}

#[test]
fn test_json_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache").join("store.json");

    let sample = Sample { values: vec![-23.5, -46.6, 0.1 + 0.2, 1e-300], label: "roundtrip".into() };
    {
        let store: KvStore<Sample> = KvStore::with_json_file( &path).unwrap();
        store.insert( "sample", sample.clone()).unwrap();
    }
    assert!( path.is_file());

    let store: KvStore<Sample> = KvStore::with_json_file( &path).unwrap();
    assert_eq!( store.get_clone("sample").unwrap(), Some(sample));
}

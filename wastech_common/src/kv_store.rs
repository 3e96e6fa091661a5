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

use std::{
    collections::HashMap,
    fmt::Debug,
    path::{Path,PathBuf},
    sync::RwLock,
};
use serde::{Serialize,de::DeserializeOwned};
use tracing::debug;

use crate::{define_error, fs};

define_error!{ pub KvStoreError =
    IOError(#[from] std::io::Error) : "IO error: {0}",
    JsonError(#[from] serde_json::Error) : "JSON error: {0}",
    PoisonedError(String) : "store lock poisoned: {0}"
}

pub type Result<T> = std::result::Result<T,KvStoreError>;

/// RwLock-synchronized and typed key-value store with String keys. The store is an explicit object
/// (not a global) which is supposed to be created once and then shared by reference (e.g. through an Arc).
///
/// If the store was created with a file path all modifications are written through to that file as a
/// JSON object, and the store is initialized from that file (if it exists) when created. This makes the
/// persisted map the single source of truth that survives process restarts.
///
/// Since all access is synchronized we cannot return borrowed values. Getters either return clones
/// or use closures to process &T values. The lock is never held across await points.
///
/// use like so:
/// ```
/// use wastech_common::kv_store::KvStore;
///
/// let store: KvStore<f64> = KvStore::in_memory();
/// store.insert( "answer", 42.0).unwrap();
/// assert_eq!( store.get_clone("answer").unwrap(), Some(42.0));
/// ```
pub struct KvStore<T> {
    map: RwLock<HashMap<String,T>>,
    path: Option<PathBuf>
}

impl <T> KvStore<T> where T: Clone + Debug + Serialize + DeserializeOwned {

    /// a non-persistent store
    pub fn in_memory ()->Self {
        KvStore { map: RwLock::new(HashMap::new()), path: None }
    }

    /// a store that is backed by the JSON file at `path`. If the file exists it is used to initialize
    /// the store, otherwise it will be created on the first modification
    pub fn with_json_file (path: impl AsRef<Path>)->Result<Self> {
        let path = path.as_ref().to_path_buf();

        let map: HashMap<String,T> = if path.is_file() {
            let data = fs::filepath_contents(&path)?;
            if data.is_empty() { HashMap::new() } else { serde_json::from_slice( &data)? }
        } else {
            HashMap::new()
        };
        debug!("initialized key-value store from {:?} with {} entries", path, map.len());

        Ok( KvStore { map: RwLock::new(map), path: Some(path) } )
    }

    pub fn path (&self)->Option<&Path> { self.path.as_deref() }

    pub fn contains_key (&self, key: &str)->Result<bool> {
        let map = self.map.read().map_err(|e| KvStoreError::PoisonedError(e.to_string()))?;
        Ok( map.contains_key(key) )
    }

    pub fn get_clone (&self, key: &str)->Result<Option<T>> {
        let map = self.map.read().map_err(|e| KvStoreError::PoisonedError(e.to_string()))?;
        Ok( map.get(key).cloned() )
    }

    /// execute closure for value reference of given key
    pub fn with<F,R> (&self, key: &str, f: F)->Result<Option<R>> where F: FnOnce(&T)->R {
        let map = self.map.read().map_err(|e| KvStoreError::PoisonedError(e.to_string()))?;
        Ok( map.get(key).map(f) )
    }

    /// insert or replace the value for `key`. If this is a file backed store the new map is persisted
    /// before the call returns
    pub fn insert (&self, key: impl ToString, value: T)->Result<()> {
        let mut map = self.map.write().map_err(|e| KvStoreError::PoisonedError(e.to_string()))?;
        map.insert( key.to_string(), value);
        self.persist( &map)
    }

    pub fn remove (&self, key: &str)->Result<bool> {
        let mut map = self.map.write().map_err(|e| KvStoreError::PoisonedError(e.to_string()))?;
        let removed = map.remove(key).is_some();
        if removed {
            self.persist( &map)?;
        }
        Ok(removed)
    }

    pub fn len (&self)->usize {
        self.map.read().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty (&self)->bool { self.len() == 0 }

    fn persist (&self, map: &HashMap<String,T>)->Result<()> {
        if let Some(path) = &self.path {
            let data = serde_json::to_vec( map)?;
            fs::set_filepath_contents_atomic( path, &data)?;
        }
        Ok(())
    }
}

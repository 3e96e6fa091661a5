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

//! the single slot freshness cache for fire events.
//!
//! The slot is either Empty, Fresh (younger than the validity window) or Stale. A Fresh slot is served
//! without touching the network. Everything else triggers a fetch from the primary source, and on
//! failure we fall back to the stored entry regardless of its age, then to the last resort source.
//! Only if all of these fail does the caller see a [WastechFiresError::FetchError].
//!
//! Concurrent `get` calls are not coordinated. Each one might fetch and the last write wins, which is
//! acceptable since entries are complete snapshots. No lock is held across await points.

use std::{fmt, path::Path, sync::Arc, time::Duration};
use serde::{Serialize,Deserialize};
use chrono::{DateTime,Utc};
use reqwest::Client;
use tracing::{debug, info, warn};

use wastech_common::{datetime::{duration_since, utc_now}, kv_store::KvStore, net::create_client};

use crate::{
    errors::{Result, WastechFiresError},
    feed::FeedSource,
    normalizer::{normalize, Normalized},
    parser::parse,
    FireEvent, FiresConfig,
};

/// the store key of the cache slot
pub const CACHE_KEY: &str = "nasa_fires_cache";

/* #region persistence *********************************************************************************************/

/// a complete fetch result. Entries are never modified, the next successful fetch replaces them
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
#[serde(rename_all="camelCase")]
pub struct CacheEntry {
    pub records: Vec<FireEvent>,
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new (records: Vec<FireEvent>, fetched_at: DateTime<Utc>)->Self {
        CacheEntry { records, fetched_at }
    }

    pub fn age (&self, now: &DateTime<Utc>)->Duration {
        duration_since( now, &self.fetched_at)
    }

    pub fn is_fresh (&self, now: &DateTime<Utc>, validity: Duration)->bool {
        self.age(now) < validity
    }
}

/// where the cache slot lives
pub trait CacheBackend: Send + Sync {
    fn load (&self)->Result<Option<CacheEntry>>;
    fn save (&self, entry: &CacheEntry)->Result<()>;
}

/// a [CacheBackend] that keeps the slot under [CACHE_KEY] in a [KvStore]
pub struct KvCacheBackend {
    store: Arc<KvStore<CacheEntry>>
}

impl KvCacheBackend {
    pub fn new (store: Arc<KvStore<CacheEntry>>)->Self {
        KvCacheBackend { store }
    }

    pub fn in_memory ()->Self {
        KvCacheBackend::new( Arc::new( KvStore::in_memory()))
    }

    /// a backend that survives process restarts
    pub fn with_json_file (path: impl AsRef<Path>)->Result<Self> {
        Ok( KvCacheBackend::new( Arc::new( KvStore::with_json_file( path)?)) )
    }

    pub fn store (&self)->&Arc<KvStore<CacheEntry>> { &self.store }
}

impl CacheBackend for KvCacheBackend {
    fn load (&self)->Result<Option<CacheEntry>> {
        Ok( self.store.get_clone( CACHE_KEY)? )
    }

    fn save (&self, entry: &CacheEntry)->Result<()> {
        Ok( self.store.insert( CACHE_KEY, entry.clone())? )
    }
}

/* #endregion persistence */

/* #region FreshnessCache ******************************************************************************************/

#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
pub enum CacheState { Empty, Fresh, Stale }

/// where the events of a [FireSnapshot] came from
#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
pub enum DataOrigin {
    /// a fresh cache entry, no fetch attempted
    Cache,
    /// a successful fetch from the primary source
    Fetched,
    /// the primary source failed and we served the last stored entry (degraded)
    StaleCache,
    /// the primary source failed, nothing was stored and we used the last resort source (degraded)
    LastResort,
}

impl fmt::Display for DataOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DataOrigin::Cache => "cache",
            DataOrigin::Fetched => "fetched",
            DataOrigin::StaleCache => "stale cache",
            DataOrigin::LastResort => "last resort source",
        };
        f.write_str(s)
    }
}

/// the result of a [FreshnessCache::get] call
#[derive(Debug,Clone,Serialize)]
#[serde(rename_all="camelCase")]
pub struct FireSnapshot {
    pub events: Vec<FireEvent>,
    /// time of the fetch that produced the events. None for last resort data, which is not cached
    pub fetched_at: Option<DateTime<Utc>>,
    pub origin: DataOrigin,
    /// rows discarded during normalization (only known for data that was parsed in this call)
    pub dropped: usize,
}

impl FireSnapshot {
    fn from_entry (entry: CacheEntry, origin: DataOrigin)->Self {
        FireSnapshot { events: entry.records, fetched_at: Some(entry.fetched_at), origin, dropped: 0 }
    }

    pub fn is_degraded (&self)->bool {
        matches!( self.origin, DataOrigin::StaleCache | DataOrigin::LastResort)
    }
}

pub struct FreshnessCache {
    backend: Arc<dyn CacheBackend>,
    primary: Arc<dyn FeedSource>,
    last_resort: Option<Arc<dyn FeedSource>>,
    validity: Duration,
    delimiter: u8,
}

impl FreshnessCache {
    pub fn new (backend: Arc<dyn CacheBackend>, primary: Arc<dyn FeedSource>, validity: Duration)->Self {
        FreshnessCache { backend, primary, last_resort: None, validity, delimiter: b',' }
    }

    pub fn with_last_resort (mut self, source: Arc<dyn FeedSource>)->Self {
        self.last_resort = Some(source);
        self
    }

    pub fn with_delimiter (mut self, delimiter: u8)->Self {
        self.delimiter = delimiter;
        self
    }

    /// create the cache with its sources and backend from a config. The client is used for all remote sources
    pub fn from_config (config: &FiresConfig, client: &Client)->Result<Self> {
        let backend: Arc<dyn CacheBackend> = match &config.cache_file {
            Some(path) => Arc::new( KvCacheBackend::with_json_file( path)?),
            None => Arc::new( KvCacheBackend::in_memory())
        };
        let primary = config.primary.create_source( client)?;

        let mut cache = FreshnessCache::new( backend, primary, config.validity).with_delimiter( config.delimiter_byte()?);
        if let Some(spec) = &config.last_resort {
            cache = cache.with_last_resort( spec.create_source( client)?);
        }
        Ok(cache)
    }

    /// same as [FreshnessCache::from_config] but with its own HTTP client
    pub fn from_config_with_default_client (config: &FiresConfig)->Result<Self> {
        let client = create_client( None, config.request_timeout())?;
        FreshnessCache::from_config( config, &client)
    }

    pub fn validity (&self)->Duration { self.validity }

    pub fn state (&self)->Result<CacheState> {
        let state = match self.backend.load()? {
            None => CacheState::Empty,
            Some(entry) if entry.is_fresh( &utc_now(), self.validity) => CacheState::Fresh,
            Some(_) => CacheState::Stale,
        };
        Ok(state)
    }

    /// time of the last successful fetch that is stored in the slot
    pub fn last_update (&self)->Result<Option<DateTime<Utc>>> {
        Ok( self.backend.load()?.map(|e| e.fetched_at) )
    }

    /// get the current fire events. A fresh slot is returned as is unless `force_refresh` is set
    pub async fn get (&self, force_refresh: bool)->Result<FireSnapshot> {
        if !force_refresh {
            match self.backend.load() {
                Ok(Some(entry)) => {
                    let now = utc_now();
                    if entry.is_fresh( &now, self.validity) {
                        info!("using cached fire data ({} min old)", entry.age(&now).as_secs() / 60);
                        return Ok( FireSnapshot::from_entry( entry, DataOrigin::Cache))
                    }
                    debug!("cached fire data is stale");
                }
                Ok(None) => debug!("no cached fire data"),
                Err(e) => warn!("failed to load cached fire data: {e}")
            }
        }

        let primary_err = match self.fetch_from( self.primary.as_ref()).await {
            Ok(normalized) => {
                let entry = CacheEntry::new( normalized.events, utc_now());
                if let Err(e) = self.backend.save( &entry) {
                    warn!("failed to store fire data: {e}");
                }
                let mut snapshot = FireSnapshot::from_entry( entry, DataOrigin::Fetched);
                snapshot.dropped = normalized.dropped;
                return Ok(snapshot)
            }
            Err(e) => e
        };
        warn!("failed to fetch fire data from {}: {primary_err}", self.primary.name());

        match self.backend.load() {
            Ok(Some(entry)) => {
                warn!("serving stale fire data from {}", entry.fetched_at);
                return Ok( FireSnapshot::from_entry( entry, DataOrigin::StaleCache))
            }
            Ok(None) => {}
            Err(e) => warn!("failed to load cached fire data: {e}")
        }

        if let Some(source) = &self.last_resort {
            match self.fetch_from( source.as_ref()).await {
                Ok(normalized) => {
                    warn!("serving fire data from last resort source {}", source.name());
                    return Ok( FireSnapshot { events: normalized.events, fetched_at: None, origin: DataOrigin::LastResort, dropped: normalized.dropped })
                }
                Err(e) => warn!("failed to fetch fire data from last resort source {}: {e}", source.name())
            }
        }

        Err( WastechFiresError::FetchError( format!("no fire data available ({primary_err})")) )
    }

    /// fetch from the primary source even if the cache is fresh
    pub async fn refresh (&self)->Result<FireSnapshot> {
        self.get( true).await
    }

    async fn fetch_from (&self, source: &dyn FeedSource)->Result<Normalized> {
        let raw = source.fetch_raw().await?;
        Ok( normalize( parse( &raw, self.delimiter)) )
    }
}

/* #endregion FreshnessCache */

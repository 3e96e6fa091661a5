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

//! the fire detection ingestion and proximity pipeline: satellite hotspot feeds are fetched
//! ([feed]), split into untyped rows ([parser]), validated into [FireEvent]s ([normalizer]) and
//! kept in a single slot freshness cache ([cache]) from which [proximity] computes distances to
//! a reference location ([location], [geocode]).

use std::{net::SocketAddr, time::Duration};
use serde::{Serialize,Deserialize};
use chrono::{DateTime,Utc};

use wastech_common::{
    datetime::{deserialize_duration, hours, serialize_duration},
    fs::EnvPathBuf,
    geo::GeoPoint,
    is_none,
};

pub mod errors;
pub mod feed;
pub mod parser;
pub mod normalizer;
pub mod cache;
pub mod proximity;
pub mod location;
pub mod geocode;
pub mod server;

use errors::{op_failed, Result};
use feed::FeedSpec;
use geocode::GeocoderConfig;

pub use cache::{CacheBackend, CacheEntry, CacheState, DataOrigin, FireSnapshot, FreshnessCache, KvCacheBackend};
pub use proximity::{classify, IntensityClass, ProximityResult};
pub use location::ReferenceLocation;

wastech_common::define_load_config!{}

/* #region FireEvent ***********************************************************************************************/

/// one detected thermal anomaly. The position is always a valid geographic point, all other fields
/// are descriptive and passed through from the feed on a best effort basis
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
#[serde(rename_all="camelCase")]
pub struct FireEvent {
    pub pos: GeoPoint,

    /// fire radiative power in megawatts. None if the feed did not provide a usable value
    #[serde(skip_serializing_if="is_none", default)]
    pub frp: Option<f64>,

    #[serde(default)]
    pub brightness: f64,

    #[serde(skip_serializing_if="is_none", default)]
    pub confidence: Option<String>,

    #[serde(skip_serializing_if="is_none", default)]
    pub acq_date: Option<String>,

    #[serde(skip_serializing_if="is_none", default)]
    pub acquired: Option<DateTime<Utc>>,
}

impl FireEvent {
    pub fn new (pos: GeoPoint, frp: Option<f64>)->Self {
        FireEvent { pos, frp, brightness: 0.0, confidence: None, acq_date: None, acquired: None }
    }

    #[inline] pub fn latitude (&self)->f64 { self.pos.latitude_degrees() }
    #[inline] pub fn longitude (&self)->f64 { self.pos.longitude_degrees() }

    /// the radiative power with missing values counting as 0 MW
    pub fn radiative_power (&self)->f64 {
        self.frp.unwrap_or(0.0)
    }
}

/* #endregion FireEvent */

/* #region config **************************************************************************************************/

#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct FiresConfig {
    pub primary: FeedSpec,

    /// the local source we use if the primary feed fails and there is no cached data yet
    #[serde(skip_serializing_if="is_none", default)]
    pub last_resort: Option<FeedSpec>,

    #[serde(serialize_with="serialize_duration", deserialize_with="deserialize_duration", default="default_validity")]
    pub validity: Duration,

    /// JSON file for the cache slot. If not set the cache only lives as long as the process
    #[serde(skip_serializing_if="is_none", default)]
    pub cache_file: Option<EnvPathBuf>,

    #[serde(default="default_delimiter")]
    pub delimiter: char,

    #[serde(default="default_radius_km")]
    pub radius_km: f64,

    /// the wider radius within which fires are still reported (but not alerted)
    #[serde(default="default_marker_radius_km")]
    pub marker_radius_km: f64,

    #[serde(skip_serializing_if="is_none", default)]
    pub request_timeout_secs: Option<u64>,

    #[serde(default="default_location_timeout_secs")]
    pub location_timeout_secs: u64,

    #[serde(default)]
    pub geocoder: GeocoderConfig,

    #[serde(skip_serializing_if="is_none", default)]
    pub reference: Option<GeoPoint>,

    #[serde(skip_serializing_if="is_none", default)]
    pub server: Option<SocketAddr>,
}

fn default_validity ()->Duration { hours(4) }
fn default_delimiter ()->char { ',' }
fn default_radius_km ()->f64 { 10.0 }
fn default_marker_radius_km ()->f64 { 300.0 }
fn default_location_timeout_secs ()->u64 { 10 }

impl FiresConfig {
    /// the CSV reader needs a single byte delimiter
    pub fn delimiter_byte (&self)->Result<u8> {
        if self.delimiter.is_ascii() {
            Ok( self.delimiter as u8 )
        } else {
            Err( op_failed!("not an ASCII delimiter: {:?}", self.delimiter) )
        }
    }

    pub fn request_timeout (&self)->Option<Duration> {
        self.request_timeout_secs.map( Duration::from_secs)
    }

    pub fn location_timeout (&self)->Duration {
        Duration::from_secs( self.location_timeout_secs)
    }
}

/* #endregion config */

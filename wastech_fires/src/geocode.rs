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

//! resolve place names into reference locations. We use the
//! [Nominatim](https://nominatim.org/release-docs/latest/api/Search/) search API which requires a
//! meaningful User-Agent header

use std::time::Duration;
use serde::{Serialize,Deserialize};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use wastech_common::{geo::GeoPoint, net::{create_client, get_json}};

use crate::{errors::{op_failed, parse_error, Result, WastechFiresError}, location::ReferenceLocation};

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_USER_AGENT: &str = "wastech-fires/0.1";

#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct GeocoderConfig {
    pub base_url: String,
    pub user_agent: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for GeocoderConfig {
    fn default ()->Self {
        GeocoderConfig {
            base_url: DEFAULT_NOMINATIM_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: Some(10)
        }
    }
}

/// a resolved place
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
#[serde(rename_all="camelCase")]
pub struct GeocodedPlace {
    pub lat: f64,
    pub lng: f64,
    pub display_name: String,
}

impl GeocodedPlace {
    pub fn to_reference_location (&self)->Result<ReferenceLocation> {
        GeoPoint::from_lat_lon_degrees( self.lat, self.lng)
            .map(|pos| ReferenceLocation::with_label( pos, &self.display_name))
            .ok_or_else(|| op_failed!("invalid position for {}: {},{}", self.display_name, self.lat, self.lng))
    }
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// fails with [WastechFiresError::GeocodeNotFound] if there is no match
    async fn resolve (&self, place: &str)->Result<GeocodedPlace>;
}

pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new (client: Client, base_url: impl ToString)->Self {
        NominatimGeocoder { client, base_url: base_url.to_string().trim_end_matches('/').to_string() }
    }

    pub fn from_config (config: &GeocoderConfig)->Result<Self> {
        let client = create_client( Some(&config.user_agent), config.timeout_secs.map( Duration::from_secs))?;
        Ok( NominatimGeocoder::new( client, &config.base_url) )
    }

    pub fn search_url (&self, place: &str)->Result<Url> {
        let url = format!("{}/search", self.base_url);
        Url::parse_with_params( &url, &[("q", place), ("format", "json"), ("limit", "1")])
            .map_err(|e| op_failed!("invalid geocoder url {url}: {e}"))
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn resolve (&self, place: &str)->Result<GeocodedPlace> {
        let place = place.trim();
        if place.is_empty() {
            return Err( WastechFiresError::GeocodeNotFound( "empty place name".to_string()))
        }

        let url = self.search_url( place)?;
        debug!("geocoding {place:?}");
        let hits: Vec<NominatimHit> = get_json( &self.client, url.as_str(), None).await?;
        let resolved = first_hit( place, hits)?;
        info!("resolved {place:?} to {} ({},{})", resolved.display_name, resolved.lat, resolved.lng);
        Ok(resolved)
    }
}

/// the parts of a Nominatim search result we use. Note that coordinates are JSON strings
#[derive(Debug,Deserialize)]
struct NominatimHit {
    lat: String,
    lon: String,
    display_name: String,
}

/// parse the body of a Nominatim search response
pub fn parse_nominatim_response (place: &str, json: &str)->Result<GeocodedPlace> {
    let hits: Vec<NominatimHit> = serde_json::from_str( json)?;
    first_hit( place, hits)
}

fn first_hit (place: &str, hits: Vec<NominatimHit>)->Result<GeocodedPlace> {
    let hit = hits.into_iter().next().ok_or_else(|| WastechFiresError::GeocodeNotFound( place.to_string()))?;

    let lat: f64 = hit.lat.trim().parse().map_err(|_| parse_error!("invalid latitude {:?}", hit.lat))?;
    let lng: f64 = hit.lon.trim().parse().map_err(|_| parse_error!("invalid longitude {:?}", hit.lon))?;

    Ok( GeocodedPlace { lat, lng, display_name: hit.display_name } )
}

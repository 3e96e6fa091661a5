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

//! sources of raw fire detection text. A [FeedSource] only knows how to retrieve the text, it never
//! retries. Falling back to other sources is up to the [crate::cache::FreshnessCache]

use std::{fmt, path::PathBuf, sync::Arc};
use serde::{Serialize,Deserialize};
use async_trait::async_trait;
use reqwest::{header::HeaderMap, Client};
use tracing::debug;

use wastech_common::{
    config::env_secret,
    fs::EnvPathBuf,
    geo::GeoRect,
    net::{get_headermap, get_text},
};
use crate::errors::{op_failed, Result, WastechFiresError};

pub const DEFAULT_FIRMS_URL: &str = "https://firms.modaps.eosdis.nasa.gov";
pub const DEFAULT_MAP_KEY_ENV: &str = "FIRMS_MAP_KEY";
pub const DEFAULT_FIRMS_SOURCE: &str = "VIIRS_SNPP_NRT";

#[async_trait]
pub trait FeedSource: Send + Sync {
    /// for log messages. This must not contain secrets
    fn name (&self)->String;

    async fn fetch_raw (&self)->Result<String>;
}

/* #region file feed ***********************************************************************************************/

/// a local snapshot file
pub struct FileFeed {
    path: PathBuf
}

impl FileFeed {
    pub fn new (path: impl Into<PathBuf>)->Self {
        FileFeed { path: path.into() }
    }
}

#[async_trait]
impl FeedSource for FileFeed {
    fn name (&self)->String { format!("file {:?}", self.path) }

    async fn fetch_raw (&self)->Result<String> {
        debug!("reading fire data from {:?}", self.path);
        Ok( tokio::fs::read_to_string( &self.path).await? )
    }
}

/* #endregion file feed */

/* #region url feed ************************************************************************************************/

/// a remote tabular endpoint that returns the CSV text as is
pub struct UrlFeed {
    client: Client,
    url: String,
    headers: Option<HeaderMap>,
}

impl UrlFeed {
    pub fn new (client: Client, url: impl ToString, headers: Option<HeaderMap>)->Self {
        UrlFeed { client, url: url.to_string(), headers }
    }
}

#[async_trait]
impl FeedSource for UrlFeed {
    fn name (&self)->String { self.url.clone() }

    async fn fetch_raw (&self)->Result<String> {
        debug!("requesting fire data from {}", self.url);
        Ok( get_text( &self.client, &self.url, self.headers.as_ref()).await? )
    }
}

/* #endregion url feed */

/* #region FIRMS area feed *****************************************************************************************/

/// the NASA FIRMS area API which returns hotspots of a given satellite data source within a bounding box
/// see https://firms.modaps.eosdis.nasa.gov/api/area/
pub struct FirmsAreaFeed {
    client: Client,
    base_url: String,
    map_key: String,
    source: String,
    bounds: GeoRect,
    days: u32,
}

impl FirmsAreaFeed {
    pub fn new (client: Client, base_url: impl ToString, map_key: impl ToString, source: impl ToString, bounds: GeoRect, days: u32)->Self {
        FirmsAreaFeed {
            client,
            base_url: base_url.to_string().trim_end_matches('/').to_string(),
            map_key: map_key.to_string(),
            source: source.to_string(),
            bounds,
            days
        }
    }

    pub fn request_url (&self)->String {
        format!("{}/api/area/csv/{}/{}", self.base_url, self.map_key, self.query_path())
    }

    // the part of the URL that is safe to log
    fn query_path (&self)->String {
        let b = &self.bounds;
        format!("{}/{},{},{},{}/{}", self.source, b.west(), b.south(), b.east(), b.north(), self.days)
    }
}

#[async_trait]
impl FeedSource for FirmsAreaFeed {
    fn name (&self)->String { format!("FIRMS {}", self.query_path()) }

    async fn fetch_raw (&self)->Result<String> {
        debug!("requesting FIRMS area data {}", self.query_path());

        // errors must not carry the request URL since it contains the map key
        let response = self.client.get( self.request_url()).send().await
            .map_err(|e| WastechFiresError::NetworkError( format!("{}: {}", self.query_path(), e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            return Err( WastechFiresError::HttpStatusError( format!("response status {} for FIRMS {}", status.as_u16(), self.query_path())))
        }

        response.text().await
            .map_err(|e| WastechFiresError::NetworkError( format!("{}: {}", self.query_path(), e.without_url())))
    }
}

/* #endregion FIRMS area feed */

/* #region feed config *********************************************************************************************/

/// configured source of fire detection text. Note that FIRMS map keys are not part of the config,
/// we only store the name of the environment variable that holds it
#[derive(Debug,Clone,Serialize,Deserialize)]
pub enum FeedSpec {
    File {
        path: EnvPathBuf
    },
    Url {
        url: String,
        #[serde(default)]
        headers: Vec<String>
    },
    FirmsArea {
        #[serde(default="default_firms_url")]
        base_url: String,
        #[serde(default="default_map_key_env")]
        map_key_env: String,
        #[serde(default="default_firms_source")]
        source: String,
        #[serde(default="default_bounds")]
        bounds: GeoRect,
        #[serde(default="default_days")]
        days: u32,
    }
}

fn default_firms_url ()->String { DEFAULT_FIRMS_URL.to_string() }
fn default_map_key_env ()->String { DEFAULT_MAP_KEY_ENV.to_string() }
fn default_firms_source ()->String { DEFAULT_FIRMS_SOURCE.to_string() }
fn default_days ()->u32 { 1 }

/// South America
pub fn default_bounds ()->GeoRect {
    GeoRect::from_wsen_degrees( -74.0, -34.0, -34.0, 5.0).unwrap_or_else(|| unreachable!("static bounds"))
}

impl FeedSpec {
    /// instantiate the source. This fails if a FIRMS feed does not find its map key in the environment
    pub fn create_source (&self, client: &Client)->Result<Arc<dyn FeedSource>> {
        match self {
            FeedSpec::File { path } => {
                Ok( Arc::new( FileFeed::new( path.to_path_buf())) )
            }
            FeedSpec::Url { url, headers } => {
                let headers = if headers.is_empty() { None } else { Some( get_headermap( headers).map_err(|e| op_failed!("invalid feed headers: {e}"))?) };
                Ok( Arc::new( UrlFeed::new( client.clone(), url, headers)) )
            }
            FeedSpec::FirmsArea { base_url, map_key_env, source, bounds, days } => {
                if *days == 0 || *days > 10 {
                    return Err( op_failed!("FIRMS day range has to be within 1..10, got {days}") )
                }
                let map_key = env_secret( map_key_env)?;
                Ok( Arc::new( FirmsAreaFeed::new( client.clone(), base_url, map_key, source, *bounds, *days)) )
            }
        }
    }
}

impl fmt::Display for FeedSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedSpec::File { path } => write!(f, "file {:?}", path.as_path()),
            FeedSpec::Url { url, .. } => write!(f, "{url}"),
            FeedSpec::FirmsArea { source, days, .. } => write!(f, "FIRMS area {source} ({days}d)"),
        }
    }
}

/* #endregion feed config */

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

use std::{fmt, time::Duration};
use serde::{Serialize,Deserialize};
use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use wastech_common::{geo::GeoPoint, is_none};

pub const DEFAULT_LOCATION_TIMEOUT: Duration = Duration::from_secs(10);

/// the point we measure fire distances from. Once obtained it is not modified - a new location
/// means new proximity results
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct ReferenceLocation {
    pos: GeoPoint,
    #[serde(skip_serializing_if="is_none", default)]
    label: Option<String>,
}

impl ReferenceLocation {
    pub fn new (pos: GeoPoint)->Self {
        ReferenceLocation { pos, label: None }
    }

    /// None if the coordinates are not a valid geographic position
    pub fn from_lat_lon (lat: f64, lon: f64)->Option<Self> {
        GeoPoint::from_lat_lon_degrees( lat, lon).map( ReferenceLocation::new)
    }

    pub fn with_label (pos: GeoPoint, label: impl ToString)->Self {
        ReferenceLocation { pos, label: Some(label.to_string()) }
    }

    pub fn position (&self)->&GeoPoint { &self.pos }
    pub fn label (&self)->Option<&str> { self.label.as_deref() }
}

impl fmt::Display for ReferenceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{} {}", label, self.pos),
            None => write!(f, "{}", self.pos)
        }
    }
}

#[derive(Error,Debug,Clone,PartialEq)]
pub enum LocationError {
    #[error("permission denied: {0}")]
    Permission( String ),

    #[error("no location provider available")]
    Unsupported,

    #[error("no location within {0:?}")]
    Timeout( Duration ),
}

/// something that can tell us where the user is
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_location (&self)->Result<ReferenceLocation,LocationError>;
}

/// a location that was configured or given on the command line
pub struct FixedLocationProvider {
    location: ReferenceLocation
}

impl FixedLocationProvider {
    pub fn new (location: ReferenceLocation)->Self {
        FixedLocationProvider { location }
    }
}

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    async fn current_location (&self)->Result<ReferenceLocation,LocationError> {
        Ok( self.location.clone() )
    }
}

/// the provider to use if there is no way to determine the location
pub struct UnsupportedLocationProvider;

#[async_trait]
impl LocationProvider for UnsupportedLocationProvider {
    async fn current_location (&self)->Result<ReferenceLocation,LocationError> {
        Err( LocationError::Unsupported )
    }
}

/// single shot location request that fails with [LocationError::Timeout] if the provider does not
/// answer within `timeout`
pub async fn get_current_location (provider: &dyn LocationProvider, timeout: Duration)->Result<ReferenceLocation,LocationError> {
    match tokio::time::timeout( timeout, provider.current_location()).await {
        Ok(result) => result,
        Err(_) => {
            warn!("location request timed out after {timeout:?}");
            Err( LocationError::Timeout( timeout))
        }
    }
}

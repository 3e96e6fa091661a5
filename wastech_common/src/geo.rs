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

/// this module provides validated geographic positions and areas on a spherical earth model.
/// We use the [geo](https://docs.rs/geo/latest/geo/index.html) crate types as storage and wrap them
/// with the new type pattern so that a `GeoPoint` can only be constructed from finite,
/// in-range degrees. Distances are returned as [uom](https://docs.rs/uom/latest/uom/) lengths.

use std::fmt;
use serde::{Serialize,Deserialize};
use geo::{Coord, Point, Rect};
use uom::si::f64::Length;
use uom::si::length::{meter,kilometer};

use crate::geo_constants::{MEAN_EARTH_RADIUS, MIN_LATITUDE, MAX_LATITUDE, MIN_LONGITUDE, MAX_LONGITUDE};
use crate::{asin, cos, pow2, rad, sin, sqrt};

#[inline]
pub fn is_valid_latitude (lat: f64)->bool {
    lat.is_finite() && lat >= MIN_LATITUDE && lat <= MAX_LATITUDE
}

#[inline]
pub fn is_valid_longitude (lon: f64)->bool {
    lon.is_finite() && lon >= MIN_LONGITUDE && lon <= MAX_LONGITUDE
}

/* #region GeoPoint ***********************************************************************************************/

/// a wrapper for geo::Point that uses geodetic degrees stored as f64 (x: longitude, y: latitude).
/// Instances always have finite coordinates within [-90,90] latitude and [-180,180] longitude
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
#[serde(try_from="LatLonSpec", into="LatLonSpec")]
pub struct GeoPoint(Point);

impl GeoPoint {
    /// the checked ctor - returns None if either coordinate is not finite or out of range
    pub fn from_lat_lon_degrees (lat: f64, lon: f64)->Option<Self> {
        if is_valid_latitude(lat) && is_valid_longitude(lon) {
            Some( GeoPoint( Point::new( lon, lat)) )
        } else {
            None
        }
    }

    #[inline] pub fn latitude_degrees (&self)->f64 { self.0.y() }
    #[inline] pub fn longitude_degrees (&self)->f64 { self.0.x() }

    /// great circle distance based on the haversine formula and the mean earth radius.
    /// There is no ellipsoid correction
    pub fn haversine_distance (&self, other: &GeoPoint)->Length {
        let lat1 = rad( self.latitude_degrees());
        let lat2 = rad( other.latitude_degrees());
        let dlat = lat2 - lat1;
        let dlon = rad( other.longitude_degrees() - self.longitude_degrees());

        let a = pow2( sin(dlat/2.0)) + cos(lat1) * cos(lat2) * pow2( sin(dlon/2.0));
        let c = 2.0 * asin( sqrt( a.clamp(0.0, 1.0)));

        Length::new::<meter>( MEAN_EARTH_RADIUS * c)
    }

    #[inline]
    pub fn haversine_distance_km (&self, other: &GeoPoint)->f64 {
        self.haversine_distance(other).get::<kilometer>()
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.5},{:.5}]", self.latitude_degrees(), self.longitude_degrees())
    }
}

/// the serialized form of a GeoPoint. Note that we accept "lat", "latitude" or "y" for latitude degrees
/// and "lon", "lng", "longitude" or "x" for longitude degrees as input, so that we can directly
/// deserialize geo types and the common web map formats
#[derive(Serialize,Deserialize)]
struct LatLonSpec {
    #[serde(alias="latitude", alias="y")]
    lat: f64,
    #[serde(alias="lng", alias="longitude", alias="x")]
    lon: f64,
}

impl TryFrom<LatLonSpec> for GeoPoint {
    type Error = String;

    fn try_from (spec: LatLonSpec)->Result<Self,Self::Error> {
        GeoPoint::from_lat_lon_degrees( spec.lat, spec.lon)
            .ok_or_else(|| format!("invalid geographic position lat={}, lon={}", spec.lat, spec.lon))
    }
}

impl From<GeoPoint> for LatLonSpec {
    fn from (p: GeoPoint)->Self {
        LatLonSpec { lat: p.latitude_degrees(), lon: p.longitude_degrees() }
    }
}

/* #endregion GeoPoint */

/* #region GeoRect ************************************************************************************************/

/// a geographic bounding box (not crossing the anti-meridian)
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
#[serde(try_from="WsenSpec", into="WsenSpec")]
pub struct GeoRect(Rect);

impl GeoRect {
    pub fn from_wsen_degrees (west: f64, south: f64, east: f64, north: f64)->Option<Self> {
        if is_valid_longitude(west) && is_valid_longitude(east) && is_valid_latitude(south) && is_valid_latitude(north) {
            Some( GeoRect( Rect::new( Coord{x: west, y: south}, Coord{x: east, y: north})) )
        } else {
            None
        }
    }

    #[inline] pub fn west (&self)->f64 { self.0.min().x }
    #[inline] pub fn east (&self)->f64 { self.0.max().x }
    #[inline] pub fn south (&self)->f64 { self.0.min().y }
    #[inline] pub fn north (&self)->f64 { self.0.max().y }

    pub fn contains (&self, p: &GeoPoint)->bool {
        let lat = p.latitude_degrees();
        let lon = p.longitude_degrees();
        lon >= self.west() && lon <= self.east() && lat >= self.south() && lat <= self.north()
    }
}

#[derive(Serialize,Deserialize)]
struct WsenSpec {
    west: f64,
    south: f64,
    east: f64,
    north: f64
}

impl TryFrom<WsenSpec> for GeoRect {
    type Error = String;

    fn try_from (spec: WsenSpec)->Result<Self,Self::Error> {
        GeoRect::from_wsen_degrees( spec.west, spec.south, spec.east, spec.north)
            .ok_or_else(|| format!("invalid bounds [{},{},{},{}]", spec.west, spec.south, spec.east, spec.north))
    }
}

impl From<GeoRect> for WsenSpec {
    fn from (r: GeoRect)->Self {
        WsenSpec { west: r.west(), south: r.south(), east: r.east(), north: r.north() }
    }
}

/* #endregion GeoRect */

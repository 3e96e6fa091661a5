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

//! stateless distance and intensity computations. Callers re-run these whenever the reference location
//! or the event set changes

use std::fmt;
use serde::{Serialize,Deserialize};
use wastech_common::geo::GeoPoint;

use crate::{location::ReferenceLocation, FireEvent};

/// lower bound (inclusive) of the fire radiative power for [IntensityClass::Medium], in MW
pub const MEDIUM_FRP: f64 = 20.0;
/// lower bound (inclusive) of the fire radiative power for [IntensityClass::High], in MW
pub const HIGH_FRP: f64 = 50.0;

#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Serialize,Deserialize)]
pub enum IntensityClass { Low, Medium, High, Unknown }

impl fmt::Display for IntensityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IntensityClass::Low => "low",
            IntensityClass::Medium => "medium",
            IntensityClass::High => "high",
            IntensityClass::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// a zero power reading carries no intensity information and counts as unknown
pub fn classify_frp (frp: Option<f64>)->IntensityClass {
    match frp {
        Some(v) if v.is_nan() || v == 0.0 => IntensityClass::Unknown,
        Some(v) if v >= HIGH_FRP => IntensityClass::High,
        Some(v) if v >= MEDIUM_FRP => IntensityClass::Medium,
        Some(_) => IntensityClass::Low,
        None => IntensityClass::Unknown
    }
}

#[inline]
pub fn classify (event: &FireEvent)->IntensityClass {
    classify_frp( event.frp)
}

/// great circle distance in km
#[inline]
pub fn distance_km (a: &GeoPoint, b: &GeoPoint)->f64 {
    a.haversine_distance_km( b)
}

/// the events within `radius_km` (inclusive) of the reference, in input order
pub fn within_radius<'a> (events: &'a [FireEvent], reference: &ReferenceLocation, radius_km: f64)->Vec<&'a FireEvent> {
    events.iter()
        .filter(|e| distance_km( reference.position(), &e.pos) <= radius_km)
        .collect()
}

/// a fire event annotated with its distance to a reference location. These are computed on demand and never stored
#[derive(Debug,Clone,PartialEq,Serialize)]
#[serde(rename_all="camelCase")]
pub struct ProximityResult {
    #[serde(flatten)]
    pub event: FireEvent,
    pub distance_km: f64,
    pub intensity: IntensityClass,
}

impl ProximityResult {
    pub fn new (event: &FireEvent, reference: &ReferenceLocation)->Self {
        ProximityResult {
            event: event.clone(),
            distance_km: distance_km( reference.position(), &event.pos),
            intensity: classify( event),
        }
    }
}

/// [ProximityResult]s for all events within `radius_km` (inclusive), in input order
pub fn proximity (events: &[FireEvent], reference: &ReferenceLocation, radius_km: f64)->Vec<ProximityResult> {
    events.iter()
        .map(|e| ProximityResult::new( e, reference))
        .filter(|r| r.distance_km <= radius_km)
        .collect()
}

/// the closest event, if there is any
pub fn nearest (events: &[FireEvent], reference: &ReferenceLocation)->Option<ProximityResult> {
    events.iter()
        .map(|e| ProximityResult::new( e, reference))
        .min_by(|a,b| a.distance_km.total_cmp( &b.distance_km))
}

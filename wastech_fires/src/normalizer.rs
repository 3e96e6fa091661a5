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

//! turn untyped rows into [FireEvent]s. Rows without a valid position are dropped and counted,
//! all other fields never cause a row to be dropped

use tracing::{debug, info};
use wastech_common::{datetime::parse_utc_date_hhmm, geo::GeoPoint, if_let};

use crate::{parser::RawRow, FireEvent};

pub const LATITUDE_COLUMNS: &[&str] = &["latitude", "lat", "y"];
pub const LONGITUDE_COLUMNS: &[&str] = &["longitude", "lng", "lon", "long", "x"];
pub const FRP_COLUMNS: &[&str] = &["frp"];
pub const BRIGHTNESS_COLUMNS: &[&str] = &["brightness", "bright_ti4", "bright_t31"];
pub const CONFIDENCE_COLUMNS: &[&str] = &["confidence", "conf"];
pub const DATE_COLUMNS: &[&str] = &["acq_date", "acquisition_date"];
pub const TIME_COLUMNS: &[&str] = &["acq_time"];

/// the valid events in input order plus the number of rows that were discarded
#[derive(Debug,Clone,Default,PartialEq)]
pub struct Normalized {
    pub events: Vec<FireEvent>,
    pub dropped: usize,
}

impl Normalized {
    pub fn len (&self)->usize { self.events.len() }
    pub fn is_empty (&self)->bool { self.events.is_empty() }
}

pub fn normalize<I> (rows: I)->Normalized where I: IntoIterator<Item=RawRow> {
    let mut result = Normalized::default();

    for row in rows {
        match normalize_row( &row) {
            Some(event) => result.events.push( event),
            None => {
                debug!("dropping row without valid position: {row:?}");
                result.dropped += 1;
            }
        }
    }

    info!("normalized {} fire events ({} rows dropped)", result.events.len(), result.dropped);
    result
}

/// None if the row has no parseable, in-range latitude and longitude
pub fn normalize_row (row: &RawRow)->Option<FireEvent> {
    if_let! {
        Some(lat) = { parse_number( row.get_any( LATITUDE_COLUMNS)) } else { None },
        Some(lon) = { parse_number( row.get_any( LONGITUDE_COLUMNS)) } else { None },
        Some(pos) = { GeoPoint::from_lat_lon_degrees( lat, lon) } else { None } => {
            let acq_date = text( row.get_any( DATE_COLUMNS));
            let acquired = acq_date.as_deref().and_then(|d| parse_utc_date_hhmm( d, row.get_any( TIME_COLUMNS)));

            Some( FireEvent {
                pos,
                frp: parse_number( row.get_any( FRP_COLUMNS)).filter(|v| *v >= 0.0),
                brightness: parse_number( row.get_any( BRIGHTNESS_COLUMNS)).unwrap_or(0.0),
                confidence: text( row.get_any( CONFIDENCE_COLUMNS)),
                acq_date,
                acquired,
            })
        }
    }
}

/// finite numbers only ("NaN" and "inf" parse as f64 but are not usable values)
fn parse_number (s: Option<&str>)->Option<f64> {
    s.and_then(|s| s.trim().parse::<f64>().ok()).filter(|v| v.is_finite())
}

fn text (s: Option<&str>)->Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number () {
        assert_eq!( parse_number( Some(" 12.5 ")), Some(12.5));
        assert_eq!( parse_number( Some("NaN")), None);
        assert_eq!( parse_number( Some("inf")), None);
        assert_eq!( parse_number( Some("")), None);
        assert_eq!( parse_number( None), None);
    }
}

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

use chrono::{TimeZone, Utc};
use wastech_fires::{
    classify,
    normalizer::{normalize, normalize_row, Normalized},
    parser::{parse, parse_csv, RawRow},
    proximity::within_radius,
    IntensityClass, ReferenceLocation,
};

#[test]
fn test_parse_zips_headers() {
    let rows: Vec<RawRow> = parse_csv("Latitude, Longitude ,FRP\n-23.5,-46.6,45\n-22.9,-47.0\n1,2,3,4\n").collect();
    assert_eq!( rows.len(), 3);

    assert_eq!( rows[0].get("latitude"), Some("-23.5"));
    assert_eq!( rows[0].get("longitude"), Some("-46.6"));
    assert_eq!( rows[0].get("frp"), Some("45"));

    // short rows lack trailing fields, extra fields are ignored
    assert_eq!( rows[1].get("frp"), None);
    assert_eq!( rows[1].len(), 2);
    assert_eq!( rows[2].len(), 3);
}

#[test]
fn test_parse_delimiter() {
    let rows: Vec<RawRow> = parse("lat;lon;frp\n-23.5;-46.6;45.5\n", b';').collect();
    assert_eq!( rows.len(), 1);
    assert_eq!( rows[0].get("lon"), Some("-46.6"));
    assert_eq!( rows[0].get_any( &["longitude", "lon"]), Some("-46.6"));
}

#[test]
fn test_parse_is_lazy() {
    let mut rows = parse_csv("lat,lon\n1,2\n3,4\n");
    assert_eq!( rows.headers(), &["lat".to_string(), "lon".to_string()]);
    assert_eq!( rows.next().and_then(|r| r.get("lat").map(str::to_string)), Some("1".to_string()));
    assert!( rows.next().is_some());
    assert!( rows.next().is_none());
}

#[test]
fn test_parse_empty() {
    assert_eq!( parse_csv("").count(), 0);
    assert_eq!( parse_csv("lat,lng,frp\n").count(), 0);
}

#[test]
fn test_end_to_end_scenario() {
    let Normalized { events, dropped } = normalize( parse_csv("lat,lng,frp\n-23.5,-46.6,45\n,,\nbad,bad,10"));

    assert_eq!( events.len(), 1);
    assert_eq!( dropped, 2);

    let e = &events[0];
    assert_eq!( e.latitude(), -23.5);
    assert_eq!( e.longitude(), -46.6);
    assert_eq!( e.frp, Some(45.0));
    assert_eq!( classify(e), IntensityClass::Medium);

    let reference = ReferenceLocation::from_lat_lon( -23.5, -46.6).unwrap();
    let nearby = within_radius( &events, &reference, 10.0);
    assert_eq!( nearby.len(), 1);
    assert_eq!( nearby[0], e);
}

#[test]
fn test_out_of_range_positions_are_dropped() {
    let input = "latitude,longitude\n91,0\n-90.5,10\n0,180.1\n0,-181\nNaN,0\n0,inf\n90,180\n-90,-180\n";
    let result = normalize( parse_csv( input));

    assert_eq!( result.dropped, 6);
    assert_eq!( result.len(), 2);
    for e in &result.events {
        assert!( e.latitude().abs() <= 90.0 && e.longitude().abs() <= 180.0);
    }
}

#[test]
fn test_optional_fields_never_drop() {
    let input = "lat,lon,frp,brightness,confidence\n1,2,abc,xyz,\n3,4,-5,310.5,80\n5,6,,,\n";
    let result = normalize( parse_csv( input));

    assert_eq!( result.dropped, 0);
    assert_eq!( result.len(), 3);

    let e0 = &result.events[0];
    assert_eq!( e0.frp, None);
    assert_eq!( e0.radiative_power(), 0.0);
    assert_eq!( e0.brightness, 0.0);
    assert_eq!( e0.confidence, None);
    assert_eq!( classify(e0), IntensityClass::Unknown);

    let e1 = &result.events[1];
    assert_eq!( e1.frp, None); // negative power is not a measurement
    assert_eq!( e1.brightness, 310.5);
    assert_eq!( e1.confidence.as_deref(), Some("80"));
}

#[test]
fn test_order_and_duplicates_preserved() {
    let input = "lat,lon,frp\n1,1,1\n2,2,2\n1,1,1\n3,3,3\n";
    let result = normalize( parse_csv( input));

    let lats: Vec<f64> = result.events.iter().map(|e| e.latitude()).collect();
    assert_eq!( lats, vec![1.0, 2.0, 1.0, 3.0]);
    assert_eq!( result.events[0], result.events[2]);
}

#[test]
fn test_firms_viirs_columns() {
    let input = "latitude,longitude,bright_ti4,scan,track,acq_date,acq_time,satellite,confidence,version,bright_ti5,frp,daynight\n\
                 -9.97322,-67.81049,359.1,0.47,0.40,2025-08-14,0342,N,h,2.0NRT,305.6,84.2,N\n";
    let result = normalize( parse_csv( input));
    assert_eq!( result.len(), 1);

    let e = &result.events[0];
    assert_eq!( e.brightness, 359.1);
    assert_eq!( e.frp, Some(84.2));
    assert_eq!( e.confidence.as_deref(), Some("h"));
    assert_eq!( e.acq_date.as_deref(), Some("2025-08-14"));
    assert_eq!( e.acquired, Some( Utc.with_ymd_and_hms( 2025, 8, 14, 3, 42, 0).unwrap()));
    assert_eq!( classify(e), IntensityClass::High);
}

#[test]
fn test_normalize_row() {
    let row: RawRow = [("y", "-23.5"), ("x", "-46.6"), ("frp", "15")].into_iter().collect();
    let e = normalize_row( &row).unwrap();
    assert_eq!( (e.latitude(), e.longitude()), (-23.5, -46.6));
    assert_eq!( classify(&e), IntensityClass::Low);

    let row: RawRow = [("lat", "-23.5")].into_iter().collect();
    assert!( normalize_row( &row).is_none());
    assert!( normalize_row( &RawRow::default()).is_none());
}

#[test]
fn test_event_json() {
    let result = normalize( parse_csv("lat,lon,frp,acq_date\n-23.5,-46.6,45,2025-08-14\n"));
    let json = serde_json::to_string( &result.events[0]).unwrap();
    assert!( json.contains( r#""pos":{"lat":-23.5,"lon":-46.6}"#));
    assert!( json.contains( r#""acqDate":"2025-08-14""#));

    let event: wastech_fires::FireEvent = serde_json::from_str( &json).unwrap();
    assert_eq!( event, result.events[0]);
}

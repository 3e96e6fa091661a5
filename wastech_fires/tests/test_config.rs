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

use std::time::Duration;
use reqwest::Client;

use wastech_common::{config::from_ron_str, geo::GeoRect};
use wastech_fires::{
    errors::WastechFiresError,
    feed::{default_bounds, FeedSpec, FirmsAreaFeed},
    FiresConfig,
};

const CONFIG: &str = r#"
FiresConfig(
    primary: FirmsArea(
        map_key_env: "WASTECH_TEST_UNSET_MAP_KEY",
        bounds: (west: -74.0, south: -34.0, east: -34.0, north: 5.0),
    ),
    last_resort: Some( File( path: "data/fires.csv")),
    validity: "90min",
    delimiter: ';',
    reference: Some( (lat: -23.5505, lng: -46.6333)),
    server: Some("127.0.0.1:3000"),
)
"#;

#[test]
fn test_config_defaults() {
    let config: FiresConfig = from_ron_str( CONFIG).unwrap();

    assert_eq!( config.validity, Duration::from_secs( 90 * 60));
    assert_eq!( config.delimiter_byte().unwrap(), b';');
    assert_eq!( config.radius_km, 10.0);
    assert_eq!( config.marker_radius_km, 300.0);
    assert_eq!( config.location_timeout(), Duration::from_secs(10));
    assert_eq!( config.request_timeout(), None);
    assert!( config.cache_file.is_none());
    assert_eq!( config.reference.map(|p| p.longitude_degrees()), Some(-46.6333));
    assert_eq!( config.server.map(|a| a.port()), Some(3000));
    assert!( config.geocoder.base_url.contains("nominatim"));

    match &config.primary {
        FeedSpec::FirmsArea { source, days, bounds, .. } => {
            assert_eq!( source, "VIIRS_SNPP_NRT");
            assert_eq!( *days, 1);
            assert_eq!( *bounds, default_bounds());
        }
        other => panic!("unexpected primary feed {other:?}")
    }
}

#[test]
fn test_minimal_config() {
    let config: FiresConfig = from_ron_str( r#"FiresConfig( primary: Url( url: "http://localhost:8080/fires.csv"))"#).unwrap();
    assert_eq!( config.validity, Duration::from_secs( 4 * 3600));
    assert_eq!( config.delimiter, ',');
    assert!( config.last_resort.is_none());

    assert!( from_ron_str::<FiresConfig>( r#"FiresConfig( primary: File( path: "x.csv"), reference: Some((lat: 100.0, lon: 0.0)))"#).is_err());
}

#[test]
fn test_firms_url() {
    let bounds = GeoRect::from_wsen_degrees( -74.0, -34.0, -34.0, 5.0).unwrap();
    let feed = FirmsAreaFeed::new( Client::new(), "https://firms.modaps.eosdis.nasa.gov/", "KEY123", "VIIRS_SNPP_NRT", bounds, 2);
    assert_eq!( feed.request_url(), "https://firms.modaps.eosdis.nasa.gov/api/area/csv/KEY123/VIIRS_SNPP_NRT/-74,-34,-34,5/2");
}

#[test]
fn test_missing_map_key() {
    let config: FiresConfig = from_ron_str( CONFIG).unwrap();
    match config.primary.create_source( &Client::new()) {
        Err(WastechFiresError::ConfigError(_)) => {}
        Err(e) => panic!("expected config error, got {e}"),
        Ok(_) => panic!("map key should not be available")
    }

    // sources that do not need secrets are always created
    assert!( config.last_resort.unwrap().create_source( &Client::new()).is_ok());
}

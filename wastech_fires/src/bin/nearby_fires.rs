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

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wastech_fires::{
    geocode::{Geocoder, NominatimGeocoder},
    load_config,
    location::{get_current_location, FixedLocationProvider, LocationProvider, UnsupportedLocationProvider},
    proximity::{nearest, proximity},
    FiresConfig, FreshnessCache, ReferenceLocation,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = "list fires near a location given as coordinates or place name")]
struct Args {
    #[arg(short,long, default_value = "fires.ron")]
    config: String,

    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// place name to geocode (instead of --lat/--lon)
    #[arg(short,long, conflicts_with_all = ["lat", "lon"])]
    place: Option<String>,

    /// alert radius in km (defaults to config)
    #[arg(short,long)]
    radius: Option<f64>,
}

#[tokio::main]
async fn main()->Result<()> {
    tracing_subscriber::fmt().with_env_filter( EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let config: FiresConfig = load_config( &args.config)?;
    let reference = get_reference( &args, &config).await?;
    let radius_km = args.radius.unwrap_or( config.radius_km);

    let cache = FreshnessCache::from_config_with_default_client( &config)?;
    let snapshot = cache.get( false).await?;
    if snapshot.is_degraded() {
        println!("warning: fire data is from {}", snapshot.origin);
    }

    println!("reference: {reference}");
    let nearby = proximity( &snapshot.events, &reference, config.marker_radius_km);
    println!("{} of {} fires within {} km", nearby.len(), snapshot.events.len(), config.marker_radius_km);
    for r in &nearby {
        println!("  {}  {:>8.2} km  frp: {:>7.1}  {}", r.event.pos, r.distance_km, r.event.radiative_power(), r.intensity);
    }

    let alerts = nearby.iter().filter(|r| r.distance_km <= radius_km).count();
    if alerts > 0 {
        println!("ALERT: {alerts} fire(s) detected less than {radius_km} km from {reference}");
    } else if let Some(closest) = nearest( &snapshot.events, &reference) {
        println!("closest fire is {:.1} km away", closest.distance_km);
    }

    Ok(())
}

/// command line place or coordinates first, then the configured reference location
async fn get_reference (args: &Args, config: &FiresConfig)->Result<ReferenceLocation> {
    if let Some(place) = &args.place {
        let geocoder = NominatimGeocoder::from_config( &config.geocoder)?;
        return Ok( geocoder.resolve( place).await?.to_reference_location()? )
    }

    let provider: Box<dyn LocationProvider> = match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => {
            let loc = ReferenceLocation::from_lat_lon( lat, lon).ok_or_else(|| anyhow!("invalid position {lat},{lon}"))?;
            Box::new( FixedLocationProvider::new( loc))
        }
        _ => match &config.reference {
            Some(pos) => Box::new( FixedLocationProvider::new( ReferenceLocation::new( *pos))),
            None => Box::new( UnsupportedLocationProvider)
        }
    };

    Ok( get_current_location( provider.as_ref(), config.location_timeout()).await? )
}

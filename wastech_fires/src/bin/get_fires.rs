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

use std::collections::BTreeMap;
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wastech_common::datetime::short_utc_datetime_string;
use wastech_fires::{classify, load_config, FiresConfig, FreshnessCache, IntensityClass};

#[derive(Parser, Debug)]
#[command(version, about, long_about = "retrieve current fire detections and print a summary")]
struct Args {
    /// name or path of the RON config
    #[arg(short,long, default_value = "fires.ron")]
    config: String,

    /// fetch even if the cached data is still fresh
    #[arg(short,long)]
    force: bool,

    /// print every fire event
    #[arg(short,long)]
    verbose: bool,
}

#[tokio::main]
async fn main()->Result<()> {
    tracing_subscriber::fmt().with_env_filter( EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let config: FiresConfig = load_config( &args.config)?;
    let cache = FreshnessCache::from_config_with_default_client( &config)?;

    let snapshot = cache.get( args.force).await?;

    let mut classes: BTreeMap<String,usize> = BTreeMap::new();
    for e in &snapshot.events {
        *classes.entry( classify(e).to_string()).or_default() += 1;
        if args.verbose {
            println!("{}  frp: {:>7.1}  class: {}", e.pos, e.radiative_power(), classify(e));
        }
    }

    println!("fires:   {} (from {}, {} rows dropped)", snapshot.events.len(), snapshot.origin, snapshot.dropped);
    for (class, n) in &classes {
        println!("  {class:<8} {n}");
    }
    let high = snapshot.events.iter().filter(|e| classify(e) == IntensityClass::High).count();
    if high > 0 {
        println!("high intensity fires: {high}");
    }

    match cache.last_update()? {
        Some(dt) => println!("last update: {}", short_utc_datetime_string( &dt)),
        None => println!("last update: never")
    }

    Ok(())
}

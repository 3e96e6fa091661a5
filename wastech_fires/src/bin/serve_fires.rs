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

use std::{net::SocketAddr, sync::Arc};
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wastech_fires::{load_config, server::{build_router, serve}, FiresConfig, FreshnessCache};

const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[derive(Parser, Debug)]
#[command(version, about, long_about = "serve fire detections as JSON over HTTP")]
struct Args {
    #[arg(short,long, default_value = "fires.ron")]
    config: String,

    /// socket address to listen on (overrides config)
    #[arg(short,long)]
    addr: Option<SocketAddr>,
}

#[tokio::main]
async fn main()->Result<()> {
    tracing_subscriber::fmt().with_env_filter( EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let config: FiresConfig = load_config( &args.config)?;
    let addr = match args.addr.or( config.server) {
        Some(addr) => addr,
        None => DEFAULT_ADDR.parse()?
    };

    let cache = Arc::new( FreshnessCache::from_config_with_default_client( &config)?);
    let router = build_router( cache, config.radius_km);
    serve( addr, router).await?;

    Ok(())
}

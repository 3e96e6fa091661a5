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

//! a small JSON service on top of the [FreshnessCache]:
//!
//! ```text
//!     GET  /                                  status text
//!     GET  /fires                             the current fire snapshot
//!     GET  /fires/nearby?lat=..&lon=..[&radius=..]  proximity results (radius in km)
//!     POST /fires/refresh                     forced refresh, returns the new snapshot
//! ```
//!
//! If there is no data at all we answer with 503 and a `{"error": ..}` body

use std::{net::SocketAddr, sync::Arc};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Serialize,Deserialize};
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::{
    cache::{DataOrigin, FreshnessCache},
    errors::{Result, WastechFiresError},
    location::ReferenceLocation,
    proximity::{proximity, ProximityResult},
};

#[derive(Clone)]
struct ServerState {
    cache: Arc<FreshnessCache>,
    radius_km: f64,
}

pub fn build_router (cache: Arc<FreshnessCache>, radius_km: f64)->Router {
    Router::new()
        .route("/", get(status_handler))
        .route("/fires", get(fires_handler))
        .route("/fires/nearby", get(nearby_handler))
        .route("/fires/refresh", post(refresh_handler))
        .with_state( ServerState { cache, radius_km })
}

pub async fn serve (addr: SocketAddr, router: Router)->Result<()> {
    let listener = TcpListener::bind( addr).await?;
    info!("serving fire data on http://{addr}");
    axum::serve( listener, router).await?;
    Ok(())
}

#[derive(Debug,Deserialize)]
struct NearbyQuery {
    #[serde(alias="latitude")]
    lat: f64,
    #[serde(alias="lng", alias="longitude")]
    lon: f64,
    radius: Option<f64>,
}

#[derive(Debug,Serialize)]
#[serde(rename_all="camelCase")]
struct NearbyResponse {
    reference: ReferenceLocation,
    radius_km: f64,
    origin: DataOrigin,
    fires: Vec<ProximityResult>,
}

async fn status_handler ()->&'static str {
    "fire data service is running"
}

async fn fires_handler (State(state): State<ServerState>)->Response {
    match state.cache.get( false).await {
        Ok(snapshot) => Json( snapshot).into_response(),
        Err(e) => error_response( e)
    }
}

async fn refresh_handler (State(state): State<ServerState>)->Response {
    match state.cache.refresh().await {
        Ok(snapshot) => Json( snapshot).into_response(),
        Err(e) => error_response( e)
    }
}

async fn nearby_handler (State(state): State<ServerState>, Query(query): Query<NearbyQuery>)->Response {
    let Some(reference) = ReferenceLocation::from_lat_lon( query.lat, query.lon) else {
        return json_error( StatusCode::BAD_REQUEST, format!("invalid position {},{}", query.lat, query.lon))
    };
    let radius_km = query.radius.unwrap_or( state.radius_km);
    if !radius_km.is_finite() || radius_km < 0.0 {
        return json_error( StatusCode::BAD_REQUEST, format!("invalid radius {radius_km}"))
    }

    match state.cache.get( false).await {
        Ok(snapshot) => {
            let fires = proximity( &snapshot.events, &reference, radius_km);
            Json( NearbyResponse { reference, radius_km, origin: snapshot.origin, fires }).into_response()
        }
        Err(e) => error_response( e)
    }
}

fn error_response (e: WastechFiresError)->Response {
    warn!("request failed: {e}");
    // details stay in the log, clients only get the category
    match e {
        WastechFiresError::FetchError(_) => json_error( StatusCode::SERVICE_UNAVAILABLE, "no fire data available".to_string()),
        _ => json_error( StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
    }
}

fn json_error (status: StatusCode, msg: String)->Response {
    (status, Json( json!({ "error": msg }))).into_response()
}

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
use axum::{body::{to_bytes, Body}, http::{Request, StatusCode}, routing::get, Router};
use reqwest::Client;
use tokio::net::TcpListener;
use tower::ServiceExt;

use wastech_common::datetime::hours;
use wastech_fires::{
    errors::WastechFiresError,
    feed::{default_bounds, FeedSource, FirmsAreaFeed, UrlFeed},
    server::build_router,
    DataOrigin, FreshnessCache, KvCacheBackend,
};

const CSV: &str = "latitude,longitude,frp\n-23.55802,-46.58117,27.3\n-22.90671,-47.06025,61.8\n";
const MAP_KEY: &str = "SECRETKEY123";

/// local server that answers `/fires.csv` and fails every other request with 500
async fn spawn_server ()->SocketAddr {
    let router = Router::new()
        .route("/fires.csv", get(|| async { CSV }))
        .fallback(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream failure") });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn( async move { axum::serve( listener, router).await.unwrap() });
    addr
}

/// an address nobody listens on
async fn closed_addr ()->SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

fn firms_feed (base_url: String)->FirmsAreaFeed {
    FirmsAreaFeed::new( Client::new(), base_url, MAP_KEY, "VIIRS_SNPP_NRT", default_bounds(), 1)
}

#[tokio::test]
async fn test_url_feed_ok() {
    let addr = spawn_server().await;
    let feed = Arc::new( UrlFeed::new( Client::new(), format!("http://{addr}/fires.csv"), None));
    assert_eq!( feed.fetch_raw().await.unwrap(), CSV);

    let cache = FreshnessCache::new( Arc::new( KvCacheBackend::in_memory()), feed, hours(4));
    let snapshot = cache.get( false).await.unwrap();
    assert_eq!( snapshot.origin, DataOrigin::Fetched);
    assert_eq!( snapshot.events.len(), 2);
}

#[tokio::test]
async fn test_url_feed_status_error() {
    let addr = spawn_server().await;
    let feed = UrlFeed::new( Client::new(), format!("http://{addr}/missing.csv"), None);

    match feed.fetch_raw().await {
        Err(WastechFiresError::HttpStatusError(_)) => {}
        other => panic!("expected HttpStatusError, got {other:?}")
    }
}

#[tokio::test]
async fn test_url_feed_transport_error() {
    let addr = closed_addr().await;
    let feed = UrlFeed::new( Client::new(), format!("http://{addr}/fires.csv"), None);

    match feed.fetch_raw().await {
        Err(WastechFiresError::NetworkError(_)) => {}
        other => panic!("expected NetworkError, got {other:?}")
    }
}

#[tokio::test]
async fn test_firms_errors_hide_map_key() {
    let addr = spawn_server().await;
    let feed = firms_feed( format!("http://{addr}"));
    assert!( feed.request_url().contains( MAP_KEY));
    assert!( !feed.name().contains( MAP_KEY));

    let err = feed.fetch_raw().await.unwrap_err();
    assert!( matches!( err, WastechFiresError::HttpStatusError(_)));
    assert!( !err.to_string().contains( MAP_KEY));

    let feed = firms_feed( format!("http://{}", closed_addr().await));
    let err = feed.fetch_raw().await.unwrap_err();
    assert!( matches!( err, WastechFiresError::NetworkError(_)));
    assert!( !err.to_string().contains( MAP_KEY));
}

#[tokio::test]
async fn test_firms_failure_response_hides_map_key() {
    let addr = spawn_server().await;
    let cache = Arc::new( FreshnessCache::new( Arc::new( KvCacheBackend::in_memory()), Arc::new( firms_feed( format!("http://{addr}"))), hours(4)));

    let err = cache.get( false).await.unwrap_err();
    assert!( matches!( err, WastechFiresError::FetchError(_)));
    assert!( !err.to_string().contains( MAP_KEY));

    let req = Request::builder().uri("/fires").body( Body::empty()).unwrap();
    let response = build_router( cache, 10.0).oneshot( req).await.unwrap();
    assert_eq!( response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = to_bytes( response.into_body(), usize::MAX).await.unwrap();
    let body = String::from_utf8_lossy( &body);
    assert!( body.contains("no fire data available"));
    assert!( !body.contains( MAP_KEY));
    assert!( !body.contains("127.0.0.1"));
}

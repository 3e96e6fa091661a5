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

use std::sync::Arc;
use async_trait::async_trait;
use axum::{body::{to_bytes, Body}, http::{Request, StatusCode}, Router};
use serde_json::Value;
use tower::ServiceExt;

use wastech_common::datetime::hours;
use wastech_fires::{
    errors::{Result, WastechFiresError},
    feed::FeedSource,
    server::build_router,
    FreshnessCache, KvCacheBackend,
};

struct StaticFeed(Option<&'static str>);

#[async_trait]
impl FeedSource for StaticFeed {
    fn name (&self)->String { "static".to_string() }

    async fn fetch_raw (&self)->Result<String> {
        self.0.map( str::to_string).ok_or_else(|| WastechFiresError::HttpStatusError( "503".to_string()))
    }
}

const CSV: &str = "lat,lon,frp\n-23.55802,-46.58117,27.3\n-22.90671,-47.06025,61.8\n";

fn router (csv: Option<&'static str>)->Router {
    let cache = FreshnessCache::new( Arc::new( KvCacheBackend::in_memory()), Arc::new( StaticFeed(csv)), hours(4));
    build_router( Arc::new( cache), 10.0)
}

async fn request (router: Router, method: &str, uri: &str)->(StatusCode, Vec<u8>) {
    let req = Request::builder().method( method).uri( uri).body( Body::empty()).unwrap();
    let response = router.oneshot( req).await.unwrap();
    let status = response.status();
    let body = to_bytes( response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn request_json (router: Router, method: &str, uri: &str)->(StatusCode, Value) {
    let (status, body) = request( router, method, uri).await;
    (status, serde_json::from_slice( &body).unwrap())
}

#[tokio::test]
async fn test_status() {
    let (status, body) = request( router( Some(CSV)), "GET", "/").await;
    assert_eq!( status, StatusCode::OK);
    assert!( !body.is_empty());
}

#[tokio::test]
async fn test_fires() {
    let (status, json) = request_json( router( Some(CSV)), "GET", "/fires").await;
    assert_eq!( status, StatusCode::OK);
    assert_eq!( json["events"].as_array().map(|a| a.len()), Some(2));
    assert_eq!( json["origin"], "Fetched");
    assert!( json["fetchedAt"].is_string());
}

#[tokio::test]
async fn test_nearby() {
    let (status, json) = request_json( router( Some(CSV)), "GET", "/fires/nearby?lat=-23.5505&lon=-46.6333").await;
    assert_eq!( status, StatusCode::OK);
    assert_eq!( json["radiusKm"], serde_json::json!(10.0));
    let fires = json["fires"].as_array().unwrap();
    assert_eq!( fires.len(), 1);
    assert_eq!( fires[0]["intensity"], "Medium");

    let (_, json) = request_json( router( Some(CSV)), "GET", "/fires/nearby?lat=-23.5505&lng=-46.6333&radius=300").await;
    assert_eq!( json["fires"].as_array().map(|a| a.len()), Some(2));
}

#[tokio::test]
async fn test_nearby_invalid_position() {
    let (status, json) = request_json( router( Some(CSV)), "GET", "/fires/nearby?lat=123&lon=0").await;
    assert_eq!( status, StatusCode::BAD_REQUEST);
    assert!( json["error"].is_string());

    let (status, _) = request( router( Some(CSV)), "GET", "/fires/nearby?lat=abc&lon=0").await;
    assert_eq!( status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_no_data_available() {
    let (status, json) = request_json( router( None), "GET", "/fires").await;
    assert_eq!( status, StatusCode::SERVICE_UNAVAILABLE);
    assert!( json["error"].as_str().unwrap().contains("no fire data"));

    let (status, _) = request( router( None), "POST", "/fires/refresh").await;
    assert_eq!( status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_refresh() {
    let (status, json) = request_json( router( Some(CSV)), "POST", "/fires/refresh").await;
    assert_eq!( status, StatusCode::OK);
    assert_eq!( json["origin"], "Fetched");
    assert_eq!( json["dropped"], 0);
}

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

//! common utility functions for network operations

use std::time::Duration;
use reqwest::{header::{HeaderMap,HeaderName,HeaderValue,ACCEPT}, Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::define_error;

define_error!{ pub NetError =
    HttpError(#[from] reqwest::Error) : "http error: {0}",
    NotFoundError(String) : "not found: {0}",
    StatusError(u16,String) : "response status {0} for {1}",
    HeaderError(String) : "invalid header: {0}"
}

pub type Result<T> = std::result::Result<T, NetError>;

impl NetError {
    /// did we reach the server (i.e. is this a status and not a transport failure)
    pub fn is_status (&self)->bool {
        matches!( self, NetError::NotFoundError(_) | NetError::StatusError(..))
    }
}

/// parse "name: value" header specs
pub fn get_headermap (headers: &[String]) -> Result<HeaderMap> {
    let mut hm = HeaderMap::new();
    for h in headers {
        if let Some(idx) = h.find(':') {
            let k = h[0..idx].trim();
            let v = h[idx+1..].trim();
            hm.append(
                HeaderName::from_bytes( k.as_bytes()).map_err(|e| NetError::HeaderError(e.to_string()))?,
                HeaderValue::from_str(v).map_err(|e| NetError::HeaderError(e.to_string()))?
            );
        }
    }
    Ok(hm)
}

/// create a client with optional user agent and request timeout. If no timeout is given we use the
/// reqwest default (no timeout)
pub fn create_client (user_agent: Option<&str>, timeout: Option<Duration>)->Result<Client> {
    let mut builder = Client::builder();
    if let Some(ua) = user_agent {
        builder = builder.user_agent(ua);
    }
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok( builder.build()? )
}

async fn get_ok_response (client: &Client, url: &str, opt_headers: Option<&HeaderMap>) -> Result<Response> {
    let mut req = client.get(url);
    if let Some(headermap) = opt_headers {
        req = req.headers(headermap.clone())
    }

    let response = req.send().await?;

    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::NOT_FOUND => Err( NetError::NotFoundError( url.to_string())),
        other => Err( NetError::StatusError( other.as_u16(), url.to_string()))
    }
}

/// HTTP GET the response body of the given URL as text. Non-success status codes are errors
pub async fn get_text (client: &Client, url: &str, opt_headers: Option<&HeaderMap>) -> Result<String> {
    let response = get_ok_response( client, url, opt_headers).await?;
    Ok( response.text().await? )
}

/// HTTP GET a JSON response and deserialize it. Non-success status codes are errors
pub async fn get_json<T> (client: &Client, url: &str, opt_headers: Option<&HeaderMap>) -> Result<T> where T: DeserializeOwned {
    let mut headers = opt_headers.cloned().unwrap_or_default();
    headers.insert( ACCEPT, HeaderValue::from_static("application/json"));

    let response = get_ok_response( client, url, Some(&headers)).await?;
    Ok( response.json().await? )
}

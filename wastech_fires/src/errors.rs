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

use thiserror::Error;
use wastech_common::{config::ConfigError, kv_store::KvStoreError, net::NetError};

use crate::location::LocationError;

pub type Result<T> = std::result::Result<T, WastechFiresError>;

#[derive(Error,Debug)]
pub enum WastechFiresError {

    #[error("IO error {0}")]
    IOError( #[from] std::io::Error),

    /// transport failure while reaching a feed or geocoder
    #[error("network error {0}")]
    NetworkError( String ),

    /// the server answered but not with a success status
    #[error("http status error {0}")]
    HttpStatusError( String ),

    #[error("parse error {0}")]
    ParseError( String ),

    #[error("config error {0}")]
    ConfigError( #[from] ConfigError),

    #[error("cache store error {0}")]
    StoreError( #[from] KvStoreError),

    #[error("JSON error {0}")]
    JsonError( #[from] serde_json::Error),

    /// no fresh data, no cached data and no usable last resort source
    #[error("fetch failed {0}")]
    FetchError( String ),

    #[error("place not found: {0}")]
    GeocodeNotFound( String ),

    #[error("location unavailable: {0}")]
    LocationUnavailable( #[from] LocationError),

    #[error("operation failed {0}")]
    OpFailedError( String ),
}

impl From<NetError> for WastechFiresError {
    fn from (e: NetError)->Self {
        if e.is_status() {
            WastechFiresError::HttpStatusError( e.to_string())
        } else {
            WastechFiresError::NetworkError( e.to_string())
        }
    }
}

macro_rules! op_failed {
    ($fmt:literal $(, $arg:expr )* ) => {
        $crate::errors::WastechFiresError::OpFailedError( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use op_failed;

macro_rules! parse_error {
    ($fmt:literal $(, $arg:expr )* ) => {
        $crate::errors::WastechFiresError::ParseError( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use parse_error;

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

//! runtime config management. Configs are RON files that are looked up (in this order) in
//!   - `$WASTECH_ROOT/configs/<crate>/<file>`
//!   - `./configs/<crate>/<file>`
//!   - `./<file>`
//!
//! Secrets (API keys and the like) are never stored in config files. Configs only contain the
//! names of environment variables that hold them, which are resolved with [env_secret]

use std::{env, path::{Path,PathBuf}};
use tracing::debug;

pub use serde::de::DeserializeOwned;

use crate::{define_error, fs};

pub const ROOT_ENV: &str = "WASTECH_ROOT";
pub const CONFIGS: &str = "configs";

define_error!{ pub ConfigError =
    IOError(#[from] std::io::Error) : "IO error: {0}",
    RonError(#[from] ron::error::SpannedError) : "config RON error: {0}",
    NotFoundError(String) : "config not found: {0}",
    MissingSecretError(String) : "secret not set in environment: {0}"
}

pub type Result<T> = std::result::Result<T,ConfigError>;

/// expands into a crate level `load_config(filename)` function that looks up configs for the
/// calling crate. Use at the top of lib.rs:
/// ```ignore
/// wastech_common::define_load_config!{}
/// ...
/// let config: MyConfig = load_config("my_config.ron")?;
/// ```
#[macro_export]
macro_rules! define_load_config {
    () => {
        /// load a RON config for this crate using the standard config lookup
        pub fn load_config<C> (filename: &str) -> $crate::config::Result<C> where C: $crate::config::DeserializeOwned {
            $crate::config::load_crate_config( env!("CARGO_PKG_NAME"), filename)
        }
    }
}

/// the optional root dir set by `WASTECH_ROOT`
pub fn root_dir ()->Option<PathBuf> {
    env::var(ROOT_ENV).ok().map(PathBuf::from)
}

pub fn config_search_path (resource_crate: &str, filename: &str)->Vec<PathBuf> {
    let mut candidates = Vec::with_capacity(3);
    if let Some(root) = root_dir() {
        candidates.push( root.join(CONFIGS).join(resource_crate).join(filename));
    }
    candidates.push( Path::new(CONFIGS).join(resource_crate).join(filename));
    candidates.push( PathBuf::from(filename));
    candidates
}

pub fn find_config_file (resource_crate: &str, filename: &str)->Option<PathBuf> {
    config_search_path( resource_crate, filename).into_iter().find(|p| p.is_file())
}

pub fn load_crate_config<C> (resource_crate: &str, filename: &str)->Result<C> where C: DeserializeOwned {
    let path = find_config_file( resource_crate, filename).ok_or_else(|| ConfigError::NotFoundError(filename.to_string()))?;
    debug!("loading config {:?}", path);
    load_config_path( path)
}

/// this is mostly for tools and tests that use explicit config paths
pub fn load_config_path<C,P> (path: P)->Result<C> where C: DeserializeOwned, P: AsRef<Path> {
    let data = fs::filepath_contents_as_string( &path)?;
    from_ron_str( &data)
}

pub fn from_ron_str<C> (src: &str)->Result<C> where C: DeserializeOwned {
    Ok( ron::from_str( src)? )
}

/// get the value of a secret from the environment variable with the given name
pub fn env_secret (var_name: &str)->Result<String> {
    match env::var(var_name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err( ConfigError::MissingSecretError( var_name.to_string()))
    }
}

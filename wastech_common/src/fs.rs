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

use std::fs::{self,File};
use std::io::{self,Read,Write,ErrorKind};
use std::env;
use std::fmt::Debug;
use std::ops::Deref;
use std::ffi::OsStr;
use std::path::{Path,PathBuf};
use serde::{Serialize,Deserialize,Serializer,Deserializer};

use crate::io_error;

type Result<T> = std::result::Result<T,io::Error>;

pub fn filename<'a,T: AsRef<Path>> (path: &'a T)->Option<&'a str> {
    path.as_ref().file_name().and_then(|ostr| ostr.to_str())
}

pub fn ensure_dir (path: impl AsRef<Path>)->Result<()> {
    let path = path.as_ref();
    if !path.is_dir() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// make sure the parent dir of a file path exists
pub fn ensure_parent_dir (path: impl AsRef<Path>)->Result<()> {
    match path.as_ref().parent() {
        Some(dir) if !dir.as_os_str().is_empty() => ensure_dir(dir),
        _ => Ok(())
    }
}

pub fn file_contents_as_string (file: &mut File) -> Result<String> {
    let len = file.metadata()?.len();
    let mut contents = String::with_capacity(len as usize);
    file.read_to_string(&mut contents)?;
    Ok(contents)
}

pub fn filepath_contents_as_string <P: AsRef<Path>> (path: &P) -> Result<String> {
    let mut file = File::open(path)?;
    file_contents_as_string( &mut file)
}

pub fn filepath_contents <P: AsRef<Path>> (path: &P) -> Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let len = file.metadata()?.len();
    let mut contents: Vec<u8> = Vec::with_capacity(len as usize);
    file.read_to_end(&mut contents)?;
    Ok(contents)
}

/// replace file contents by writing to a sibling temp file first and then renaming it, so that
/// readers never see a partially written file
pub fn set_filepath_contents_atomic (path: impl AsRef<Path>, new_contents: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let fname = filename(&path).ok_or( io_error!(ErrorKind::InvalidInput, "not a file path: {:?}", path))?;
    let tmp_path = path.with_file_name( format!(".{fname}.tmp"));

    ensure_parent_dir(path)?;
    {
        let mut file = File::create(&tmp_path)?;
        file.write_all(new_contents)?;
        file.flush()?;
    }
    fs::rename( &tmp_path, path)
}

/// replace '~/' and '$<name>' path elements
pub fn replace_env_var_path (path: impl AsRef<Path>)->Result<PathBuf> {
    let mut p = PathBuf::new();

    for (n,c) in path.as_ref().iter().enumerate() {
        let e = c.to_str().ok_or( io_error!(ErrorKind::Other, "invalid path: {:?}", path.as_ref()))?;

        if e == "~" && n == 0 {
            p.push( env::var("HOME").map_err( |_| io_error!(ErrorKind::Other, "HOME not set"))?)
        } else if e.starts_with('$') && e.len() > 1 {
            let var = &e[1..];
            p.push( env::var( var).map_err( |_| io_error!(ErrorKind::Other, "{e} not set"))?)
        } else {
            p.push(e)
        }
    }

    Ok(p)
}

/* #region EnvPathBuf *******************************************************************************/

/// a PathBuf that can use env vars as path elements, which are expanded during deserialization
#[derive(Clone,PartialEq)]
pub struct EnvPathBuf(PathBuf);

impl EnvPathBuf {
    pub fn new (path: impl AsRef<Path>)->Result<Self> {
        Ok( EnvPathBuf( replace_env_var_path(path)?) )
    }
}

impl Debug for EnvPathBuf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl Deref for EnvPathBuf {
    type Target = PathBuf;

    fn deref (&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for EnvPathBuf {
    #[inline]
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl AsRef<OsStr> for EnvPathBuf {
    #[inline]
    fn as_ref(&self) -> &OsStr {
        self.0.as_ref()
    }
}

// note this means we serialize the expanded pathbuf
impl Serialize for EnvPathBuf {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> where S: Serializer {
        self.0.serialize( serializer)
    }
}

impl<'de> Deserialize<'de> for EnvPathBuf {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error> where D: Deserializer<'de> {
        let a = String::deserialize(deserializer)?;
        let ep = PathBuf::from(a);
        let p = replace_env_var_path(&ep).map_err(|e| serde::de::Error::custom(format!("failed to expand path {ep:?}: {e}")))?;

        Ok( EnvPathBuf(p) )
    }
}

/* #endregion EnvPathBuf */

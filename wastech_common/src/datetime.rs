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

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serializer, de::Error as DeError};
use std::time::Duration;
use parse_duration::parse;

// simple Duration ctors that do not require to handle leap seconds and the like
#[inline] pub fn secs (n: u64)->Duration { Duration::from_secs(n) }
#[inline] pub fn minutes (n: u64)->Duration { Duration::from_secs(n * 60) }
#[inline] pub fn hours (n: u64)->Duration { Duration::from_secs(n * 3600) }

/// this should be used wherever we might have to use a sim clock instead of wall clock
#[inline]
pub fn utc_now()->DateTime<Utc> {
    Utc::now()
}

/// non-negative duration between two points in time (zero if `dt_later` is before `dt_earlier`)
pub fn duration_since (dt_later: &DateTime<Utc>, dt_earlier: &DateTime<Utc>)->Duration {
    (*dt_later - *dt_earlier).to_std().unwrap_or(Duration::ZERO)
}

/// shift a point in time into the past. Durations that do not fit into a `TimeDelta` saturate
pub fn time_before (dt: &DateTime<Utc>, dur: Duration)->DateTime<Utc> {
    let delta = TimeDelta::from_std(dur).unwrap_or(TimeDelta::MAX);
    dt.checked_sub_signed(delta).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// parse a "%Y-%m-%d" date and an optional "HHMM" or "HH:MM" time of day (both in UTC)
pub fn parse_utc_date_hhmm (date: &str, hhmm: Option<&str>)->Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str( date.trim(), "%Y-%m-%d").ok()?;
    let time = match hhmm.map(|s| s.trim().replace(':', "")) {
        Some(s) if !s.is_empty() => {
            let v: u32 = s.parse().ok()?;
            NaiveTime::from_hms_opt( v / 100, v % 100, 0)?
        }
        _ => NaiveTime::MIN
    };
    Some( date.and_time(time).and_utc() )
}

pub fn short_utc_datetime_string (dt: &DateTime<Utc>) -> String {
    format!("{}", dt.format("%Y-%m-%dT%H:%M:%S%Z"))
}

//--- support for serde

/// deserialize human readable durations such as "4h" or "30min"
pub fn deserialize_duration <'a,D>(deserializer: D) -> Result<Duration,D::Error> where D: Deserializer<'a> {
    String::deserialize(deserializer).and_then( |string| {
        parse(string.as_str()).map_err( |e| DeError::custom(format!("{:?}",e)))
    })
}

pub fn serialize_duration<S: Serializer> (dur: &Duration, s: S) -> Result<S::Ok, S::Error>  {
    let dfm = format!("{}s", dur.as_secs());
    s.serialize_str(&dfm)
}

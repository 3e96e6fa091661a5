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

//! split delimited text into untyped rows. The first line holds the column names, all following lines
//! are zipped with them. This is deliberately permissive - short rows just lack the trailing fields and
//! unreadable records become empty rows. Validation is the job of the [crate::normalizer]

use std::collections::HashMap;
use csv::{ReaderBuilder, StringRecordsIntoIter, Trim};
use tracing::{debug, warn};

/// one untyped record. Column names are lower case
#[derive(Debug,Clone,Default,PartialEq)]
pub struct RawRow {
    fields: HashMap<String,String>
}

impl RawRow {
    pub fn get (&self, column: &str)->Option<&str> {
        self.fields.get(column).map(|s| s.as_str())
    }

    /// the first non-empty value of the given column alternatives
    pub fn get_any (&self, columns: &[&str])->Option<&str> {
        columns.iter()
            .filter_map(|c| self.get(c))
            .find(|v| !v.is_empty())
    }

    pub fn len (&self)->usize { self.fields.len() }
    pub fn is_empty (&self)->bool { self.fields.is_empty() }
}

impl <K,V> FromIterator<(K,V)> for RawRow where K: Into<String>, V: Into<String> {
    fn from_iter<I: IntoIterator<Item=(K,V)>> (iter: I)->Self {
        RawRow { fields: iter.into_iter().map(|(k,v)| (k.into(), v.into())).collect() }
    }
}

/// lazy iterator over the rows of a text. Nothing is parsed before `next()` is called
pub struct RawRows<'a> {
    headers: Vec<String>,
    records: StringRecordsIntoIter<&'a [u8]>,
}

impl <'a> RawRows<'a> {
    pub fn headers (&self)->&[String] { &self.headers }
}

impl <'a> Iterator for RawRows<'a> {
    type Item = RawRow;

    fn next (&mut self)->Option<RawRow> {
        let rec = self.records.next()?;
        match rec {
            Ok(rec) => Some( self.headers.iter().cloned().zip( rec.iter().map(|f| f.to_string())).collect() ),
            Err(e) => {
                debug!("unreadable record: {e}");
                Some( RawRow::default())
            }
        }
    }
}

/// parse `raw` with the given single byte field delimiter
pub fn parse (raw: &str, delimiter: u8)->RawRows<'_> {
    let mut reader = ReaderBuilder::new()
        .delimiter( delimiter)
        .has_headers( true)
        .flexible( true)
        .trim( Trim::All)
        .from_reader( raw.as_bytes());

    let headers = match reader.headers() {
        Ok(rec) => rec.iter().map(|h| h.to_lowercase()).collect(),
        Err(e) => {
            warn!("no readable header line: {e}");
            Vec::new()
        }
    };

    RawRows { headers, records: reader.into_records() }
}

/// parse comma separated text
#[inline]
pub fn parse_csv (raw: &str)->RawRows<'_> {
    parse( raw, b',')
}

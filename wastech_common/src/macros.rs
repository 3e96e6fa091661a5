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

/// macro to flatten nested "if let .." trees. Each arm is a `pattern = expr` binding, the last one
/// is followed by `=> result`. Arms can have an `else` clause (both the match expression and the
/// else clause have to be blocks then) to provide a value or side effect for a failed match:
/// ```
/// use wastech_common::if_let;
///
/// fn field (s: Option<&str>)->Option<f64> { s.and_then(|s| s.trim().parse().ok()) }
///
/// let lat = Some("-23.5");
/// let lon = Some("-46.6");
///
/// let pos = if_let! {
///     Some(lat) = { field(lat) } else { None },
///     Some(lon) = { field(lon) } else { None } => {
///         Some((lat,lon))
///     }
/// };
/// assert_eq!( pos, Some((-23.5,-46.6)));
/// ```
#[macro_export]
macro_rules! if_let {
    //--- the leafs
    { $p:pat = $x:block else $e:block => $r:expr } => {
        if let $p = $x { $r } else $e
    };
    { $p:pat = $x:block else $closure:expr => $r:expr } => {
        match $x {
            $p => { $r }
            other => { $closure( other) }
        }
    };
    { $p:pat = $x:expr => $r:expr } => {
        if let $p = $x { $r }
    };

    //--- the recursive tt munchers
    { $p:pat = $x:block else $e:block , $($ts:tt)+ } => {
        if let $p = $x { $crate::if_let! { $($ts)+ } } else $e
    };
    { $p:pat = $x:block else $closure:expr , $($ts:tt)+ } => {
        match $x {
            $p => { $crate::if_let! { $($ts)+ } }
            other => { $closure( other) } // 'other' is the failed match value, not an Error
        }
    };
    { $p:pat = $x:expr , $($ts:tt)+ } => {
        if let $p = $x {
            $crate::if_let! { $($ts)+ }
        }
    };
}
pub use if_let;

#[macro_export]
macro_rules! io_error {
    ( $kind:expr, $fmt:literal $(, $($arg:expr),* )? ) =>
    {
        std::io::Error::new( $kind, format!($fmt, $( $($arg),* )?))
    }
}
pub use io_error;

/// syntactic sugar macro to define thiserror Error enums:
/// ```
/// use wastech_common::define_error;
///
/// define_error!{ pub StoreError =
///   IOError( #[from] std::io::Error ) : "IO error: {0}",
///   OpFailed(String) : "operation failed: {0}"
/// }
/// ```
/// expands into a `#[derive(thiserror::Error,Debug)]` enum with one `#[error(..)]` attribute per variant.
/// Crates using this macro need a `thiserror` dependency
#[macro_export]
macro_rules! define_error {
    ($vis:vis $name:ident = $( $err_variant:ident ( $( $( #[$meta:meta] )? $field_type:ty),* ) : $msg_lit:literal ),* $(,)?) => {
        #[derive(thiserror::Error,Debug)]
        $vis enum $name {
            $(
                #[error($msg_lit)]
                $err_variant ( $( $(#[$meta])? $field_type ),*  )
            ),*
        }
    }
}
pub use define_error;

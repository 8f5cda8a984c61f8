// Copyright 2019 Conflux Foundation. All rights reserved.
// Conflux is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

#[macro_export]
macro_rules! unwrap_or_return {
    ($option:expr) => {
        match $option {
            Some(val) => val,
            None => return Default::default(),
        }
    };
    ($option:expr, $ret:expr) => {
        match $option {
            Some(val) => val,
            None => return $ret,
        }
    };
}

/// Unwraps an `Ok` value, or returns the inner `Err` wrapped in an outer
/// `Ok`. Used by checks of the form `DbResult<Result<T, Outcome>>`.
#[macro_export]
macro_rules! early_return_on_err {
    ($e:expr) => {
        match $e {
            Ok(x) => x,
            Err(outcome) => {
                return Ok(Err(outcome));
            }
        }
    };
}

// Copyright 2019 Conflux Foundation. All rights reserved.
// Conflux is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use crate::{
    types::{Address, U256},
    vm::ResultCode,
};
use thiserror::Error;

/// Failures of the state store. Balance and nonce arithmetic is checked,
/// so an overflow or an underflow surfaces here instead of wrapping.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("balance of {0:?} overflows")]
    BalanceOverflow(Address),

    #[error("balance of {address:?} is {got}, cannot subtract {required}")]
    BalanceUnderflow {
        address: Address,
        required: U256,
        got: U256,
    },

    #[error("nonce of {0:?} overflows")]
    NonceOverflow(Address),

    #[error("backend failure: {0}")]
    Backend(String),
}

pub type DbResult<T> = Result<T, StateError>;

/// A malformed wire buffer. Decoding never truncates or zero-fills.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error(
        "truncated buffer: {field} needs {needed} bytes, {available} available"
    )]
    Truncated {
        field: &'static str,
        needed: usize,
        available: usize,
    },

    #[error("{field} declares {declared} bytes, {available} available")]
    LengthMismatch {
        field: &'static str,
        declared: usize,
        available: usize,
    },

    #[error("{0} trailing bytes after the last field")]
    TrailingBytes(usize),

    #[error("unknown result code {0}")]
    UnknownResultCode(i32),

    #[error("unknown call kind {0}")]
    UnknownCallKind(u32),
}

/// A value that does not fit its wire field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("{field} of {len} bytes does not fit a 4-byte length prefix")]
    TooLong { field: &'static str, len: usize },
}

/// Programming errors of the executor. A business outcome of a transaction,
/// including every rejection and failure, is reported through a receipt and
/// never through this type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExecutorError {
    #[error(transparent)]
    State(#[from] StateError),

    #[error("malformed interpreter output: {0}")]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("interpreter reports {remaining} energy remaining of {limit}")]
    EnergyOverflow { remaining: u64, limit: u64 },

    #[error("result code {0} cannot come out of an execution")]
    UnexpectedResultCode(ResultCode),

    #[error("cannot start the frame thread: {0}")]
    FrameThread(String),
}

pub type ExecutorResult<T> = Result<T, ExecutorError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{name}: min {min} exceeds max {max}")]
    InvalidRange { name: &'static str, min: u64, max: u64 },
}

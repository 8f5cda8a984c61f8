// Copyright 2019 Conflux Foundation. All rights reserved.
// Conflux is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use crate::types::Bytes;
use strum_macros::{Display, EnumIter, IntoStaticStr};

/// Closed set of outcomes of an execution. The discriminants are the values
/// used on the wire.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, EnumIter,
)]
#[repr(i32)]
pub enum ResultCode {
    Success = 0,
    Failure = 1,
    OutOfEnergy = 2,
    BadInstruction = 3,
    BadJumpDestination = 4,
    StackOverflow = 5,
    StackUnderflow = 6,
    Revert = 7,
    InvalidNonce = 8,
    InvalidEnergyLimit = 9,
    InsufficientBalance = 10,
    ContractAlreadyExists = 11,
    InternalError = 12,
}

/// How the executor finalizes a result code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeClass {
    Success,
    /// A precondition failed before any state was touched.
    Rejected,
    /// Code ran but did not succeed.
    Failed,
}

impl ResultCode {
    #[inline]
    pub fn to_i32(self) -> i32 { self as i32 }

    pub fn from_i32(value: i32) -> Option<Self> {
        use ResultCode::*;
        Some(match value {
            0 => Success,
            1 => Failure,
            2 => OutOfEnergy,
            3 => BadInstruction,
            4 => BadJumpDestination,
            5 => StackOverflow,
            6 => StackUnderflow,
            7 => Revert,
            8 => InvalidNonce,
            9 => InvalidEnergyLimit,
            10 => InsufficientBalance,
            11 => ContractAlreadyExists,
            12 => InternalError,
            _ => return None,
        })
    }

    #[inline]
    pub fn is_success(self) -> bool { self == ResultCode::Success }

    pub fn outcome_class(self) -> OutcomeClass {
        match self {
            ResultCode::Success => OutcomeClass::Success,
            ResultCode::InvalidNonce
            | ResultCode::InvalidEnergyLimit
            | ResultCode::InsufficientBalance => OutcomeClass::Rejected,
            _ => OutcomeClass::Failed,
        }
    }

    /// Whether unused energy goes back to the sender.
    #[inline]
    pub fn refunds_energy(self) -> bool {
        matches!(self, ResultCode::Success | ResultCode::Revert)
    }

    /// Label carried by a receipt: empty exactly on success, the code's name
    /// otherwise.
    pub fn error_label(self) -> &'static str {
        if self.is_success() {
            ""
        } else {
            self.into()
        }
    }
}

/// Outcome of one execution, as returned by the interpreter or a precompiled
/// contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub code: ResultCode,
    pub energy_remaining: u64,
    pub output: Bytes,
}

impl ExecutionResult {
    pub fn new(code: ResultCode, energy_remaining: u64, output: Bytes) -> Self {
        ExecutionResult {
            code,
            energy_remaining,
            output,
        }
    }

    pub fn success(energy_remaining: u64, output: Bytes) -> Self {
        Self::new(ResultCode::Success, energy_remaining, output)
    }

    /// A result consuming all the energy it was given.
    pub fn exhausted(code: ResultCode) -> Self { Self::new(code, 0, vec![]) }

    pub fn out_of_energy() -> Self { Self::exhausted(ResultCode::OutOfEnergy) }

    #[inline]
    pub fn is_success(&self) -> bool { self.code.is_success() }
}

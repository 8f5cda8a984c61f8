// Copyright 2019 Conflux Foundation. All rights reserved.
// Conflux is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use super::receipt::Receipt;
use crate::{
    substate::Substate,
    transaction::Transaction,
    types::{Address, Bytes, U256},
    vm::ResultCode,
};
use thiserror::Error;

#[derive(Debug)]
pub enum ExecutionOutcome {
    /// Rejected by validation. Nothing was charged.
    NotExecuted(RejectError),
    /// Ran and did not succeed. The energy charge stands.
    ExecutionError(ResultCode, Executed),
    Finished(Executed),
}
use ExecutionOutcome::*;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RejectError {
    /// Returned when transaction nonce does not match state nonce.
    #[error("invalid nonce: expected {expected}, got {got}")]
    InvalidNonce { expected: U256, got: U256 },

    /// The limit lies outside the range for its transaction kind, beyond
    /// the energy left in the block, or below the intrinsic cost.
    #[error("invalid energy limit {limit}, allowed [{min}, {max}]")]
    InvalidEnergyLimit { limit: u64, min: u64, max: u64 },

    /// Returned when `energy_limit * energy_price + value` exceeds the
    /// sender balance.
    #[error("insufficient balance: required {required}, got {got}")]
    InsufficientBalance { required: U256, got: U256 },
}

impl RejectError {
    pub fn result_code(&self) -> ResultCode {
        match self {
            RejectError::InvalidNonce { .. } => ResultCode::InvalidNonce,
            RejectError::InvalidEnergyLimit { .. } => {
                ResultCode::InvalidEnergyLimit
            }
            RejectError::InsufficientBalance { .. } => {
                ResultCode::InsufficientBalance
            }
        }
    }
}

/// Accounting of an executed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Energy {
    pub used: u64,
    /// `energy_limit * energy_price`, debited before dispatch.
    pub charged: U256,
    /// `(energy_limit - used) * energy_price`, returned to the sender.
    pub refund: U256,
    /// `used * energy_price`, paid to the coinbase.
    pub fee: U256,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Executed {
    pub energy: Energy,
    pub output: Bytes,
    /// Side effects. Only records of rejected internal transactions survive
    /// a failed execution.
    pub substate: Substate,
    /// Address of the created contract, set on successful creates.
    pub contract_address: Option<Address>,
}

impl ExecutionOutcome {
    #[inline]
    pub fn result_code(&self) -> ResultCode {
        match self {
            NotExecuted(e) => e.result_code(),
            ExecutionError(code, _) => *code,
            Finished(_) => ResultCode::Success,
        }
    }

    #[inline]
    pub fn try_as_executed(&self) -> Option<&Executed> {
        match self {
            NotExecuted(_) => None,
            ExecutionError(_, executed) | Finished(executed) => Some(executed),
        }
    }

    pub fn make_receipt(self, tx: &Transaction) -> Receipt {
        let result_code = self.result_code();
        let transaction_hash = tx.hash();
        let executed = match self {
            NotExecuted(_) => {
                return Receipt::rejected(transaction_hash, result_code)
            }
            ExecutionError(_, executed) | Finished(executed) => executed,
        };

        let Executed {
            energy,
            output,
            substate,
            contract_address,
        } = executed;
        Receipt {
            transaction_hash,
            result_code,
            energy_used: energy.used,
            output,
            error: result_code.error_label().into(),
            logs: substate.logs,
            internal_transactions: substate.internal_transactions,
            deleted_accounts: substate.deleted_accounts.into_iter().collect(),
            contract_address,
        }
    }

    #[inline]
    pub fn log(&self, tx: &Transaction) {
        match self {
            NotExecuted(e) => {
                debug!("tx not executed: err={:?}, transaction={:?}", e, tx);
            }
            ExecutionError(code, executed) => {
                debug!(
                    "tx execution error: code={}, energy_used={}, \
                     transaction={:?}",
                    code, executed.energy.used, tx
                );
            }
            Finished(executed) => {
                trace!(
                    "tx executed successfully: result={:?}, transaction={:?}",
                    executed,
                    tx
                );
            }
        }
    }
}

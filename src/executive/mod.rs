// Copyright 2019 Conflux Foundation. All rights reserved.
// Conflux is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

pub mod execution_outcome;
mod fresh_executive;
mod pre_checked_executive;
pub mod receipt;
#[cfg(test)]
pub(crate) mod test_util;
pub mod transact_options;

use fresh_executive::FreshExecutive;

pub use execution_outcome::{Energy, Executed, ExecutionOutcome, RejectError};
pub use receipt::Receipt;
pub use transact_options::TransactSettings;

use crate::{
    error::ExecutorResult, machine::Machine, params::ExecutorParams,
    state::StateStore, transaction::Transaction, vm::BlockContext,
};

/// Transaction executor.
pub struct ExecutiveContext<'a> {
    state: &'a mut dyn StateStore,
    block: &'a BlockContext,
    machine: &'a Machine,
}

impl<'a> ExecutiveContext<'a> {
    pub fn new(
        state: &'a mut dyn StateStore, block: &'a BlockContext,
        machine: &'a Machine,
    ) -> Self {
        ExecutiveContext {
            state,
            block,
            machine,
        }
    }

    /// Runs `tx` against the state. A rejected or failed transaction is an
    /// `Ok` outcome; `Err` is reserved for errors of the executor itself,
    /// in which case nothing has been written to the state.
    pub fn transact(
        self, tx: &'a Transaction, settings: TransactSettings,
    ) -> ExecutorResult<ExecutionOutcome> {
        let fresh_exec = FreshExecutive::new(self, tx, settings);

        let outcome = match fresh_exec.check_all()? {
            Ok(executive) => executive.execute_transaction()?,
            Err(execution_outcome) => execution_outcome,
        };
        outcome.log(tx);
        Ok(outcome)
    }
}

/// The intrinsic energy cost of a transaction, `None` if it does not fit in
/// a `u64`.
pub fn energy_required_for(
    is_create: bool, data: &[u8], params: &ExecutorParams,
) -> Option<u64> {
    let schedule = &params.energy;
    let init_energy = if is_create {
        schedule
            .contract_creation_fee
            .checked_add(schedule.transaction_base_fee)?
    } else {
        schedule.transaction_base_fee
    };

    let zeros = data.iter().filter(|b| **b == 0).count() as u64;
    let non_zeros = data.len() as u64 - zeros;
    let data_energy = zeros
        .checked_mul(schedule.zero_byte_fee)?
        .checked_add(non_zeros.checked_mul(schedule.non_zero_byte_fee)?)?;

    init_energy.checked_add(data_energy)
}

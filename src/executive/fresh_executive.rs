// Copyright 2019 Conflux Foundation. All rights reserved.
// Conflux is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use super::{
    energy_required_for,
    execution_outcome::{ExecutionOutcome, RejectError},
    pre_checked_executive::PreCheckedExecutive,
    transact_options::TransactSettings,
    ExecutiveContext,
};
use crate::{
    early_return_on_err,
    params::EnergyRange,
    state::{DbResult, StateExt},
    transaction::Transaction,
    types::{word_to_u256, U256},
};

pub(super) struct FreshExecutive<'a> {
    context: ExecutiveContext<'a>,
    tx: &'a Transaction,
    settings: TransactSettings,
    base_energy: Option<u64>,
}

impl<'a> FreshExecutive<'a> {
    pub fn new(
        context: ExecutiveContext<'a>, tx: &'a Transaction,
        settings: TransactSettings,
    ) -> Self {
        let base_energy = energy_required_for(
            tx.is_create(),
            &tx.data,
            context.machine.params(),
        );
        FreshExecutive {
            context,
            tx,
            settings,
            base_energy,
        }
    }

    /// Read-only validation. The checks run in a fixed order and the first
    /// failing one decides the rejection.
    pub(super) fn check_all(
        self,
    ) -> DbResult<Result<PreCheckedExecutive<'a>, ExecutionOutcome>> {
        if !self.settings.local_call {
            early_return_on_err!(self.check_energy_limit());
            early_return_on_err!(self.check_nonce()?);
            early_return_on_err!(self.check_balance()?);
        }

        Ok(Ok(self.into_pre_checked()))
    }

    fn into_pre_checked(self) -> PreCheckedExecutive<'a> {
        PreCheckedExecutive {
            context: self.context,
            tx: self.tx,
            settings: self.settings,
            base_energy: self.base_energy.unwrap_or(u64::MAX),
        }
    }
}

impl<'a> FreshExecutive<'a> {
    /// The limit must lie in the range for its transaction kind, fit in the
    /// block's remaining energy and cover the intrinsic cost.
    fn check_energy_limit(&self) -> Result<(), ExecutionOutcome> {
        let limit = self.tx.energy_limit;
        let range = self
            .context
            .machine
            .params()
            .energy_range(self.tx.is_create());
        let allowed = EnergyRange::new(
            range.min.max(self.base_energy.unwrap_or(u64::MAX)),
            range.max.min(self.context.block.energy_available),
        );

        if !allowed.contains(limit) {
            return Err(ExecutionOutcome::NotExecuted(
                RejectError::InvalidEnergyLimit {
                    limit,
                    min: allowed.min,
                    max: allowed.max,
                },
            ));
        }
        Ok(())
    }

    fn check_nonce(&self) -> DbResult<Result<(), ExecutionOutcome>> {
        let tx = self.tx;
        let nonce = self.context.state.nonce(&tx.sender)?;
        Ok(if tx.nonce != nonce {
            Err(ExecutionOutcome::NotExecuted(RejectError::InvalidNonce {
                expected: nonce,
                got: tx.nonce,
            }))
        } else {
            Ok(())
        })
    }

    /// `energy_limit * energy_price + value` cannot overflow: the product
    /// has at most 192 bits and the value 128.
    fn check_balance(&self) -> DbResult<Result<(), ExecutionOutcome>> {
        let tx = self.tx;
        let balance = self.context.state.balance(&tx.sender)?;
        let required = U256::from(tx.energy_limit)
            * word_to_u256(&tx.energy_price)
            + word_to_u256(&tx.value);

        Ok(if balance < required {
            Err(ExecutionOutcome::NotExecuted(
                RejectError::InsufficientBalance {
                    required,
                    got: balance,
                },
            ))
        } else {
            Ok(())
        })
    }
}

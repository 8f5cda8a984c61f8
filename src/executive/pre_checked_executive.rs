// Copyright 2019 Conflux Foundation. All rights reserved.
// Conflux is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use super::{
    execution_outcome::{Energy, Executed, ExecutionOutcome},
    transact_options::TransactSettings,
    ExecutiveContext,
};
use crate::{
    error::{ExecutorError, ExecutorResult},
    stack::{accrue_substate, exec_top_frame, RuntimeRes},
    state::{Layer, StateExt, StateStore},
    substate::Substate,
    transaction::{Action, Transaction},
    types::{contract_address, word_to_u256, U256},
    vm::{BlockContext, CallKind, ExecutionContext, OutcomeClass},
};

/// A transaction that passed validation: charges it, runs it and settles
/// the energy accounting.
pub(super) struct PreCheckedExecutive<'a> {
    pub context: ExecutiveContext<'a>,
    pub tx: &'a Transaction,
    pub settings: TransactSettings,
    pub base_energy: u64,
}

impl<'a> PreCheckedExecutive<'a> {
    pub fn execute_transaction(self) -> ExecutorResult<ExecutionOutcome> {
        let PreCheckedExecutive {
            context:
                ExecutiveContext {
                    state,
                    block,
                    machine,
                },
            tx,
            settings,
            base_energy,
        } = self;
        let local = settings.local_call;
        let price = word_to_u256(&tx.energy_price);
        let charged = if local {
            U256::zero()
        } else {
            U256::from(tx.energy_limit) * price
        };

        // Every write of the transaction lands here first. Nothing reaches
        // `state` before the final commit.
        let mut tracking = Layer::new(state);

        // Irrevocable part: nonce bump and the full energy charge.
        let mut charge = tracking.derive_child();
        if settings.bump_nonce && !local {
            charge.inc_nonce(&tx.sender)?;
        }
        charge.sub_balance(&tx.sender, &charged)?;
        charge.commit()?;

        let context = Self::make_context(tx, block, base_energy);
        let mut res = RuntimeRes::new(machine);
        let mut frame_return = {
            let mut work = tracking.derive_child();
            let frame_return = exec_top_frame(&context, &mut work, &mut res)?;
            if frame_return.apply_state {
                work.commit()?;
            }
            frame_return
        };
        let mut substate = Substate::new();
        accrue_substate(&mut substate, &mut frame_return);

        let result = frame_return.result;
        let code = result.code;
        if code.outcome_class() == OutcomeClass::Rejected {
            return Err(ExecutorError::UnexpectedResultCode(code));
        }

        let used = tx.energy_limit - result.energy_remaining;
        let (refund, fee) = if local {
            (U256::zero(), U256::zero())
        } else {
            let refund = if code.refunds_energy() {
                U256::from(result.energy_remaining) * price
            } else {
                U256::zero()
            };
            (refund, U256::from(used) * price)
        };
        tracking.add_balance(&tx.sender, &refund)?;
        tracking.add_balance(&block.env.coinbase, &fee)?;

        if code.is_success() {
            for address in &substate.deleted_accounts {
                tracking.delete_account(address)?;
            }
        }

        if local {
            tracking.rollback();
        } else {
            tracking.commit()?;
        }

        let contract_address = if code.is_success() && context.is_create() {
            Some(context.destination)
        } else {
            None
        };
        let executed = Executed {
            energy: Energy {
                used,
                charged,
                refund,
                fee,
            },
            output: result.output,
            substate,
            contract_address,
        };
        Ok(if code.is_success() {
            ExecutionOutcome::Finished(executed)
        } else {
            ExecutionOutcome::ExecutionError(code, executed)
        })
    }

    /// The top-level frame. Energy available to it is the limit minus the
    /// intrinsic cost; a create targets the address derived from the
    /// sender and the transaction nonce.
    fn make_context(
        tx: &Transaction, block: &BlockContext, base_energy: u64,
    ) -> ExecutionContext {
        let (kind, destination) = match tx.action {
            Action::Create => {
                (CallKind::Create, contract_address(&tx.sender, &tx.nonce))
            }
            Action::Call(address) => (CallKind::Call, address),
        };
        ExecutionContext {
            transaction_hash: tx.hash(),
            destination,
            origin: tx.sender,
            caller: tx.sender,
            energy_price: tx.energy_price,
            energy_limit: tx.energy_limit.saturating_sub(base_energy),
            value: tx.value,
            data: tx.data.clone(),
            depth: 0,
            kind,
            flags: 0,
            env: block.env.clone(),
        }
    }
}

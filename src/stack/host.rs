// Copyright 2019 Conflux Foundation. All rights reserved.
// Conflux is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use super::{accrue_substate, exec_frame, RuntimeRes};
use crate::{
    error::{ExecutorError, ExecutorResult},
    state::{Layer, StateExt, StateStore, StateView},
    substate::{CallRecord, InternalTransaction, Substate},
    types::{
        contract_address, word_to_u256, Address, Bytes, StorageKey,
        StorageValue, U256,
    },
    vm::{
        ExecutionContext, ExecutionResult, Host, HostError, HostResult,
        ResultCode, STATIC_FLAG,
    },
    wire,
};
use std::cell::RefCell;

/// The [`Host`] served to the interpreter while it runs one frame.
///
/// A state error, or a malformed nested context, aborts the frame: the
/// failing callback and every later one return [`HostError::Aborted`], and
/// [`FrameHost::finish`] surfaces the error once the interpreter returns.
pub struct FrameHost<'h, 'm> {
    context: &'h ExecutionContext,
    state: &'h mut dyn StateStore,
    res: &'h mut RuntimeRes<'m>,
    substate: &'h mut Substate,
    fatal: RefCell<Option<ExecutorError>>,
}

impl<'h, 'm> FrameHost<'h, 'm> {
    pub fn new(
        context: &'h ExecutionContext, state: &'h mut dyn StateStore,
        res: &'h mut RuntimeRes<'m>, substate: &'h mut Substate,
    ) -> Self {
        FrameHost {
            context,
            state,
            res,
            substate,
            fatal: RefCell::new(None),
        }
    }

    /// Consumes the host, returning the error that aborted the frame if
    /// there was one.
    pub fn finish(self) -> ExecutorResult<()> {
        match self.fatal.into_inner() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn check_alive(&self) -> HostResult<()> {
        if self.fatal.borrow().is_some() {
            warn!(
                "host callback after abort in {:?}",
                self.context.destination
            );
            return Err(HostError::Aborted);
        }
        Ok(())
    }

    fn check_mutable(&self) -> HostResult<()> {
        self.check_alive()?;
        if self.context.is_static() {
            warn!(
                "state modification in static frame {:?}",
                self.context.destination
            );
            return Err(HostError::StaticContext);
        }
        Ok(())
    }

    fn guard<T, E: Into<ExecutorError>>(
        &self, result: Result<T, E>,
    ) -> HostResult<T> {
        result.map_err(|e| {
            let e = e.into();
            warn!("frame {:?} aborted: {}", self.context.destination, e);
            *self.fatal.borrow_mut() = Some(e);
            HostError::Aborted
        })
    }

    /// Runs a nested frame. The caller, origin, price, block snapshot and
    /// depth come from the current frame; destination, energy, value, data,
    /// kind and flags from the interpreter. A static frame only issues
    /// static frames.
    fn nested_call(
        &mut self, requested: ExecutionContext,
    ) -> ExecutorResult<ExecutionResult> {
        let parent = self.context;
        if requested.energy_limit > parent.energy_limit {
            return Err(ExecutorError::EnergyOverflow {
                remaining: requested.energy_limit,
                limit: parent.energy_limit,
            });
        }
        let mut context = ExecutionContext {
            transaction_hash: parent.transaction_hash,
            origin: parent.origin,
            caller: parent.destination,
            energy_price: parent.energy_price,
            depth: parent.depth + 1,
            flags: requested.flags | (parent.flags & STATIC_FLAG),
            env: parent.env.clone(),
            ..requested
        };
        let moves_value = context.is_create() || !context.value.is_zero();
        if context.is_static() && moves_value {
            debug!("static frame {:?} cannot move value", parent.destination);
            return Ok(ExecutionResult::exhausted(ResultCode::Failure));
        }

        if context.is_create() {
            let nonce = self.state.nonce(&context.caller)?;
            self.state.inc_nonce(&context.caller)?;
            context.destination = contract_address(&context.caller, &nonce);
        }

        let mut call_substate = Substate::new();
        call_substate.internal_transactions.push(InternalTransaction {
            parent_hash: context.transaction_hash,
            depth: parent.depth,
            index: self.res.next_internal_index(),
            from: context.caller,
            to: context.destination,
            value: context.value,
            data: context.data.clone(),
            kind: context.kind,
            rejected: false,
        });
        call_substate.calls.push(CallRecord {
            destination: context.destination,
            value: context.value,
            data: context.data.clone(),
        });

        let value = word_to_u256(&context.value);
        if self.state.balance(&context.caller)? < value {
            debug!(
                "nested call from {:?} cannot afford value {}",
                context.caller, value
            );
            self.substate.accrue_rejected(call_substate);
            return Ok(ExecutionResult::exhausted(ResultCode::Failure));
        }

        let mut layer = Layer::new(&mut *self.state);
        let mut frame_return = exec_frame(&context, &mut layer, self.res)?;
        if frame_return.apply_state {
            layer.commit()?;
        }

        accrue_substate(&mut call_substate, &mut frame_return);
        if frame_return.result.is_success() {
            self.substate.accrue(call_substate);
        } else {
            self.substate.accrue_rejected(call_substate);
        }
        Ok(frame_return.result)
    }
}

impl<'h, 'm> Host for FrameHost<'h, 'm> {
    fn exists(&self, address: &Address) -> HostResult<bool> {
        self.check_alive()?;
        self.guard(self.state.exists(address))
    }

    fn balance(&self, address: &Address) -> HostResult<U256> {
        self.check_alive()?;
        self.guard(self.state.balance(address))
    }

    fn nonce(&self, address: &Address) -> HostResult<U256> {
        self.check_alive()?;
        self.guard(self.state.nonce(address))
    }

    fn code(&self, address: &Address) -> HostResult<Option<Bytes>> {
        self.check_alive()?;
        self.guard(self.state.code(address))
    }

    fn storage(&self, key: &StorageKey) -> HostResult<Option<StorageValue>> {
        self.check_alive()?;
        self.guard(self.state.storage(&self.context.destination, key))
    }

    fn set_storage(
        &mut self, key: StorageKey, value: StorageValue,
    ) -> HostResult<()> {
        self.check_mutable()?;
        let result =
            self.state.put_storage(&self.context.destination, key, value);
        self.guard(result)
    }

    fn remove_storage(&mut self, key: &StorageKey) -> HostResult<()> {
        self.check_mutable()?;
        let result = self.state.delete_storage(&self.context.destination, key);
        self.guard(result)
    }

    fn log(&mut self, topics: Vec<Bytes>, data: Bytes) -> HostResult<()> {
        self.check_mutable()?;
        self.substate.log(self.context.destination, topics, data);
        Ok(())
    }

    fn self_destruct(&mut self, beneficiary: &Address) -> HostResult<()> {
        self.check_mutable()?;
        let address = self.context.destination;
        if *beneficiary != address {
            let balance = self.guard(self.state.balance(&address))?;
            let result =
                self.state.transfer_balance(&address, beneficiary, &balance);
            self.guard(result)?;
        }
        self.substate.schedule_deletion(address);
        Ok(())
    }

    fn call(&mut self, context: &[u8]) -> HostResult<Bytes> {
        self.check_alive()?;
        let requested = self.guard(wire::decode_context(
            context,
            self.context.transaction_hash,
        ))?;
        let result = self.nested_call(requested);
        let result = self.guard(result)?;
        self.guard(wire::encode_result(&result))
    }
}

// Copyright 2019 Conflux Foundation. All rights reserved.
// Conflux is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use super::{Dispatch, FrameHost, RuntimeRes};
use crate::{
    error::{ExecutorError, ExecutorResult},
    params::CreateFailurePolicy,
    precompiled::PrecompiledCall,
    state::{AccountKind, DbResult, Layer, StateExt},
    substate::Substate,
    types::word_to_u256,
    vm::{ExecutionContext, ExecutionResult, ResultCode},
    wire,
};

/// The result of executing a frame.
#[derive(Debug)]
pub struct FrameReturn {
    pub result: ExecutionResult,

    /// Commit the frame's layer or discard it.
    pub apply_state: bool,

    /// Side effects of the frame. The caller merges them on success and
    /// keeps them as rejected records otherwise.
    pub substate: Substate,
}

impl FrameReturn {
    fn applied(result: ExecutionResult, substate: Substate) -> Self {
        FrameReturn {
            result,
            apply_state: true,
            substate,
        }
    }

    fn discarded(result: ExecutionResult, substate: Substate) -> Self {
        FrameReturn {
            result,
            apply_state: false,
            substate,
        }
    }
}

/// Executes the frame described by `context` in `state`, a layer owned by
/// the frame. The caller commits or drops the layer as `apply_state` says.
///
/// Value moves from the caller to the destination after the dispatch, and
/// only if the dispatch succeeded. Every failure other than `Revert` gives
/// up all remaining energy.
pub fn exec_frame(
    context: &ExecutionContext, state: &mut Layer<'_>,
    res: &mut RuntimeRes<'_>,
) -> ExecutorResult<FrameReturn> {
    let max_depth = res.machine.params().max_call_depth;
    if context.depth > max_depth {
        debug!("frame depth {} exceeds {}", context.depth, max_depth);
        return Ok(FrameReturn::discarded(
            ExecutionResult::exhausted(ResultCode::Failure),
            Substate::new(),
        ));
    }

    let mut frame_return = if context.is_create() {
        exec_create(context, state, res)?
    } else {
        exec_call(context, state, res)?
    };

    let result = &mut frame_return.result;
    if !result.is_success() && result.code != ResultCode::Revert {
        result.energy_remaining = 0;
    }
    Ok(frame_return)
}

fn exec_call(
    context: &ExecutionContext, state: &mut Layer<'_>,
    res: &mut RuntimeRes<'_>,
) -> ExecutorResult<FrameReturn> {
    let dispatch = Dispatch::resolve(res.machine, &*state, context)?;
    let mut substate = Substate::new();
    let result = run_dispatch(dispatch, context, state, res, &mut substate)?;

    if !result.is_success() {
        return Ok(FrameReturn::discarded(result, substate));
    }
    if !transfer_value(context, state)? {
        return Ok(FrameReturn::discarded(
            ExecutionResult::exhausted(ResultCode::Failure),
            substate,
        ));
    }
    Ok(FrameReturn::applied(result, substate))
}

fn exec_create(
    context: &ExecutionContext, state: &mut Layer<'_>,
    res: &mut RuntimeRes<'_>,
) -> ExecutorResult<FrameReturn> {
    let address = &context.destination;
    if state.has_account_state(address)? {
        debug!("contract already exists at {:?}", address);
        return Ok(FrameReturn::discarded(
            ExecutionResult::exhausted(ResultCode::ContractAlreadyExists),
            Substate::new(),
        ));
    }
    state.create_contract_account(address, AccountKind::Interpreted)?;

    let dispatch = Dispatch::resolve(res.machine, &*state, context)?;
    let mut substate = Substate::new();
    let mut result =
        run_dispatch(dispatch, context, state, res, &mut substate)?;

    if result.is_success() {
        if transfer_value(context, state)? {
            if !result.output.is_empty() {
                state.set_code(address, result.output.clone())?;
            }
            return Ok(FrameReturn::applied(result, substate));
        }
        result = ExecutionResult::exhausted(ResultCode::Failure);
    }

    match res.machine.params().create_failure_policy {
        CreateFailurePolicy::RevertAll => {
            Ok(FrameReturn::discarded(result, substate))
        }
        CreateFailurePolicy::KeepTransfer => {
            state.rollback();
            state.create_contract_account(address, AccountKind::Interpreted)?;
            if transfer_value(context, state)? {
                Ok(FrameReturn::applied(result, substate))
            } else {
                state.rollback();
                Ok(FrameReturn::discarded(result, substate))
            }
        }
    }
}

fn run_dispatch(
    dispatch: Dispatch, context: &ExecutionContext, state: &mut Layer<'_>,
    res: &mut RuntimeRes<'_>, substate: &mut Substate,
) -> ExecutorResult<ExecutionResult> {
    let result = match dispatch {
        Dispatch::ValueOnly => {
            ExecutionResult::success(context.energy_limit, vec![])
        }
        Dispatch::Precompiled(factory) => {
            let chain_id = res.machine.params().chain_id;
            let mut contract = factory(PrecompiledCall {
                state: &mut *state,
                context,
                chain_id,
            });
            contract.execute(&context.data, context.energy_limit)?
        }
        Dispatch::Interpreted(code) => {
            let machine = res.machine;
            let encoded = wire::encode_context(context)?;
            let mut host = FrameHost::new(context, &mut *state, res, substate);
            let output = machine.interpreter().run(&code, &encoded, &mut host);
            host.finish()?;
            wire::decode_result(&output)?
        }
    };

    if result.energy_remaining > context.energy_limit {
        return Err(ExecutorError::EnergyOverflow {
            remaining: result.energy_remaining,
            limit: context.energy_limit,
        });
    }
    Ok(result)
}

/// Moves the frame's value from the caller to the destination. `false` if
/// the caller cannot afford it.
fn transfer_value(
    context: &ExecutionContext, state: &mut Layer<'_>,
) -> DbResult<bool> {
    let value = word_to_u256(&context.value);
    if state.balance(&context.caller)? < value {
        debug!(
            "caller {:?} cannot transfer {} to {:?}",
            context.caller, value, context.destination
        );
        return Ok(false);
    }
    state.transfer_balance(&context.caller, &context.destination, &value)?;
    Ok(true)
}

// Copyright 2019 Conflux Foundation. All rights reserved.
// Conflux is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

//! Frame execution. A frame is one call or create running in its own state
//! layer. Nested frames are entered through the [`Host`](crate::vm::Host)
//! given to the interpreter and run to completion before the calling frame
//! resumes, so the call stack is the native one, bounded by the configured
//! maximum depth. [`exec_top_frame`] sizes that stack for the bound.

mod dispatch;
mod frame;
mod host;
mod resources;

pub use dispatch::Dispatch;
pub use frame::{exec_frame, FrameReturn};
pub use host::FrameHost;
pub use resources::RuntimeRes;

use crate::{
    error::{ExecutorError, ExecutorResult},
    state::Layer,
    substate::Substate,
    vm::ExecutionContext,
};
use std::{io, panic};

/// Native stack reserved for each level of nested frames.
#[cfg(debug_assertions)]
const STACK_SIZE_PER_DEPTH: usize = 128 * 1024;
#[cfg(not(debug_assertions))]
const STACK_SIZE_PER_DEPTH: usize = 24 * 1024;

/// Stack assumed for the calling thread, the default of spawned threads.
pub const LOCAL_STACK_SIZE: usize = 2 * 1024 * 1024;

/// Stack needed by a transaction whose frames nest up to `max_call_depth`,
/// counting the top-level frame and the frame refused for being too deep.
pub fn frame_stack_size(max_call_depth: u32) -> usize {
    (max_call_depth as usize)
        .saturating_add(2)
        .saturating_mul(STACK_SIZE_PER_DEPTH)
}

/// Executes the top-level frame of a transaction. If the depth bound needs
/// more stack than [`LOCAL_STACK_SIZE`], the frame runs on a scoped thread
/// with a stack sized for it, and the caller blocks until it returns.
pub fn exec_top_frame(
    context: &ExecutionContext, state: &mut Layer<'_>,
    res: &mut RuntimeRes<'_>,
) -> ExecutorResult<FrameReturn> {
    let stack_size = frame_stack_size(res.machine.params().max_call_depth);
    if stack_size <= LOCAL_STACK_SIZE {
        return exec_frame(context, state, res);
    }

    trace!(
        "executing {:?} on a {} byte stack",
        context.destination,
        stack_size
    );
    let joined = crossbeam::scope(|scope| -> io::Result<_> {
        let handle = scope
            .builder()
            .name("frame-stack".into())
            .stack_size(stack_size)
            .spawn(|_| exec_frame(context, state, res))?;
        Ok(handle.join())
    });
    match joined {
        Ok(Ok(Ok(result))) => result,
        Ok(Err(e)) => Err(ExecutorError::FrameThread(e.to_string())),
        Ok(Ok(Err(payload))) | Err(payload) => panic::resume_unwind(payload),
    }
}

/// Folds the side effects of a returned frame into `substate`: merged when
/// the frame succeeded, kept only as rejected records otherwise.
pub fn accrue_substate(
    substate: &mut Substate, frame_return: &mut FrameReturn,
) {
    let child = std::mem::take(&mut frame_return.substate);
    if frame_return.result.is_success() {
        substate.accrue(child);
    } else {
        substate.accrue_rejected(child);
    }
}

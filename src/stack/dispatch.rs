// Copyright 2019 Conflux Foundation. All rights reserved.
// Conflux is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use crate::{
    error::DbResult,
    machine::Machine,
    precompiled::ContractFactory,
    state::{StateExt, StateStore},
    types::Bytes,
    vm::ExecutionContext,
};

/// How a frame runs, resolved once when the frame starts.
pub enum Dispatch {
    /// A built-in contract bound to the destination.
    Precompiled(ContractFactory),
    /// Code handed to the external interpreter.
    Interpreted(Bytes),
    /// No code to run; only value moves.
    ValueOnly,
}

impl Dispatch {
    /// A create runs its payload as deployer code. A call runs the built-in
    /// contract at the destination, or else the destination's code.
    pub fn resolve(
        machine: &Machine, state: &dyn StateStore, context: &ExecutionContext,
    ) -> DbResult<Self> {
        let code = if context.is_create() {
            Some(context.data.clone())
        } else {
            if let Some(factory) = machine.precompiled(&context.destination) {
                return Ok(Dispatch::Precompiled(factory));
            }
            state.code(&context.destination)?
        };

        Ok(match code {
            Some(code) if !code.is_empty() => Dispatch::Interpreted(code),
            _ => Dispatch::ValueOnly,
        })
    }
}

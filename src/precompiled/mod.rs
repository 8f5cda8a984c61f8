// Copyright 2019 Conflux Foundation. All rights reserved.
// Conflux is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

mod contract_map;
mod contracts;

pub use contract_map::{PrecompiledContractMap, PrecompiledEntry};
pub use contracts::{
    all_precompiled_contracts, EdVerify, NameRegistry, ED_VERIFY_ADDRESS,
    ED_VERIFY_COST, NAME_REGISTRY_ADDRESS, REGISTRY_SET_COST,
    REGISTRY_TRANSFER_COST,
};

use crate::{
    error::DbResult,
    state::StateStore,
    vm::{ExecutionContext, ExecutionResult},
};

/// A built-in contract. It must never report more energy remaining than
/// `energy_limit`, and returns `OutOfEnergy` with nothing remaining when its
/// fixed cost exceeds the limit.
pub trait PrecompiledContract {
    fn execute(
        &mut self, input: &[u8], energy_limit: u64,
    ) -> DbResult<ExecutionResult>;
}

/// Everything a contract may capture when it is instantiated for one call.
/// Stateless contracts ignore it.
pub struct PrecompiledCall<'a> {
    /// The layer of the frame executing the call.
    pub state: &'a mut dyn StateStore,
    pub context: &'a ExecutionContext,
    pub chain_id: u8,
}

/// Instantiates a contract for one call.
pub type ContractFactory =
    for<'a> fn(PrecompiledCall<'a>) -> Box<dyn PrecompiledContract + 'a>;

// Copyright 2019 Conflux Foundation. All rights reserved.
// Conflux is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use crate::{
    params::ExecutorParams,
    precompiled::{ContractFactory, PrecompiledContractMap},
    types::Address,
    vm::Interpreter,
};
use std::sync::Arc;

/// Everything an execution needs besides state: parameters, the built-in
/// contracts and the external interpreter. Shared by all transactions.
pub struct Machine {
    params: ExecutorParams,
    precompiled: Arc<PrecompiledContractMap>,
    interpreter: Arc<dyn Interpreter>,
}

impl Machine {
    pub fn new(
        params: ExecutorParams, interpreter: Arc<dyn Interpreter>,
    ) -> Self {
        Self::new_with_precompiled(
            params,
            interpreter,
            PrecompiledContractMap::new(),
        )
    }

    pub fn new_with_precompiled(
        params: ExecutorParams, interpreter: Arc<dyn Interpreter>,
        precompiled: PrecompiledContractMap,
    ) -> Self {
        Machine {
            params,
            precompiled: Arc::new(precompiled),
            interpreter,
        }
    }

    #[inline]
    pub fn params(&self) -> &ExecutorParams { &self.params }

    /// The built-in contract bound to `address`, if it is active.
    pub fn precompiled(&self, address: &Address) -> Option<ContractFactory> {
        self.precompiled.contract(address, &self.params.forks)
    }

    #[inline]
    pub fn interpreter(&self) -> &dyn Interpreter { &*self.interpreter }
}

// Copyright 2019 Conflux Foundation. All rights reserved.
// Conflux is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use crate::types::{Address, U128};

/// Information concerning the block being executed. Every execution context
/// carries a snapshot of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Env {
    /// The block author, paid for the energy each transaction uses.
    pub coinbase: Address,
    pub number: u64,
    pub timestamp: u64,
    /// The block energy limit.
    pub energy_limit: u64,
    pub difficulty: U128,
}

/// Block environment plus the energy the block can still spend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockContext {
    pub env: Env,
    pub energy_available: u64,
}

impl BlockContext {
    /// A context for a block where no energy has been spent yet.
    pub fn new(env: Env) -> Self {
        BlockContext {
            energy_available: env.energy_limit,
            env,
        }
    }

    pub fn with_energy_available(env: Env, energy_available: u64) -> Self {
        BlockContext {
            env,
            energy_available,
        }
    }

    /// Accounts for energy spent by an executed transaction.
    pub fn consume(&mut self, energy_used: u64) {
        self.energy_available =
            self.energy_available.saturating_sub(energy_used);
    }
}

// Copyright 2019 Conflux Foundation. All rights reserved.
// Conflux is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use std::collections::BTreeMap;

use super::{all_precompiled_contracts, ContractFactory};
use crate::{params::ForkFlags, types::Address};

#[derive(Clone, Copy)]
pub struct PrecompiledEntry {
    pub factory: ContractFactory,
    pub is_active: fn(&ForkFlags) -> bool,
}

/// Address-indexed table of the built-in contracts.
#[derive(Clone, Default)]
pub struct PrecompiledContractMap {
    builtin: BTreeMap<Address, PrecompiledEntry>,
}

impl std::ops::Deref for PrecompiledContractMap {
    type Target = BTreeMap<Address, PrecompiledEntry>;

    fn deref(&self) -> &Self::Target { &self.builtin }
}

impl PrecompiledContractMap {
    pub fn new() -> Self {
        let mut builtin = BTreeMap::new();
        for (address, entry) in all_precompiled_contracts() {
            builtin.insert(address, entry);
        }
        Self { builtin }
    }

    /// The factory bound to `address`, if a contract lives there and its
    /// fork is active.
    pub fn contract(
        &self, address: &Address, forks: &ForkFlags,
    ) -> Option<ContractFactory> {
        self.builtin
            .get(address)
            .filter(|entry| (entry.is_active)(forks))
            .map(|entry| entry.factory)
    }
}

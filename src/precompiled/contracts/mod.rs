// Copyright 2019 Conflux Foundation. All rights reserved.
// Conflux is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

mod ed_verify;
mod name_registry;

pub use ed_verify::{EdVerify, ED_VERIFY_COST};
pub use name_registry::{
    NameRegistry, REGISTRY_SET_COST, REGISTRY_TRANSFER_COST,
};

use super::{
    contract_map::PrecompiledEntry, PrecompiledCall, PrecompiledContract,
};
use crate::types::Address;
use std::str::FromStr;

lazy_static! {
    pub static ref ED_VERIFY_ADDRESS: Address = Address::from_str(
        "0000000000000000000000000000000000000000000000000000000000000010"
    )
    .unwrap();
    pub static ref NAME_REGISTRY_ADDRESS: Address = Address::from_str(
        "0000000000000000000000000000000000000000000000000000000000000011"
    )
    .unwrap();
}

/// All built-in contracts with their activation switches.
pub fn all_precompiled_contracts() -> Vec<(Address, PrecompiledEntry)> {
    vec![
        (
            *ED_VERIFY_ADDRESS,
            PrecompiledEntry {
                factory: build_ed_verify,
                is_active: |forks| forks.ed_verify,
            },
        ),
        (
            *NAME_REGISTRY_ADDRESS,
            PrecompiledEntry {
                factory: build_name_registry,
                is_active: |forks| forks.name_registry,
            },
        ),
    ]
}

fn build_ed_verify<'a>(
    _call: PrecompiledCall<'a>,
) -> Box<dyn PrecompiledContract + 'a> {
    Box::new(EdVerify)
}

fn build_name_registry<'a>(
    call: PrecompiledCall<'a>,
) -> Box<dyn PrecompiledContract + 'a> {
    Box::new(NameRegistry::new(call))
}

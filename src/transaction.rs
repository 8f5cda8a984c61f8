// Copyright 2019 Conflux Foundation. All rights reserved.
// Conflux is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use crate::types::{Address, Bytes, H256, U128, U256};
use keccak_hash::keccak;
use rlp::{Encodable, RlpStream};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Create creates new contract.
    Create,
    /// Calls contract at given address.
    /// In the case of a transfer, this is the receiver's address.
    Call(Address),
}

impl Default for Action {
    fn default() -> Action { Action::Create }
}

impl Encodable for Action {
    fn rlp_append(&self, s: &mut RlpStream) {
        match *self {
            Action::Create => s.append_internal(&""),
            Action::Call(ref address) => s.append_internal(address),
        };
    }
}

/// A transaction whose signature has already been checked; `sender` is
/// trusted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    pub sender: Address,
    pub action: Action,
    pub value: U128,
    pub data: Bytes,
    pub energy_limit: u64,
    pub energy_price: U128,
    pub nonce: U256,
    pub signature: Bytes,
}

impl Transaction {
    #[inline]
    pub fn is_create(&self) -> bool { self.action == Action::Create }

    /// Hash of the unsigned fields.
    pub fn hash(&self) -> H256 {
        let mut s = RlpStream::new_list(7);
        s.append(&self.sender);
        s.append(&self.action);
        s.append(&self.value);
        s.append(&self.data);
        s.append(&self.energy_limit);
        s.append(&self.energy_price);
        s.append(&self.nonce);
        keccak(s.out())
    }
}

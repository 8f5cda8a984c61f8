// Copyright 2019 Conflux Foundation. All rights reserved.
// Conflux is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use crate::types::{Bytes, U256};

/// Which engine manages an account's code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    Basic,
    Interpreted,
    Precompiled,
    ForeignVm,
}

impl Default for AccountKind {
    fn default() -> Self { AccountKind::Basic }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountState {
    pub balance: U256,
    pub nonce: U256,
    pub code: Option<Bytes>,
    pub kind: AccountKind,
}

impl AccountState {
    pub fn with_balance(balance: U256) -> Self {
        AccountState {
            balance,
            ..Default::default()
        }
    }
}

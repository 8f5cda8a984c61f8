// Copyright 2019 Conflux Foundation. All rights reserved.
// Conflux is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactSettings {
    /// A read-only query that is never packed into a block. Skips every
    /// check, the energy charge and the final commit.
    pub local_call: bool,
    pub bump_nonce: bool,
}

impl Default for TransactSettings {
    fn default() -> Self {
        TransactSettings {
            local_call: false,
            bump_nonce: true,
        }
    }
}

impl TransactSettings {
    pub fn local() -> Self {
        TransactSettings {
            local_call: true,
            bump_nonce: false,
        }
    }
}

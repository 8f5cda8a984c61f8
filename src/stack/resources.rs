// Copyright 2019 Conflux Foundation. All rights reserved.
// Conflux is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use crate::machine::Machine;

/// Resources shared by every frame of one transaction.
pub struct RuntimeRes<'m> {
    pub machine: &'m Machine,
    /// Internal transactions issued so far.
    internal_transactions: u32,
}

impl<'m> RuntimeRes<'m> {
    pub fn new(machine: &'m Machine) -> Self {
        RuntimeRes {
            machine,
            internal_transactions: 0,
        }
    }

    /// Index for the next internal transaction.
    pub fn next_internal_index(&mut self) -> u32 {
        let index = self.internal_transactions;
        self.internal_transactions += 1;
        index
    }
}

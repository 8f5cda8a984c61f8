// Copyright 2019 Conflux Foundation. All rights reserved.
// Conflux is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use crate::{
    error::ExecutorResult,
    executive::{ExecutiveContext, Receipt, TransactSettings},
    machine::Machine,
    state::StateStore,
    transaction::Transaction,
    vm::BlockContext,
};
use parking_lot::Mutex;

/// Executes transactions against one durable root. Transactions run one at
/// a time: the root stays locked from validation to the final commit, so
/// two transactions touching the same accounts never interleave.
pub struct TransactionExecutor<B: StateStore> {
    root: Mutex<B>,
    machine: Machine,
}

impl<B: StateStore> TransactionExecutor<B> {
    pub fn new(backend: B, machine: Machine) -> Self {
        TransactionExecutor {
            root: Mutex::new(backend),
            machine,
        }
    }

    pub fn machine(&self) -> &Machine { &self.machine }

    pub fn execute(
        &self, tx: &Transaction, block: &BlockContext,
    ) -> ExecutorResult<Receipt> {
        self.execute_with(tx, block, TransactSettings::default())
    }

    pub fn execute_with(
        &self, tx: &Transaction, block: &BlockContext,
        settings: TransactSettings,
    ) -> ExecutorResult<Receipt> {
        let mut root = self.root.lock();
        let outcome = ExecutiveContext::new(&mut *root, block, &self.machine)
            .transact(tx, settings)?;
        Ok(outcome.make_receipt(tx))
    }

    /// Executes `txs` in order, charging each receipt's energy to the
    /// block. Stops at the first executor error; transactions before it
    /// stay committed.
    pub fn execute_block(
        &self, txs: &[Transaction], block: &mut BlockContext,
    ) -> ExecutorResult<Vec<Receipt>> {
        let mut receipts = Vec::with_capacity(txs.len());
        for tx in txs {
            let receipt = self.execute(tx, block)?;
            block.consume(receipt.energy_used);
            receipts.push(receipt);
        }
        debug!(
            "executed {} transactions, {} energy left in block {}",
            receipts.len(),
            block.energy_available,
            block.env.number
        );
        Ok(receipts)
    }

    /// Runs `f` with shared access to the root.
    pub fn with_root<T, F: FnOnce(&B) -> T>(&self, f: F) -> T {
        f(&*self.root.lock())
    }

    pub fn into_backend(self) -> B { self.root.into_inner() }
}

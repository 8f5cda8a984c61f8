// Copyright 2019 Conflux Foundation. All rights reserved.
// Conflux is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use crate::{
    types::{Address, Bytes, H256, U128},
    vm::CallKind,
};
use rlp::{Encodable, RlpStream};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// The contract that emitted the log.
    pub address: Address,
    pub topics: Vec<Bytes>,
    pub data: Bytes,
}

/// A nested call or create issued while executing a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalTransaction {
    /// Hash of the top-level transaction.
    pub parent_hash: H256,
    /// Depth of the frame that issued it.
    pub depth: u32,
    /// Position among the internal transactions of the top-level one.
    pub index: u32,
    pub from: Address,
    pub to: Address,
    pub value: U128,
    pub data: Bytes,
    pub kind: CallKind,
    /// Set when the nested frame or one of its ancestors was discarded.
    pub rejected: bool,
}

/// Destination, value and data of a dispatched nested call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRecord {
    pub destination: Address,
    pub value: U128,
    pub data: Bytes,
}

/// Tracks the side effects of one frame: logs, internal transactions,
/// accounts scheduled for deletion and dispatched calls. Each frame owns
/// one; the caller folds it into its own when the frame returns.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Substate {
    pub logs: Vec<LogEntry>,
    pub internal_transactions: Vec<InternalTransaction>,
    /// Accounts that self-destructed. Deleted when the transaction succeeds.
    pub deleted_accounts: BTreeSet<Address>,
    pub calls: Vec<CallRecord>,
}

impl Substate {
    pub fn new() -> Self { Substate::default() }

    /// Merges the side effects of a frame whose state changes were applied.
    pub fn accrue(&mut self, s: Self) {
        self.logs.extend(s.logs);
        self.internal_transactions.extend(s.internal_transactions);
        self.deleted_accounts.extend(s.deleted_accounts);
        self.calls.extend(s.calls);
    }

    /// Merges the side effects of a discarded frame. Its internal
    /// transactions stay on record flagged as rejected; its logs and
    /// deletions are dropped with its state changes.
    pub fn accrue_rejected(&mut self, mut s: Self) {
        s.reject_internal_transactions();
        self.internal_transactions.extend(s.internal_transactions);
        self.calls.extend(s.calls);
    }

    pub fn reject_internal_transactions(&mut self) {
        for tx in &mut self.internal_transactions {
            tx.rejected = true;
        }
    }

    pub fn log(&mut self, address: Address, topics: Vec<Bytes>, data: Bytes) {
        self.logs.push(LogEntry {
            address,
            topics,
            data,
        });
    }

    pub fn schedule_deletion(&mut self, address: Address) {
        self.deleted_accounts.insert(address);
    }
}

impl Encodable for LogEntry {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(3);
        s.append(&self.address);
        s.append_list::<Bytes, Bytes>(&self.topics);
        s.append(&self.data);
    }
}

impl Encodable for InternalTransaction {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(9);
        s.append(&self.parent_hash);
        s.append(&self.depth);
        s.append(&self.index);
        s.append(&self.from);
        s.append(&self.to);
        s.append(&self.value);
        s.append(&self.data);
        s.append(&self.kind.to_u32());
        s.append(&self.rejected);
    }
}

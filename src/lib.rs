// Copyright 2019 Conflux Foundation. All rights reserved.
// Conflux is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

//! Energy Executor: the transaction-execution core of an account-based
//! chain. It validates a transaction, charges energy for it, dispatches the
//! call to a precompiled contract or to an external interpreter and commits
//! or discards the resulting state changes atomically.

#[macro_use]
extern crate log;
#[macro_use]
extern crate lazy_static;

/// Error types for failures that are not business outcomes of a
/// transaction, e.g., backend errors or malformed interpreter output.
pub mod error;

/// Transaction Execution Entry: validates transactions, charges energy,
/// dispatches them and finalizes the outcome into a receipt.
pub mod executive;

/// Lock-guarded entry point that serializes transactions over one durable
/// root.
pub mod executor;

/// Execution Engine Object: bundles the parameters, the precompiled
/// contracts and the external interpreter.
pub mod machine;

/// Tool Macros
mod macros;

/// Chain parameters and their TOML loader.
pub mod params;

/// Precompiled Contracts: built-in contracts bound to fixed addresses and
/// executed without the external interpreter.
pub mod precompiled;

/// Frame execution: resolves the dispatch of one call or create and serves
/// the host interface to the interpreter, including nested calls.
pub mod stack;

/// Ledger State: a stack of copy-on-write layers above a durable backend.
pub mod state;

/// Transaction Execution Tracker: logs, internal transactions and pending
/// deletions collected during one transaction.
pub mod substate;

/// Inbound transaction type.
pub mod transaction;

/// Primitive types shared by every module.
pub mod types;

/// Types describing one execution, the interpreter interface and the block
/// environment.
pub mod vm;

/// Fixed binary layout exchanged with the external interpreter.
pub mod wire;

pub use error::{ExecutorError, ExecutorResult};
pub use executive::{
    ExecutionOutcome, ExecutiveContext, Receipt, RejectError,
    TransactSettings,
};
pub use executor::TransactionExecutor;
pub use machine::Machine;
pub use params::ExecutorParams;
pub use transaction::{Action, Transaction};

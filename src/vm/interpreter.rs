// Copyright 2019 Conflux Foundation. All rights reserved.
// Conflux is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use crate::types::{Address, Bytes, StorageKey, StorageValue, U256};
use thiserror::Error;

/// The external code-execution engine. It receives the code to run, the
/// wire-encoded execution context and a host for state access, and returns
/// a wire-encoded execution result. The call blocks until the engine is
/// done.
pub trait Interpreter: Send + Sync {
    fn run(&self, code: &[u8], context: &[u8], host: &mut dyn Host) -> Bytes;
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HostError {
    #[error("state modification in a static context")]
    StaticContext,

    /// The executor hit an unrecoverable error. The interpreter should
    /// return as soon as possible; its result will be discarded.
    #[error("execution aborted")]
    Aborted,
}

pub type HostResult<T> = Result<T, HostError>;

/// Callbacks available to the interpreter while it executes one frame.
/// Storage operations address the storage of the frame's destination.
pub trait Host {
    fn exists(&self, address: &Address) -> HostResult<bool>;

    fn balance(&self, address: &Address) -> HostResult<U256>;

    fn nonce(&self, address: &Address) -> HostResult<U256>;

    fn code(&self, address: &Address) -> HostResult<Option<Bytes>>;

    fn storage(&self, key: &StorageKey) -> HostResult<Option<StorageValue>>;

    fn set_storage(
        &mut self, key: StorageKey, value: StorageValue,
    ) -> HostResult<()>;

    fn remove_storage(&mut self, key: &StorageKey) -> HostResult<()>;

    fn log(&mut self, topics: Vec<Bytes>, data: Bytes) -> HostResult<()>;

    /// Moves the whole balance to `beneficiary` and schedules the current
    /// account for deletion.
    fn self_destruct(&mut self, beneficiary: &Address) -> HostResult<()>;

    /// Runs a nested call or create described by a wire-encoded context and
    /// returns the wire-encoded result. Caller, origin, price, depth and
    /// block snapshot are pinned by the host.
    fn call(&mut self, context: &[u8]) -> HostResult<Bytes>;
}

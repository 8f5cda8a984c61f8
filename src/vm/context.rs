// Copyright 2019 Conflux Foundation. All rights reserved.
// Conflux is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use super::Env;
use crate::types::{Address, Bytes, H256, U128};
use strum_macros::{Display, EnumIter};

/// The context is read-only: storage writes, logs, self-destructs and value
/// transfers are refused.
pub const STATIC_FLAG: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[repr(u32)]
pub enum CallKind {
    Call = 0,
    Create = 3,
}

impl CallKind {
    #[inline]
    pub fn to_u32(self) -> u32 { self as u32 }

    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(CallKind::Call),
            3 => Some(CallKind::Create),
            _ => None,
        }
    }
}

/// Description of one call or create, handed to a precompiled contract or,
/// encoded, to the interpreter. Built once per frame and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
    /// Hash of the top-level transaction. Not part of the wire encoding.
    pub transaction_hash: H256,
    /// Account whose code runs and whose storage is written.
    pub destination: Address,
    /// Sender of the top-level transaction.
    pub origin: Address,
    /// Immediate caller of this frame.
    pub caller: Address,
    pub energy_price: U128,
    /// Energy available to this frame, base cost already deducted.
    pub energy_limit: u64,
    pub value: U128,
    /// Call data, or the deployer code of a create.
    pub data: Bytes,
    pub depth: u32,
    pub kind: CallKind,
    pub flags: u32,
    pub env: Env,
}

impl ExecutionContext {
    #[inline]
    pub fn is_static(&self) -> bool { self.flags & STATIC_FLAG != 0 }

    #[inline]
    pub fn is_create(&self) -> bool { self.kind == CallKind::Create }
}

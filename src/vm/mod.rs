// Copyright 2019 Conflux Foundation. All rights reserved.
// Conflux is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

mod context;
mod env;
mod interpreter;
mod result;

pub use context::{CallKind, ExecutionContext, STATIC_FLAG};
pub use env::{BlockContext, Env};
pub use interpreter::{Host, HostError, HostResult, Interpreter};
pub use result::{ExecutionResult, OutcomeClass, ResultCode};

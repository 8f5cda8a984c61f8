// Copyright 2019 Conflux Foundation. All rights reserved.
// Conflux is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

//! Big-endian, fixed-then-variable layout shared with the interpreter.
//!
//! Execution context:
//!
//! | field | width |
//! |---|---|
//! | destination, origin, caller | 32 each |
//! | energy price | 16 |
//! | energy limit | 8 |
//! | value | 16 |
//! | call data length, call data | 4 + n |
//! | depth, kind, flags | 4 each |
//! | coinbase | 32 |
//! | block number, timestamp, energy limit | 8 each |
//! | difficulty | 16 |
//!
//! Execution result: code (4, signed), energy remaining (8), output length
//! and output (4 + n).
//!
//! The transaction hash is not part of the context encoding; the decoder
//! takes it from the frame that receives the buffer.

mod codec;

pub use codec::{length_prefix, Reader, Writer};

use crate::{
    error::{DecodeError, EncodeError},
    types::H256,
    vm::{CallKind, Env, ExecutionContext, ExecutionResult, ResultCode},
};

/// Encoded size of a context with empty call data.
pub const CONTEXT_FIXED_LENGTH: usize = 224;
/// Encoded size of a result with empty output.
pub const RESULT_FIXED_LENGTH: usize = 16;

pub fn encode_context(
    context: &ExecutionContext,
) -> Result<Vec<u8>, EncodeError> {
    let mut writer =
        Writer::with_capacity(CONTEXT_FIXED_LENGTH + context.data.len());
    writer.address(&context.destination);
    writer.address(&context.origin);
    writer.address(&context.caller);
    writer.word(&context.energy_price);
    writer.u64(context.energy_limit);
    writer.word(&context.value);
    writer.bytes(&context.data, "call data")?;
    writer.u32(context.depth);
    writer.u32(context.kind.to_u32());
    writer.u32(context.flags);
    writer.address(&context.env.coinbase);
    writer.u64(context.env.number);
    writer.u64(context.env.timestamp);
    writer.u64(context.env.energy_limit);
    writer.word(&context.env.difficulty);
    Ok(writer.into_inner())
}

pub fn decode_context(
    buffer: &[u8], transaction_hash: H256,
) -> Result<ExecutionContext, DecodeError> {
    let mut reader = Reader::new(buffer);
    let destination = reader.address("destination")?;
    let origin = reader.address("origin")?;
    let caller = reader.address("caller")?;
    let energy_price = reader.word("energy price")?;
    let energy_limit = reader.u64("energy limit")?;
    let value = reader.word("value")?;
    let data = reader.bytes("call data")?;
    let depth = reader.u32("depth")?;
    let kind = reader.u32("kind")?;
    let kind =
        CallKind::from_u32(kind).ok_or(DecodeError::UnknownCallKind(kind))?;
    let flags = reader.u32("flags")?;
    let env = Env {
        coinbase: reader.address("coinbase")?,
        number: reader.u64("block number")?,
        timestamp: reader.u64("block timestamp")?,
        energy_limit: reader.u64("block energy limit")?,
        difficulty: reader.word("difficulty")?,
    };
    reader.finish()?;

    Ok(ExecutionContext {
        transaction_hash,
        destination,
        origin,
        caller,
        energy_price,
        energy_limit,
        value,
        data,
        depth,
        kind,
        flags,
        env,
    })
}

pub fn encode_result(
    result: &ExecutionResult,
) -> Result<Vec<u8>, EncodeError> {
    let mut writer =
        Writer::with_capacity(RESULT_FIXED_LENGTH + result.output.len());
    writer.i32(result.code.to_i32());
    writer.u64(result.energy_remaining);
    writer.bytes(&result.output, "output")?;
    Ok(writer.into_inner())
}

pub fn decode_result(buffer: &[u8]) -> Result<ExecutionResult, DecodeError> {
    let mut reader = Reader::new(buffer);
    let code = reader.i32("result code")?;
    let code =
        ResultCode::from_i32(code).ok_or(DecodeError::UnknownResultCode(code))?;
    let energy_remaining = reader.u64("energy remaining")?;
    let output = reader.bytes("output")?;
    reader.finish()?;
    Ok(ExecutionResult {
        code,
        energy_remaining,
        output,
    })
}

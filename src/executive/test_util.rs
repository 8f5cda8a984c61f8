// Copyright 2019 Conflux Foundation. All rights reserved.
// Conflux is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

//! A scripted interpreter for tests. Scripts are flat byte programs; every
//! instruction costs [`OP_COST`] energy and talks to the executor only
//! through the wire codec and the [`Host`].

use crate::{
    machine::Machine,
    params::ExecutorParams,
    state::{AccountKind, StateExt, StateStore},
    types::{Address, Bytes, StorageValue, H128, H256, U128},
    vm::{
        BlockContext, CallKind, Env, ExecutionContext, ExecutionResult, Host,
        Interpreter, ResultCode, STATIC_FLAG,
    },
    wire::{decode_context, decode_result, encode_context, encode_result},
};
use byteorder::{BigEndian, ByteOrder};
use std::sync::Arc;

pub const OP_COST: u64 = 1_000;

const STORE: u8 = 0x01;
const LOG: u8 = 0x02;
const SELF_DESTRUCT: u8 = 0x03;
const CALL: u8 = 0x04;
const RETURN: u8 = 0x05;
const REMOVE: u8 = 0x06;
const RETURN_LAST: u8 = 0x07;
const OUT_OF_ENERGY: u8 = 0xf0;
const GARBAGE: u8 = 0xee;
const OVERREPORT: u8 = 0xef;
const REVERT: u8 = 0xfd;
const FAIL: u8 = 0xfe;

pub const LOG_TOPIC: &[u8] = b"scripted";

pub struct ScriptedInterpreter;

impl Interpreter for ScriptedInterpreter {
    fn run(&self, code: &[u8], context: &[u8], host: &mut dyn Host) -> Bytes {
        let context = decode_context(context, H256::zero())
            .expect("executor sends well-formed contexts");
        execute(code, &context, host)
    }
}

fn take<'c>(code: &mut &'c [u8], n: usize) -> &'c [u8] {
    let (head, tail) = code.split_at(n);
    *code = tail;
    head
}

fn encoded(result: &ExecutionResult) -> Bytes {
    encode_result(result).expect("scripted output fits")
}

fn failure() -> Bytes {
    encoded(&ExecutionResult::exhausted(ResultCode::Failure))
}

fn execute(
    mut code: &[u8], context: &ExecutionContext, host: &mut dyn Host,
) -> Bytes {
    let mut energy = context.energy_limit;
    let mut last_output = vec![];

    while let Some((&op, rest)) = code.split_first() {
        code = rest;
        if energy < OP_COST {
            return encoded(&ExecutionResult::out_of_energy());
        }
        energy -= OP_COST;

        match op {
            STORE => {
                let key = H128::from_slice(take(&mut code, 16));
                let value = H128::from_slice(take(&mut code, 16));
                if host.set_storage(key, value).is_err() {
                    return failure();
                }
            }
            REMOVE => {
                let key = H128::from_slice(take(&mut code, 16));
                if host.remove_storage(&key).is_err() {
                    return failure();
                }
            }
            LOG => {
                let len = take(&mut code, 1)[0] as usize;
                let data = take(&mut code, len).to_vec();
                if host.log(vec![LOG_TOPIC.to_vec()], data).is_err() {
                    return failure();
                }
            }
            SELF_DESTRUCT => {
                let beneficiary = Address::from_slice(take(&mut code, 32));
                if host.self_destruct(&beneficiary).is_err() {
                    return failure();
                }
                return encoded(&ExecutionResult::success(energy, vec![]));
            }
            CALL => {
                let destination = Address::from_slice(take(&mut code, 32));
                let value = U128::from_big_endian(take(&mut code, 16));
                let requested = BigEndian::read_u64(take(&mut code, 8));
                let kind = take(&mut code, 1)[0] as u32;
                let flags = take(&mut code, 1)[0] as u32;
                let len = BigEndian::read_u16(take(&mut code, 2)) as usize;
                let data = take(&mut code, len).to_vec();
                if requested > energy {
                    return encoded(&ExecutionResult::out_of_energy());
                }

                let nested = ExecutionContext {
                    destination,
                    energy_limit: requested,
                    value,
                    data,
                    kind: CallKind::from_u32(kind).expect("scripted kind"),
                    flags,
                    ..context.clone()
                };
                let nested =
                    encode_context(&nested).expect("scripted call fits");
                let output = match host.call(&nested) {
                    Ok(output) => output,
                    Err(_) => return failure(),
                };
                let result =
                    decode_result(&output).expect("host returns results");
                energy = energy - requested + result.energy_remaining;
                last_output = result.output;
            }
            RETURN => {
                let len = BigEndian::read_u16(take(&mut code, 2)) as usize;
                let output = take(&mut code, len).to_vec();
                return encoded(&ExecutionResult::success(energy, output));
            }
            RETURN_LAST => {
                return encoded(&ExecutionResult::success(
                    energy,
                    last_output,
                ));
            }
            REVERT => {
                let len = take(&mut code, 1)[0] as usize;
                let output = take(&mut code, len).to_vec();
                return encoded(&ExecutionResult::new(
                    ResultCode::Revert,
                    energy,
                    output,
                ));
            }
            // Reports unused energy; the executor must take it anyway.
            FAIL => {
                return encoded(&ExecutionResult::new(
                    ResultCode::Failure,
                    energy,
                    vec![],
                ));
            }
            OUT_OF_ENERGY => {
                return encoded(&ExecutionResult::out_of_energy());
            }
            GARBAGE => return vec![0xff; 3],
            OVERREPORT => {
                return encoded(&ExecutionResult::success(
                    context.energy_limit + 1,
                    vec![],
                ));
            }
            _ => {
                return encoded(&ExecutionResult::exhausted(
                    ResultCode::BadInstruction,
                ));
            }
        }
    }

    encoded(&ExecutionResult::success(energy, vec![]))
}

/// Builder for scripts run by [`ScriptedInterpreter`].
#[derive(Default)]
pub struct Script(Bytes);

impl Script {
    pub fn new() -> Self { Script::default() }

    pub fn store(mut self, key: u64, value: u64) -> Self {
        self.0.push(STORE);
        self.0.extend_from_slice(word(key).as_bytes());
        self.0.extend_from_slice(word(value).as_bytes());
        self
    }

    pub fn remove(mut self, key: u64) -> Self {
        self.0.push(REMOVE);
        self.0.extend_from_slice(word(key).as_bytes());
        self
    }

    pub fn log(mut self, data: &[u8]) -> Self {
        self.0.push(LOG);
        self.0.push(data.len() as u8);
        self.0.extend_from_slice(data);
        self
    }

    pub fn self_destruct(mut self, beneficiary: &Address) -> Self {
        self.0.push(SELF_DESTRUCT);
        self.0.extend_from_slice(beneficiary.as_bytes());
        self
    }

    pub fn call(
        self, destination: &Address, value: u64, energy: u64, data: &[u8],
    ) -> Self {
        self.nested(destination, value, energy, CallKind::Call, 0, data)
    }

    pub fn static_call(
        self, destination: &Address, value: u64, energy: u64, data: &[u8],
    ) -> Self {
        let flags = STATIC_FLAG as u8;
        self.nested(destination, value, energy, CallKind::Call, flags, data)
    }

    pub fn create(self, value: u64, energy: u64, init_code: &[u8]) -> Self {
        let destination = Address::zero();
        self.nested(&destination, value, energy, CallKind::Create, 0, init_code)
    }

    fn nested(
        mut self, destination: &Address, value: u64, energy: u64,
        kind: CallKind, flags: u8, data: &[u8],
    ) -> Self {
        let mut fixed = [0u8; 8];
        self.0.push(CALL);
        self.0.extend_from_slice(destination.as_bytes());
        self.0.extend_from_slice(&[0u8; 8]);
        BigEndian::write_u64(&mut fixed, value);
        self.0.extend_from_slice(&fixed);
        BigEndian::write_u64(&mut fixed, energy);
        self.0.extend_from_slice(&fixed);
        self.0.push(kind.to_u32() as u8);
        self.0.push(flags);
        self.0.extend_from_slice(&(data.len() as u16).to_be_bytes());
        self.0.extend_from_slice(data);
        self
    }

    pub fn ret(mut self, output: &[u8]) -> Self {
        self.0.push(RETURN);
        self.0.extend_from_slice(&(output.len() as u16).to_be_bytes());
        self.0.extend_from_slice(output);
        self
    }

    pub fn ret_last(mut self) -> Self {
        self.0.push(RETURN_LAST);
        self
    }

    pub fn revert(mut self, output: &[u8]) -> Self {
        self.0.push(REVERT);
        self.0.push(output.len() as u8);
        self.0.extend_from_slice(output);
        self
    }

    pub fn fail(mut self) -> Self {
        self.0.push(FAIL);
        self
    }

    pub fn out_of_energy(mut self) -> Self {
        self.0.push(OUT_OF_ENERGY);
        self
    }

    pub fn garbage(mut self) -> Self {
        self.0.push(GARBAGE);
        self
    }

    pub fn overreport(mut self) -> Self {
        self.0.push(OVERREPORT);
        self
    }

    pub fn build(self) -> Bytes { self.0 }
}

pub fn word(value: u64) -> StorageValue { H128::from_low_u64_be(value) }

pub fn coinbase() -> Address { Address::repeat_byte(0xcb) }

pub fn test_machine(params: ExecutorParams) -> Machine {
    Machine::new(params, Arc::new(ScriptedInterpreter))
}

pub fn test_block() -> BlockContext {
    BlockContext::new(Env {
        coinbase: coinbase(),
        number: 1,
        timestamp: 1_600_000_000,
        energy_limit: 30_000_000,
        difficulty: 1.into(),
    })
}

pub fn fund(state: &mut dyn StateStore, address: &Address, balance: u64) {
    state.add_balance(address, &balance.into()).unwrap();
}

pub fn install(state: &mut dyn StateStore, address: &Address, code: Bytes) {
    state
        .create_contract_account(address, AccountKind::Interpreted)
        .unwrap();
    state.set_code(address, code).unwrap();
}

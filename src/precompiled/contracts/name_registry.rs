// Copyright 2019 Conflux Foundation. All rights reserved.
// Conflux is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use super::{
    super::{PrecompiledCall, PrecompiledContract},
    ed_verify::verify_ed25519,
};
use crate::{
    error::DbResult,
    state::{StateStore, StateView},
    types::{address_from_public_key, Address, StorageKey, StorageValue},
    unwrap_or_return,
    vm::{ExecutionResult, ResultCode},
};
use keccak_hash::keccak;

pub const REGISTRY_SET_COST: u64 = 1_000;
pub const REGISTRY_TRANSFER_COST: u64 = 2_000;

const SIGNED_LENGTH: usize = 34;
const PUBLIC_KEY_LENGTH: usize = 32;
const SIGNATURE_LENGTH: usize = 64;
const BASE_LENGTH: usize =
    SIGNED_LENGTH + PUBLIC_KEY_LENGTH + SIGNATURE_LENGTH;
const SUBDOMAIN_LENGTH: usize = 32;

const RESOLVER_LABEL: &[u8] = b"resolver";
const TTL_LABEL: &[u8] = b"ttl";
const OWNER_LABEL: &[u8] = b"owner";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    SetResolver = 1,
    SetTtl = 2,
    TransferOwnership = 3,
    TransferSubdomain = 4,
}

impl Operation {
    fn from_u8(op: u8) -> Option<Self> {
        match op {
            1 => Some(Operation::SetResolver),
            2 => Some(Operation::SetTtl),
            3 => Some(Operation::TransferOwnership),
            4 => Some(Operation::TransferSubdomain),
            _ => None,
        }
    }

    fn cost(self) -> u64 {
        match self {
            Operation::SetResolver | Operation::SetTtl => REGISTRY_SET_COST,
            Operation::TransferOwnership | Operation::TransferSubdomain => {
                REGISTRY_TRANSFER_COST
            }
        }
    }

    fn needs_subdomain(self) -> bool {
        self == Operation::TransferSubdomain
    }
}

/// Signature-gated records kept in the storage of the calling account.
///
/// Input is `[chain id | op | 32-byte payload | 32-byte public key |
/// 64-byte signature | optional 32-byte sub-domain]`. The signature covers
/// the first 34 bytes and must come from the key of the record owner, which
/// is the caller until ownership is transferred.
pub struct NameRegistry<'a> {
    state: &'a mut dyn StateStore,
    caller: Address,
    is_static: bool,
    chain_id: u8,
}

struct Request<'i> {
    operation: Operation,
    payload: &'i [u8],
    subdomain: Option<&'i [u8]>,
}

impl<'a> NameRegistry<'a> {
    pub fn new(call: PrecompiledCall<'a>) -> Self {
        NameRegistry {
            caller: call.context.caller,
            is_static: call.context.is_static(),
            chain_id: call.chain_id,
            state: call.state,
        }
    }

    /// Parses and authenticates the input. `None` for anything malformed,
    /// for another chain and for a signer that does not own the records.
    fn authenticate<'i>(
        &self, input: &'i [u8],
    ) -> DbResult<Option<Request<'i>>> {
        if input.len() != BASE_LENGTH
            && input.len() != BASE_LENGTH + SUBDOMAIN_LENGTH
        {
            return Ok(None);
        }
        if input[0] != self.chain_id {
            debug!(
                "name registry: chain id {} != {}",
                input[0], self.chain_id
            );
            return Ok(None);
        }
        let operation =
            unwrap_or_return!(Operation::from_u8(input[1]), Ok(None));
        let subdomain = input.get(BASE_LENGTH..).filter(|s| !s.is_empty());
        if operation.needs_subdomain() != subdomain.is_some() {
            return Ok(None);
        }

        let (signed, rest) = input[..BASE_LENGTH].split_at(SIGNED_LENGTH);
        let (public, signature) = rest.split_at(PUBLIC_KEY_LENGTH);
        if !verify_ed25519(signed, signature, public) {
            return Ok(None);
        }
        if address_from_public_key(public) != self.owner()? {
            debug!("name registry: signer does not own {:?}", self.caller);
            return Ok(None);
        }

        Ok(Some(Request {
            operation,
            payload: &signed[2..],
            subdomain,
        }))
    }

    fn owner(&self) -> DbResult<Address> {
        Ok(self.read(&label_key(OWNER_LABEL))?.unwrap_or(self.caller))
    }

    fn read(&self, slot: &[StorageKey; 2]) -> DbResult<Option<Address>> {
        let high = self.state.storage(&self.caller, &slot[0])?;
        let low = self.state.storage(&self.caller, &slot[1])?;
        Ok(match (high, low) {
            (Some(high), Some(low)) => {
                let mut raw = [0u8; 32];
                raw[..16].copy_from_slice(high.as_bytes());
                raw[16..].copy_from_slice(low.as_bytes());
                Some(Address::from(raw))
            }
            _ => None,
        })
    }

    fn write(&mut self, slot: &[StorageKey; 2], value: &[u8]) -> DbResult<()> {
        self.state.put_storage(
            &self.caller,
            slot[0],
            StorageValue::from_slice(&value[..16]),
        )?;
        self.state.put_storage(
            &self.caller,
            slot[1],
            StorageValue::from_slice(&value[16..32]),
        )
    }
}

impl<'a> PrecompiledContract for NameRegistry<'a> {
    fn execute(
        &mut self, input: &[u8], energy_limit: u64,
    ) -> DbResult<ExecutionResult> {
        let cost = input
            .get(1)
            .and_then(|op| Operation::from_u8(*op))
            .map_or(REGISTRY_SET_COST, |op| op.cost());
        if energy_limit < cost {
            return Ok(ExecutionResult::out_of_energy());
        }
        if self.is_static {
            return Ok(ExecutionResult::exhausted(ResultCode::Failure));
        }
        let request = match self.authenticate(input)? {
            Some(request) => request,
            None => return Ok(ExecutionResult::exhausted(ResultCode::Failure)),
        };

        let slot = match (request.operation, request.subdomain) {
            (Operation::SetResolver, _) => label_key(RESOLVER_LABEL),
            (Operation::SetTtl, _) => label_key(TTL_LABEL),
            (Operation::TransferOwnership, _) => label_key(OWNER_LABEL),
            (Operation::TransferSubdomain, subdomain) => {
                let mut label = subdomain.unwrap_or_default().to_vec();
                label.extend_from_slice(OWNER_LABEL);
                label_key(&label)
            }
        };
        self.write(&slot, request.payload)?;
        trace!(
            "name registry: {:?} for {:?}",
            request.operation,
            self.caller
        );
        Ok(ExecutionResult::success(energy_limit - cost, vec![]))
    }
}

/// The two storage keys holding the record named by `label`.
fn label_key(label: &[u8]) -> [StorageKey; 2] {
    let hash = keccak(label);
    [
        StorageKey::from_slice(&hash[..16]),
        StorageKey::from_slice(&hash[16..]),
    ]
}

#[cfg(test)]
mod tests {
    use super::{
        super::{ed_verify::tests::keypair, NAME_REGISTRY_ADDRESS},
        *,
    };
    use crate::{
        state::{InMemoryBackend, StateView},
        types::{H256, U128},
        vm::{CallKind, Env, ExecutionContext, STATIC_FLAG},
    };
    use ed25519_dalek::{Keypair, Signer};

    fn context(caller: Address, flags: u32) -> ExecutionContext {
        ExecutionContext {
            transaction_hash: H256::zero(),
            destination: *NAME_REGISTRY_ADDRESS,
            origin: caller,
            caller,
            energy_price: U128::one(),
            energy_limit: 10_000,
            value: U128::zero(),
            data: vec![],
            depth: 0,
            kind: CallKind::Call,
            flags,
            env: Env::default(),
        }
    }

    fn request(
        chain_id: u8, op: u8, payload: [u8; 32], keypair: &Keypair,
        subdomain: Option<[u8; 32]>,
    ) -> Vec<u8> {
        let mut signed = vec![chain_id, op];
        signed.extend_from_slice(&payload);
        let signature = keypair.sign(&signed).to_bytes();
        let mut input = signed;
        input.extend_from_slice(keypair.public.as_bytes());
        input.extend_from_slice(&signature);
        if let Some(subdomain) = subdomain {
            input.extend_from_slice(&subdomain);
        }
        input
    }

    fn run(
        state: &mut InMemoryBackend, context: &ExecutionContext, input: &[u8],
        energy_limit: u64,
    ) -> ExecutionResult {
        let call = PrecompiledCall {
            state,
            context,
            chain_id: 7,
        };
        NameRegistry::new(call).execute(input, energy_limit).unwrap()
    }

    fn stored(
        state: &InMemoryBackend, owner: &Address, label: &[u8],
    ) -> Vec<u8> {
        label_key(label)
            .iter()
            .flat_map(|key| {
                state.storage(owner, key).unwrap().unwrap().as_bytes().to_vec()
            })
            .collect()
    }

    #[test]
    fn owner_sets_resolver() {
        let keypair = keypair(9);
        let caller = address_from_public_key(keypair.public.as_bytes());
        let mut state = InMemoryBackend::new();
        let input = request(7, 1, [0x55; 32], &keypair, None);

        let result = run(&mut state, &context(caller, 0), &input, 5_000);
        assert_eq!(result, ExecutionResult::success(4_000, vec![]));
        assert_eq!(stored(&state, &caller, RESOLVER_LABEL), vec![0x55; 32]);
    }

    #[test]
    fn transfer_changes_the_signer_required() {
        let first = keypair(1);
        let second = keypair(2);
        let caller = address_from_public_key(first.public.as_bytes());
        let next_owner = address_from_public_key(second.public.as_bytes());
        let mut state = InMemoryBackend::new();
        let context = context(caller, 0);

        let input = request(7, 3, next_owner.0, &first, None);
        let result = run(&mut state, &context, &input, 2_000);
        assert_eq!(result, ExecutionResult::success(0, vec![]));
        assert_eq!(stored(&state, &caller, OWNER_LABEL), next_owner.0);

        // the previous owner is locked out
        let input = request(7, 2, [1; 32], &first, None);
        let result = run(&mut state, &context, &input, 2_000);
        assert_eq!(result, ExecutionResult::exhausted(ResultCode::Failure));

        let input = request(7, 2, [1; 32], &second, None);
        let result = run(&mut state, &context, &input, 2_000);
        assert_eq!(result, ExecutionResult::success(1_000, vec![]));
        assert_eq!(stored(&state, &caller, TTL_LABEL), vec![1; 32]);
    }

    #[test]
    fn subdomain_transfer_uses_its_own_slot() {
        let keypair = keypair(3);
        let caller = address_from_public_key(keypair.public.as_bytes());
        let mut state = InMemoryBackend::new();
        let context = context(caller, 0);

        // the sub-domain payload is mandatory for op 4 only
        let input = request(7, 4, [8; 32], &keypair, None);
        assert_eq!(
            run(&mut state, &context, &input, 5_000).code,
            ResultCode::Failure
        );
        let input = request(7, 1, [8; 32], &keypair, Some([6; 32]));
        assert_eq!(
            run(&mut state, &context, &input, 5_000).code,
            ResultCode::Failure
        );

        let input = request(7, 4, [8; 32], &keypair, Some([6; 32]));
        let result = run(&mut state, &context, &input, 5_000);
        assert_eq!(result, ExecutionResult::success(3_000, vec![]));
        let mut label = vec![6; 32];
        label.extend_from_slice(OWNER_LABEL);
        assert_eq!(stored(&state, &caller, &label), vec![8; 32]);
        assert!(state.storage_keys(&caller).unwrap().len() == 2);
    }

    #[test]
    fn rejects_foreign_signer_and_chain() {
        let owner = keypair(4);
        let intruder = keypair(5);
        let caller = address_from_public_key(owner.public.as_bytes());
        let mut state = InMemoryBackend::new();
        let context = context(caller, 0);

        let input = request(7, 1, [1; 32], &intruder, None);
        assert_eq!(
            run(&mut state, &context, &input, 5_000),
            ExecutionResult::exhausted(ResultCode::Failure)
        );
        let input = request(8, 1, [1; 32], &owner, None);
        assert_eq!(
            run(&mut state, &context, &input, 5_000),
            ExecutionResult::exhausted(ResultCode::Failure)
        );
        let mut input = request(7, 1, [1; 32], &owner, None);
        // tamper with the signed payload
        input[2] ^= 1;
        assert_eq!(
            run(&mut state, &context, &input, 5_000),
            ExecutionResult::exhausted(ResultCode::Failure)
        );
        assert!(state.storage_keys(&caller).unwrap().is_empty());
    }

    #[test]
    fn static_context_and_energy() {
        let keypair = keypair(6);
        let caller = address_from_public_key(keypair.public.as_bytes());
        let mut state = InMemoryBackend::new();
        let input = request(7, 3, [2; 32], &keypair, None);

        let limit = REGISTRY_TRANSFER_COST - 1;
        let result = run(&mut state, &context(caller, 0), &input, limit);
        assert_eq!(result, ExecutionResult::out_of_energy());

        let context = context(caller, STATIC_FLAG);
        let result = run(&mut state, &context, &input, 5_000);
        assert_eq!(result, ExecutionResult::exhausted(ResultCode::Failure));
        assert!(state.storage_keys(&caller).unwrap().is_empty());
    }
}

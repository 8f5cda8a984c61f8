// Copyright 2019 Conflux Foundation. All rights reserved.
// Conflux is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use super::super::PrecompiledContract;
use crate::{
    error::DbResult,
    vm::{ExecutionResult, ResultCode},
};
use ed25519_dalek::{PublicKey, Signature, Verifier};

pub const ED_VERIFY_COST: u64 = 3_000;

const MESSAGE_LENGTH: usize = 64;
const SIGNATURE_LENGTH: usize = 64;
const PUBLIC_KEY_LENGTH: usize = 32;
const INPUT_LENGTH: usize =
    MESSAGE_LENGTH + SIGNATURE_LENGTH + PUBLIC_KEY_LENGTH;

/// Verifies an ed25519 signature. Input is
/// `[64-byte message | 64-byte signature | 32-byte public key]`, output is a
/// single byte, 1 for a valid signature and 0 otherwise.
pub struct EdVerify;

impl PrecompiledContract for EdVerify {
    fn execute(
        &mut self, input: &[u8], energy_limit: u64,
    ) -> DbResult<ExecutionResult> {
        if energy_limit < ED_VERIFY_COST {
            return Ok(ExecutionResult::out_of_energy());
        }
        if input.len() != INPUT_LENGTH {
            return Ok(ExecutionResult::exhausted(ResultCode::Failure));
        }

        let (message, rest) = input.split_at(MESSAGE_LENGTH);
        let (signature, public) = rest.split_at(SIGNATURE_LENGTH);
        let valid = verify_ed25519(message, signature, public);
        Ok(ExecutionResult::success(
            energy_limit - ED_VERIFY_COST,
            vec![valid as u8],
        ))
    }
}

/// Whether `signature` is a valid signature of `message` under `public`.
/// Malformed keys or signatures are simply invalid.
pub(super) fn verify_ed25519(
    message: &[u8], signature: &[u8], public: &[u8],
) -> bool {
    let public = match PublicKey::from_bytes(public) {
        Ok(public) => public,
        Err(_) => return false,
    };
    let signature = match Signature::try_from(signature) {
        Ok(signature) => signature,
        Err(_) => return false,
    };
    public.verify(message, &signature).is_ok()
}

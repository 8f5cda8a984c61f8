// Copyright 2019 Conflux Foundation. All rights reserved.
// Conflux is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

pub use ethereum_types::{H128, H256, U128, U256};
use keccak_hash::keccak;
use rlp::RlpStream;

/// Account and contract identifier. Equality is byte-wise.
pub type Address = H256;

pub type StorageKey = H128;
pub type StorageValue = H128;

pub type Bytes = Vec<u8>;

/// First byte of every derived account address.
pub const ACCOUNT_ADDRESS_PREFIX: u8 = 0xa0;

pub const ADDRESS_LENGTH: usize = 32;
pub const WORD_LENGTH: usize = 16;

/// Address of a contract created by `sender` when its nonce is `nonce`.
pub fn contract_address(sender: &Address, nonce: &U256) -> Address {
    let mut stream = RlpStream::new_list(2);
    stream.append(sender);
    stream.append(nonce);
    with_account_prefix(keccak(stream.as_raw()))
}

/// Address owned by an ed25519 public key.
pub fn address_from_public_key(public: &[u8]) -> Address {
    with_account_prefix(keccak(public))
}

/// Widens a 16-byte word to the width of a balance.
#[inline]
pub fn word_to_u256(word: &U128) -> U256 { U256::from(word.as_u128()) }

fn with_account_prefix(mut hash: H256) -> Address {
    hash.0[0] = ACCOUNT_ADDRESS_PREFIX;
    hash
}

// Copyright 2019 Conflux Foundation. All rights reserved.
// Conflux is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use crate::{
    substate::{InternalTransaction, LogEntry},
    types::{Address, Bytes, H256},
    vm::{OutcomeClass, ResultCode},
};
use rlp::{Encodable, RlpStream};

/// Information describing execution of a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub transaction_hash: H256,
    pub result_code: ResultCode,
    pub energy_used: u64,
    pub output: Bytes,
    /// Empty exactly when the transaction succeeded.
    pub error: String,
    /// The logs stemming from this transaction.
    pub logs: Vec<LogEntry>,
    pub internal_transactions: Vec<InternalTransaction>,
    pub deleted_accounts: Vec<Address>,
    pub contract_address: Option<Address>,
}

impl Receipt {
    pub(super) fn rejected(
        transaction_hash: H256, result_code: ResultCode,
    ) -> Self {
        Receipt {
            transaction_hash,
            result_code,
            energy_used: 0,
            output: vec![],
            error: result_code.error_label().into(),
            logs: vec![],
            internal_transactions: vec![],
            deleted_accounts: vec![],
            contract_address: None,
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool { self.result_code.is_success() }

    /// Refused by validation, as opposed to executed and failed.
    #[inline]
    pub fn is_rejected(&self) -> bool {
        self.result_code.outcome_class() == OutcomeClass::Rejected
    }

    /// Canonical encoding; identical inputs give identical bytes.
    pub fn encoded(&self) -> Bytes { rlp::encode(self).to_vec() }
}

impl Encodable for Receipt {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(9);
        s.append(&self.transaction_hash);
        s.append(&(self.result_code.to_i32() as u32));
        s.append(&self.energy_used);
        s.append(&self.output);
        s.append(&self.error);
        s.append_list::<LogEntry, LogEntry>(&self.logs);
        s.append_list::<InternalTransaction, InternalTransaction>(
            &self.internal_transactions,
        );
        s.append_list::<Address, Address>(&self.deleted_accounts);
        match self.contract_address {
            Some(ref address) => s.append(address),
            None => s.append_empty_data(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_receipt() {
        let receipt = Receipt::rejected(
            H256::repeat_byte(1),
            ResultCode::InsufficientBalance,
        );
        assert!(receipt.is_rejected());
        assert!(!receipt.is_success());
        assert_eq!(receipt.error, "InsufficientBalance");
        assert_eq!(receipt.energy_used, 0);
    }

    #[test]
    fn encoding_distinguishes_contract_address() {
        let mut receipt =
            Receipt::rejected(H256::zero(), ResultCode::Success);
        let without = receipt.encoded();
        receipt.contract_address = Some(Address::repeat_byte(0xa0));
        assert_ne!(without, receipt.encoded());
        assert_eq!(receipt.encoded(), receipt.clone().encoded());
    }
}

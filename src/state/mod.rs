// Copyright 2019 Conflux Foundation. All rights reserved.
// Conflux is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

//! Ledger State: a tree of copy-on-write layers. The root is a durable
//! backend; every other layer overlays its parent with local writes and
//! tombstones, and either commits them into the parent or discards them.

/// Account record stored per address.
mod account;

/// In-memory durable backend, the root of a layer tree.
mod backend;

/// Overlay layer with commit and rollback.
mod layer;

#[cfg(test)]
mod tests;

pub use account::{AccountKind, AccountState};
pub use backend::InMemoryBackend;
pub use layer::Layer;

pub use crate::error::{DbResult, StateError};
use crate::types::{Address, Bytes, StorageKey, StorageValue, U256};
use std::collections::BTreeSet;

/// Read access to account records and storage.
pub trait StateView {
    fn account(&self, address: &Address) -> DbResult<Option<AccountState>>;

    fn storage(
        &self, address: &Address, key: &StorageKey,
    ) -> DbResult<Option<StorageValue>>;

    /// Every key with a live storage entry under `address`.
    fn storage_keys(&self, address: &Address) -> DbResult<BTreeSet<StorageKey>>;
}

/// Point writes on top of [`StateView`]. The durable backend and every
/// [`Layer`] implement it; only a layer can be committed.
pub trait StateStore: StateView + Send {
    fn put_account(
        &mut self, address: &Address, account: AccountState,
    ) -> DbResult<()>;

    fn put_storage(
        &mut self, address: &Address, key: StorageKey, value: StorageValue,
    ) -> DbResult<()>;

    fn delete_storage(
        &mut self, address: &Address, key: &StorageKey,
    ) -> DbResult<()>;

    /// Removes the account record and every storage entry of `address`.
    fn delete_account(&mut self, address: &Address) -> DbResult<()>;
}

/// Account-level operations expressed through [`StateStore`]. Balance and
/// nonce changes are deltas on the currently visible value.
pub trait StateExt: StateStore {
    /// An account exists if it has a record or at least one storage entry.
    fn exists(&self, address: &Address) -> DbResult<bool> {
        Ok(self.has_account_state(address)?
            || !self.storage_keys(address)?.is_empty())
    }

    fn has_account_state(&self, address: &Address) -> DbResult<bool> {
        Ok(self.account(address)?.is_some())
    }

    fn balance(&self, address: &Address) -> DbResult<U256> {
        Ok(self.account(address)?.map_or_else(U256::zero, |a| a.balance))
    }

    fn nonce(&self, address: &Address) -> DbResult<U256> {
        Ok(self.account(address)?.map_or_else(U256::zero, |a| a.nonce))
    }

    fn code(&self, address: &Address) -> DbResult<Option<Bytes>> {
        Ok(self.account(address)?.and_then(|a| a.code))
    }

    fn modify_account<F>(&mut self, address: &Address, f: F) -> DbResult<()>
    where F: FnOnce(&mut AccountState) -> DbResult<()> {
        let mut account = self.account(address)?.unwrap_or_default();
        f(&mut account)?;
        self.put_account(address, account)
    }

    fn add_balance(&mut self, address: &Address, by: &U256) -> DbResult<()> {
        if by.is_zero() {
            return Ok(());
        }
        self.modify_account(address, |account| {
            account.balance = account
                .balance
                .checked_add(*by)
                .ok_or(StateError::BalanceOverflow(*address))?;
            Ok(())
        })
    }

    fn sub_balance(&mut self, address: &Address, by: &U256) -> DbResult<()> {
        if by.is_zero() {
            return Ok(());
        }
        self.modify_account(address, |account| {
            account.balance = account.balance.checked_sub(*by).ok_or(
                StateError::BalanceUnderflow {
                    address: *address,
                    required: *by,
                    got: account.balance,
                },
            )?;
            Ok(())
        })
    }

    fn transfer_balance(
        &mut self, from: &Address, to: &Address, by: &U256,
    ) -> DbResult<()> {
        self.sub_balance(from, by)?;
        self.add_balance(to, by)
    }

    fn inc_nonce(&mut self, address: &Address) -> DbResult<()> {
        self.modify_account(address, |account| {
            account.nonce = account
                .nonce
                .checked_add(U256::one())
                .ok_or(StateError::NonceOverflow(*address))?;
            Ok(())
        })
    }

    /// Writes a fresh contract record, keeping any balance already sent to
    /// the address.
    fn create_contract_account(
        &mut self, address: &Address, kind: AccountKind,
    ) -> DbResult<()> {
        self.modify_account(address, |account| {
            account.kind = kind;
            Ok(())
        })
    }

    fn set_code(&mut self, address: &Address, code: Bytes) -> DbResult<()> {
        self.modify_account(address, |account| {
            account.code = Some(code);
            Ok(())
        })
    }
}

impl<T: StateStore + ?Sized> StateExt for T {}

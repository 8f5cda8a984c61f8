// Copyright 2019 Conflux Foundation. All rights reserved.
// Conflux is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use super::{AccountState, DbResult, StateStore, StateView};
use crate::types::{Address, StorageKey, StorageValue};
use std::collections::{BTreeMap, BTreeSet};

/// Durable store kept in memory. It is the root of a layer tree and has no
/// parent to commit into.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryBackend {
    accounts: BTreeMap<Address, AccountState>,
    storage: BTreeMap<Address, BTreeMap<StorageKey, StorageValue>>,
}

impl InMemoryBackend {
    pub fn new() -> Self { Self::default() }

    pub fn account_count(&self) -> usize { self.accounts.len() }
}

impl StateView for InMemoryBackend {
    fn account(&self, address: &Address) -> DbResult<Option<AccountState>> {
        Ok(self.accounts.get(address).cloned())
    }

    fn storage(
        &self, address: &Address, key: &StorageKey,
    ) -> DbResult<Option<StorageValue>> {
        Ok(self
            .storage
            .get(address)
            .and_then(|entries| entries.get(key))
            .copied())
    }

    fn storage_keys(
        &self, address: &Address,
    ) -> DbResult<BTreeSet<StorageKey>> {
        Ok(self
            .storage
            .get(address)
            .map(|entries| entries.keys().copied().collect())
            .unwrap_or_default())
    }
}

impl StateStore for InMemoryBackend {
    fn put_account(
        &mut self, address: &Address, account: AccountState,
    ) -> DbResult<()> {
        self.accounts.insert(*address, account);
        Ok(())
    }

    fn put_storage(
        &mut self, address: &Address, key: StorageKey, value: StorageValue,
    ) -> DbResult<()> {
        self.storage.entry(*address).or_default().insert(key, value);
        Ok(())
    }

    fn delete_storage(
        &mut self, address: &Address, key: &StorageKey,
    ) -> DbResult<()> {
        if let Some(entries) = self.storage.get_mut(address) {
            entries.remove(key);
            if entries.is_empty() {
                self.storage.remove(address);
            }
        }
        Ok(())
    }

    fn delete_account(&mut self, address: &Address) -> DbResult<()> {
        self.accounts.remove(address);
        self.storage.remove(address);
        Ok(())
    }
}

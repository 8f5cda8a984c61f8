// Copyright 2019 Conflux Foundation. All rights reserved.
// Conflux is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use super::{AccountState, DbResult, StateStore, StateView};
use crate::types::{Address, StorageKey, StorageValue};
use std::collections::{BTreeSet, HashMap, HashSet};

/// An overlay on a parent store. Writes and deletions stay local until
/// [`Layer::commit`] merges them into the parent; dropping a layer without
/// committing discards them.
///
/// A child borrows its parent mutably, so the parent cannot be read or
/// written while the child is alive and children of one parent are
/// committed strictly one after another.
pub struct Layer<'p> {
    parent: &'p mut dyn StateStore,
    accounts: HashMap<Address, AccountState>,
    storage: HashMap<Address, HashMap<StorageKey, StorageValue>>,
    /// Storage tombstones shadowing the parent's entries.
    deleted_storage: HashMap<Address, HashSet<StorageKey>>,
    /// Accounts wiped in this layer. Local records of such an account were
    /// written after the wipe.
    deleted_accounts: HashSet<Address>,
}

impl<'p> Layer<'p> {
    pub fn new(parent: &'p mut dyn StateStore) -> Self {
        Layer {
            parent,
            accounts: HashMap::new(),
            storage: HashMap::new(),
            deleted_storage: HashMap::new(),
            deleted_accounts: HashSet::new(),
        }
    }

    pub fn derive_child(&mut self) -> Layer<'_> { Layer::new(self) }

    /// Read-only view of the parent, unaffected by this layer's changes.
    pub fn parent(&self) -> &dyn StateStore { &*self.parent }

    /// Merges every local change into the parent: account wipes first, then
    /// storage tombstones, then written records and entries. A later write
    /// in this layer therefore always survives an earlier deletion.
    pub fn commit(self) -> DbResult<()> {
        let Layer {
            parent,
            accounts,
            storage,
            deleted_storage,
            deleted_accounts,
        } = self;
        trace!(
            "commit layer: wiped={}, accounts={}, storage accounts={}, \
             tombstone accounts={}",
            deleted_accounts.len(),
            accounts.len(),
            storage.len(),
            deleted_storage.len()
        );

        for address in &deleted_accounts {
            parent.delete_account(address)?;
        }
        for (address, keys) in &deleted_storage {
            for key in keys {
                parent.delete_storage(address, key)?;
            }
        }
        for (address, account) in accounts {
            parent.put_account(&address, account)?;
        }
        for (address, entries) in storage {
            for (key, value) in entries {
                parent.put_storage(&address, key, value)?;
            }
        }
        Ok(())
    }

    /// Discards every local change. Reads afterwards behave as on a freshly
    /// derived layer.
    pub fn rollback(&mut self) {
        self.accounts.clear();
        self.storage.clear();
        self.deleted_storage.clear();
        self.deleted_accounts.clear();
    }

    pub fn is_dirty(&self) -> bool {
        !(self.accounts.is_empty()
            && self.storage.is_empty()
            && self.deleted_storage.is_empty()
            && self.deleted_accounts.is_empty())
    }

    fn is_tombstoned(&self, address: &Address, key: &StorageKey) -> bool {
        self.deleted_storage
            .get(address)
            .map_or(false, |keys| keys.contains(key))
    }
}

impl<'p> StateView for Layer<'p> {
    fn account(&self, address: &Address) -> DbResult<Option<AccountState>> {
        if let Some(account) = self.accounts.get(address) {
            return Ok(Some(account.clone()));
        }
        if self.deleted_accounts.contains(address) {
            return Ok(None);
        }
        self.parent.account(address)
    }

    fn storage(
        &self, address: &Address, key: &StorageKey,
    ) -> DbResult<Option<StorageValue>> {
        if let Some(value) =
            self.storage.get(address).and_then(|entries| entries.get(key))
        {
            return Ok(Some(*value));
        }
        if self.is_tombstoned(address, key)
            || self.deleted_accounts.contains(address)
        {
            return Ok(None);
        }
        self.parent.storage(address, key)
    }

    fn storage_keys(
        &self, address: &Address,
    ) -> DbResult<BTreeSet<StorageKey>> {
        let mut keys = if self.deleted_accounts.contains(address) {
            BTreeSet::new()
        } else {
            let mut inherited = self.parent.storage_keys(address)?;
            if let Some(tombstones) = self.deleted_storage.get(address) {
                inherited.retain(|key| !tombstones.contains(key));
            }
            inherited
        };
        if let Some(entries) = self.storage.get(address) {
            keys.extend(entries.keys().copied());
        }
        Ok(keys)
    }
}

impl<'p> StateStore for Layer<'p> {
    fn put_account(
        &mut self, address: &Address, account: AccountState,
    ) -> DbResult<()> {
        self.accounts.insert(*address, account);
        Ok(())
    }

    fn put_storage(
        &mut self, address: &Address, key: StorageKey, value: StorageValue,
    ) -> DbResult<()> {
        if let Some(keys) = self.deleted_storage.get_mut(address) {
            keys.remove(&key);
        }
        self.storage.entry(*address).or_default().insert(key, value);
        Ok(())
    }

    fn delete_storage(
        &mut self, address: &Address, key: &StorageKey,
    ) -> DbResult<()> {
        if let Some(entries) = self.storage.get_mut(address) {
            entries.remove(key);
        }
        self.deleted_storage.entry(*address).or_default().insert(*key);
        Ok(())
    }

    fn delete_account(&mut self, address: &Address) -> DbResult<()> {
        self.accounts.remove(address);
        self.storage.remove(address);
        self.deleted_storage.remove(address);
        self.deleted_accounts.insert(*address);
        Ok(())
    }
}

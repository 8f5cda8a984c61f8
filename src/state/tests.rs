// Copyright 2019 Conflux Foundation. All rights reserved.
// Conflux is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use super::*;
use crate::types::{H128, U256};

fn addr(byte: u8) -> Address { Address::repeat_byte(byte) }

fn word(byte: u8) -> H128 { H128::repeat_byte(byte) }

fn backend_with_entry() -> InMemoryBackend {
    let mut backend = InMemoryBackend::new();
    backend.put_storage(&addr(1), word(1), word(0xaa)).unwrap();
    backend
        .put_account(&addr(1), AccountState::with_balance(100.into()))
        .unwrap();
    backend
}

#[test]
fn child_write_is_invisible_until_commit() {
    let mut root = InMemoryBackend::new();
    {
        let mut layer = Layer::new(&mut root);
        let mut child = layer.derive_child();
        child.put_storage(&addr(1), word(1), word(2)).unwrap();
        assert_eq!(child.storage(&addr(1), &word(1)).unwrap(), Some(word(2)));
        assert_eq!(child.parent().storage(&addr(1), &word(1)).unwrap(), None);

        child.commit().unwrap();
        assert_eq!(layer.storage(&addr(1), &word(1)).unwrap(), Some(word(2)));
        assert_eq!(layer.parent().storage(&addr(1), &word(1)).unwrap(), None);
    }
    assert_eq!(root.storage(&addr(1), &word(1)).unwrap(), None);
}

#[test]
fn rollback_discards_committed_grandchild() {
    let mut root = backend_with_entry();
    let before = root.clone();
    {
        let mut layer = Layer::new(&mut root);
        {
            let mut child = layer.derive_child();
            {
                let mut grandchild = child.derive_child();
                grandchild.put_storage(&addr(1), word(1), word(0xbb)).unwrap();
                grandchild.add_balance(&addr(1), &5.into()).unwrap();
                grandchild.commit().unwrap();
            }
            assert_eq!(
                child.storage(&addr(1), &word(1)).unwrap(),
                Some(word(0xbb))
            );
            child.rollback();
            assert!(!child.is_dirty());
            assert_eq!(
                child.storage(&addr(1), &word(1)).unwrap(),
                Some(word(0xaa))
            );
            assert_eq!(child.balance(&addr(1)).unwrap(), U256::from(100));
            child.commit().unwrap();
        }
        assert!(!layer.is_dirty());
        layer.commit().unwrap();
    }
    assert_eq!(root, before);
}

#[test]
fn delete_shadows_ancestor_entry() {
    let mut root = backend_with_entry();
    let mut layer = Layer::new(&mut root);
    {
        let mut child = layer.derive_child();
        child.delete_storage(&addr(1), &word(1)).unwrap();
        assert_eq!(child.storage(&addr(1), &word(1)).unwrap(), None);
        assert_eq!(
            child.parent().storage(&addr(1), &word(1)).unwrap(),
            Some(word(0xaa))
        );
        {
            let grandchild = child.derive_child();
            assert_eq!(grandchild.storage(&addr(1), &word(1)).unwrap(), None);
            assert!(grandchild.storage_keys(&addr(1)).unwrap().is_empty());
        }
        child.commit().unwrap();
    }
    assert_eq!(layer.storage(&addr(1), &word(1)).unwrap(), None);
    assert_eq!(
        layer.parent().storage(&addr(1), &word(1)).unwrap(),
        Some(word(0xaa))
    );
    layer.commit().unwrap();
    assert_eq!(root.storage(&addr(1), &word(1)).unwrap(), None);
}

#[test]
fn write_after_delete_wins_on_commit() {
    let mut root = backend_with_entry();
    {
        let mut layer = Layer::new(&mut root);
        layer.delete_storage(&addr(1), &word(1)).unwrap();
        layer.put_storage(&addr(1), word(1), word(0xcc)).unwrap();
        layer.commit().unwrap();
    }
    assert_eq!(root.storage(&addr(1), &word(1)).unwrap(), Some(word(0xcc)));
}

#[test]
fn rolled_back_sibling_leaves_no_trace() {
    let mut root = backend_with_entry();
    let mut expected = root.clone();
    {
        let mut layer = Layer::new(&mut root);
        {
            let mut discarded = layer.derive_child();
            discarded.put_storage(&addr(2), word(2), word(2)).unwrap();
            discarded.delete_storage(&addr(1), &word(1)).unwrap();
            discarded.sub_balance(&addr(1), &40.into()).unwrap();
            // dropped without commit
        }
        {
            let mut kept = layer.derive_child();
            kept.put_storage(&addr(3), word(3), word(3)).unwrap();
            kept.add_balance(&addr(1), &1.into()).unwrap();
            kept.commit().unwrap();
        }
        layer.commit().unwrap();
    }
    {
        let mut layer = Layer::new(&mut expected);
        layer.put_storage(&addr(3), word(3), word(3)).unwrap();
        layer.add_balance(&addr(1), &1.into()).unwrap();
        layer.commit().unwrap();
    }
    assert_eq!(root, expected);
}

#[test]
fn account_deletion_hides_inherited_storage() {
    let mut root = backend_with_entry();
    {
        let mut layer = Layer::new(&mut root);
        assert!(layer.exists(&addr(1)).unwrap());
        layer.delete_account(&addr(1)).unwrap();
        assert!(!layer.exists(&addr(1)).unwrap());
        assert_eq!(layer.balance(&addr(1)).unwrap(), U256::zero());
        assert_eq!(layer.storage(&addr(1), &word(1)).unwrap(), None);

        layer.put_storage(&addr(1), word(9), word(9)).unwrap();
        assert_eq!(
            layer
                .storage_keys(&addr(1))
                .unwrap()
                .into_iter()
                .collect::<Vec<_>>(),
            vec![word(9)]
        );
        layer.commit().unwrap();
    }
    assert!(!root.has_account_state(&addr(1)).unwrap());
    assert_eq!(root.storage(&addr(1), &word(1)).unwrap(), None);
    assert_eq!(root.storage(&addr(1), &word(9)).unwrap(), Some(word(9)));
}

#[test]
fn storage_alone_makes_an_account_exist() {
    let mut root = InMemoryBackend::new();
    root.put_storage(&addr(5), word(1), word(1)).unwrap();
    assert!(root.exists(&addr(5)).unwrap());
    assert!(!root.has_account_state(&addr(5)).unwrap());
    assert!(!root.exists(&addr(6)).unwrap());
}

#[test]
fn balance_and_nonce_are_deltas() {
    let mut root = backend_with_entry();
    {
        let mut layer = Layer::new(&mut root);
        layer.add_balance(&addr(1), &5.into()).unwrap();
        layer.inc_nonce(&addr(1)).unwrap();
        assert_eq!(layer.balance(&addr(1)).unwrap(), U256::from(105));
        assert_eq!(layer.nonce(&addr(1)).unwrap(), U256::one());
        assert_eq!(layer.parent().balance(&addr(1)).unwrap(), U256::from(100));

        assert_eq!(
            layer.sub_balance(&addr(1), &200.into()),
            Err(StateError::BalanceUnderflow {
                address: addr(1),
                required: 200.into(),
                got: 105.into(),
            })
        );
        layer.commit().unwrap();
    }
    assert_eq!(root.balance(&addr(1)).unwrap(), U256::from(105));
    assert_eq!(root.nonce(&addr(1)).unwrap(), U256::one());
}

#[test]
fn balance_overflow_is_detected() {
    let mut root = InMemoryBackend::new();
    root.add_balance(&addr(1), &U256::MAX).unwrap();
    assert_eq!(
        root.add_balance(&addr(1), &U256::one()),
        Err(StateError::BalanceOverflow(addr(1)))
    );
}

#[test]
fn zero_transfer_creates_nothing() {
    let mut root = InMemoryBackend::new();
    root.transfer_balance(&addr(1), &addr(2), &U256::zero())
        .unwrap();
    assert_eq!(root.account_count(), 0);
}

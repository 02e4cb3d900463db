// SPDX-License-Identifier: GPL-3.0-only

//! The ordered set of keys currently down in a gesture session.

use crate::layout::Key;

/// Keys currently down, in the order they were entered.
///
/// Never holds the same key twice. Removing a key keeps the relative order of
/// the others.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveKeys {
    keys: Vec<Key>,
}

impl ActiveKeys {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `key` unless it is already present.
    ///
    /// Returns `true` if the key was added.
    pub fn insert(&mut self, key: Key) -> bool {
        if self.keys.contains(&key) {
            return false;
        }
        self.keys.push(key);
        true
    }

    /// Removes `key`, returning `true` if it was present.
    pub fn remove(&mut self, key: &Key) -> bool {
        match self.keys.iter().position(|k| k == key) {
            Some(index) => {
                self.keys.remove(index);
                true
            }
            None => false,
        }
    }

    /// Returns `true` if `key` is present.
    pub fn contains(&self, key: &Key) -> bool {
        self.keys.contains(key)
    }

    /// Returns the most recently entered key.
    pub fn last(&self) -> Option<&Key> {
        self.keys.last()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns the keys as a slice, in insertion order.
    pub fn as_slice(&self) -> &[Key] {
        &self.keys
    }

    /// Removes and returns all keys, in insertion order.
    pub fn take_all(&mut self) -> Vec<Key> {
        std::mem::take(&mut self.keys)
    }
}

// ============================================================================
// Tests
// ============================================================================

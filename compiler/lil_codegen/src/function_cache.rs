//! Compiled-function bindings and the function cache.
//!
//! The cache maps a [`FunctionKey`] to the finished function. It is
//! append-only: the first finished function for a key wins, and a later
//! declaration reaching the same key reuses it without recompiling.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::warn;

use crate::{FunctionKey, ValueKind};

/// How far the function behind an entry has been built.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FunctionState {
    /// Body is being compiled with declared parameters only.
    Draft,
    /// Body is being recompiled with capture parameters appended.
    Specializing,
    /// Finished; safe to call from anywhere in scope.
    Final,
}

/// A callable function and its signature.
#[derive(Clone, Debug)]
pub struct FunctionEntry<F> {
    pub func: F,
    pub key: FunctionKey,
    /// Declared parameters followed by capture parameters.
    pub params: SmallVec<[ValueKind; 4]>,
    /// Number of declared (explicit) parameters.
    pub explicit: usize,
    pub ret: ValueKind,
    pub local: bool,
    pub state: FunctionState,
}

impl<F> FunctionEntry<F> {
    /// Number of trailing capture parameters.
    pub fn capture_count(&self) -> usize {
        self.params.len() - self.explicit
    }

    pub fn explicit_params(&self) -> &[ValueKind] {
        &self.params[..self.explicit]
    }
}

/// Finished functions by key.
#[derive(Debug)]
pub struct FunctionCache<F> {
    entries: FxHashMap<FunctionKey, FunctionEntry<F>>,
}

impl<F: Copy> FunctionCache<F> {
    pub fn new() -> Self {
        FunctionCache {
            entries: FxHashMap::default(),
        }
    }

    pub fn get(&self, key: &FunctionKey) -> Option<&FunctionEntry<F>> {
        self.entries.get(key)
    }

    /// Insert a finished function. An existing entry is kept.
    pub fn insert(&mut self, entry: FunctionEntry<F>) {
        if self.entries.contains_key(&entry.key) {
            warn!(key = ?entry.key, "function cache already holds this key");
            return;
        }
        self.entries.insert(entry.key.clone(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<F: Copy> Default for FunctionCache<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;

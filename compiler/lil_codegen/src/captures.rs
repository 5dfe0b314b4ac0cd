//! Static function paths and the closure capture table.
//!
//! A [`FunctionPath`] names the chain of enclosing function bodies at the
//! point a declaration is reached. Together with the declared name it forms
//! a [`FunctionKey`], the identity used by both the capture table and the
//! function cache.
//!
//! The [`CaptureTable`] records, per key, which outer names the function's
//! body reached across its own boundary. Insertion order is discovery order
//! and becomes the order of the trailing parameters after specialization.

use std::fmt;

use lil_ir::{Name, StringInterner};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::ValueKind;

/// Enclosing function names, outermost first. Empty at top level.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FunctionPath(SmallVec<[Name; 4]>);

impl FunctionPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_names(names: impl IntoIterator<Item = Name>) -> Self {
        FunctionPath(names.into_iter().collect())
    }

    pub fn names(&self) -> &[Name] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Identity of one function literal: where it was declared, and its name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionKey {
    pub path: FunctionPath,
    pub name: Name,
}

impl FunctionKey {
    pub fn new(path: FunctionPath, name: Name) -> Self {
        FunctionKey { path, name }
    }

    /// Symbol name in the emitted module: `outer.inner.name`.
    pub fn mangle(&self, interner: &StringInterner) -> String {
        let mut symbol = String::new();
        for &segment in self.path.names() {
            symbol.push_str(interner.lookup(segment));
            symbol.push('.');
        }
        symbol.push_str(interner.lookup(self.name));
        symbol
    }

    /// Borrow a display adapter resolving names through `interner`.
    pub fn display<'a>(&'a self, interner: &'a StringInterner) -> KeyDisplay<'a> {
        KeyDisplay {
            key: self,
            interner,
        }
    }
}

pub struct KeyDisplay<'a> {
    key: &'a FunctionKey,
    interner: &'a StringInterner,
}

impl fmt::Display for KeyDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key.mangle(self.interner))
    }
}

/// One captured outer variable: its name and the kind of its slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Capture {
    pub name: Name,
    pub kind: ValueKind,
}

/// Per-function list of captured names, in discovery order.
#[derive(Default, Debug)]
pub struct CaptureTable {
    entries: FxHashMap<FunctionKey, SmallVec<[Capture; 4]>>,
}

impl CaptureTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `key`'s body reads `name` from outside. Returns `false`
    /// if the name was already recorded for this key.
    pub fn record(&mut self, key: &FunctionKey, name: Name, kind: ValueKind) -> bool {
        let list = self.entries.entry(key.clone()).or_default();
        if list.iter().any(|c| c.name == name) {
            return false;
        }
        list.push(Capture { name, kind });
        true
    }

    /// Captures of `key`, empty when nothing was recorded.
    pub fn get(&self, key: &FunctionKey) -> &[Capture] {
        match self.entries.get(key) {
            Some(list) => list.as_slice(),
            None => &[],
        }
    }

    pub fn has_captures(&self, key: &FunctionKey) -> bool {
        !self.get(key).is_empty()
    }
}

#[cfg(test)]
mod tests;

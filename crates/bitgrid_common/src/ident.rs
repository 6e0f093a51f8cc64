//! Interned names for signals, ports and cells.

use lasso::ThreadedRodeo;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

/// A name owned by an [`Interner`].
///
/// Signal, port and cell names are stored as these so the IR stays `Copy`
/// and name comparison is an integer compare.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ident(u32);

impl Ident {
    /// The identifier stored in slot `index` of its interner.
    ///
    /// Used when rebuilding IR fragments by hand, as tests do.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }
}

// SAFETY: `into_usize` and `try_from_usize` are inverse on every value that
// `try_from_usize` accepts, which is what lasso requires of a key.
unsafe impl lasso::Key for Ident {
    fn into_usize(self) -> usize {
        self.0 as usize
    }

    fn try_from_usize(int: usize) -> Option<Self> {
        u32::try_from(int).ok().map(Self)
    }
}

/// Shared name table for one build.
///
/// Also hands out `<prefix>_<n>` names for anonymous barrier wires. Each
/// prefix keeps its own counter, and a candidate that was interned by other
/// means is skipped so fresh names never alias a user name.
pub struct Interner {
    names: ThreadedRodeo<Ident>,
    next_suffix: Mutex<HashMap<String, u32>>,
}

impl Interner {
    /// An empty table.
    pub fn new() -> Self {
        Self {
            names: ThreadedRodeo::new(),
            next_suffix: Mutex::new(HashMap::new()),
        }
    }

    /// The identifier for `name`, adding it on first use.
    pub fn get_or_intern(&self, name: &str) -> Ident {
        self.names.get_or_intern(name)
    }

    /// The text behind `ident`.
    ///
    /// # Panics
    ///
    /// Panics if `ident` came from a different interner.
    pub fn resolve(&self, ident: Ident) -> &str {
        self.names.resolve(&ident)
    }

    /// A new `<prefix>_<n>` name that nothing has used yet.
    pub fn fresh(&self, prefix: &str) -> Ident {
        let mut suffixes = self
            .next_suffix
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let suffix = suffixes.entry(prefix.to_string()).or_default();
        loop {
            let candidate = format!("{prefix}_{suffix}");
            *suffix += 1;
            if !self.names.contains(&candidate) {
                return self.names.get_or_intern(candidate);
            }
        }
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

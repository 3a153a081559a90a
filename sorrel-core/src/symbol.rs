// sorrel-core - Symbol type with interning
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Symbols are identifiers that may be optionally namespaced.
//!
//! Two symbols with the same namespace and name share one interned
//! allocation, so equality and hashing are O(1).

use std::fmt;
use std::hash::Hash;

use crate::intern::{NameHandle, intern, split_qualified};

/// Suffix marking a symbol for gensym substitution inside syntax-quote.
pub const GENSYM_MARKER: char = '#';

/// A symbol with optional namespace.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(NameHandle);

impl Symbol {
    /// Create a new symbol with no namespace.
    pub fn new(name: &str) -> Self {
        Symbol(NameHandle(intern(None, name)))
    }

    /// Create a new symbol with a namespace.
    pub fn qualified(namespace: &str, name: &str) -> Self {
        Symbol(NameHandle(intern(Some(namespace), name)))
    }

    /// Parse a symbol from a string like "foo" or "ns/foo".
    pub fn parse(text: &str) -> Self {
        match split_qualified(text) {
            (Some(ns), name) => Symbol::qualified(ns, name),
            (None, name) => Symbol::new(name),
        }
    }

    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.0.0.namespace()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.0.0.name()
    }

    #[must_use]
    pub fn is_qualified(&self) -> bool {
        self.namespace().is_some()
    }

    /// The same name without a namespace.
    #[must_use]
    pub fn unqualified(&self) -> Symbol {
        if self.is_qualified() {
            Symbol::new(self.name())
        } else {
            self.clone()
        }
    }

    /// Whether this symbol requests gensym substitution (`foo#`).
    #[must_use]
    pub fn is_gensym_request(&self) -> bool {
        !self.is_qualified() && self.name().len() > 1 && self.name().ends_with(GENSYM_MARKER)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.0)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self)
    }
}

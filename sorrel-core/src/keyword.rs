// sorrel-core - Keyword type with interning
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Keywords are self-evaluating interned identifiers written `:name` or
//! `:ns/name`.

use std::fmt;
use std::hash::Hash;

use crate::intern::{NameHandle, intern, split_qualified};

/// A keyword with optional namespace.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Keyword(NameHandle);

impl Keyword {
    pub fn new(name: &str) -> Self {
        Keyword(NameHandle(intern(None, name)))
    }

    pub fn qualified(namespace: &str, name: &str) -> Self {
        Keyword(NameHandle(intern(Some(namespace), name)))
    }

    /// Parse keyword text without the leading colon.
    pub fn parse(text: &str) -> Self {
        match split_qualified(text) {
            (Some(ns), name) => Keyword::qualified(ns, name),
            (None, name) => Keyword::new(name),
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
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.0.0)
    }
}

impl fmt::Debug for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keyword({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_display() {
        assert_eq!(Keyword::new("foo").to_string(), ":foo");
        assert_eq!(Keyword::parse("a/b").to_string(), ":a/b");
    }

    #[test]
    fn test_keyword_equality() {
        assert_eq!(Keyword::new("x"), Keyword::new("x"));
        assert_ne!(Keyword::new("x"), Keyword::qualified("a", "x"));
    }
}

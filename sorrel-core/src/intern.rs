// sorrel-core - Name interning
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Process-unique storage for (namespace, name) pairs.
//!
//! Symbols and keywords are thin handles over an [`InternedName`]. Interning
//! the same text twice returns the same allocation, so identity comparison
//! is a pointer comparison and hashing uses the address.
//!
//! The evaluator is single-threaded, so the table lives in a thread-local
//! rather than behind a lock. Interned names are never freed.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// An interned, optionally namespace-qualified name.
#[derive(Debug)]
pub struct InternedName {
    namespace: Option<Rc<str>>,
    name: Rc<str>,
}

impl InternedName {
    #[inline]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for InternedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{}/{}", ns, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

#[derive(Default)]
struct NameTable {
    names: HashMap<(Option<Rc<str>>, Rc<str>), Rc<InternedName>>,
    strings: HashMap<Rc<str>, ()>,
}

impl NameTable {
    fn string(&mut self, s: &str) -> Rc<str> {
        if let Some((existing, _)) = self.strings.get_key_value(s) {
            return existing.clone();
        }
        let fresh: Rc<str> = Rc::from(s);
        self.strings.insert(fresh.clone(), ());
        fresh
    }

    fn intern(&mut self, namespace: Option<&str>, name: &str) -> Rc<InternedName> {
        let ns = namespace.map(|n| self.string(n));
        let name = self.string(name);
        self.names
            .entry((ns.clone(), name.clone()))
            .or_insert_with(|| {
                Rc::new(InternedName {
                    namespace: ns,
                    name,
                })
            })
            .clone()
    }
}

thread_local! {
    static NAMES: RefCell<NameTable> = RefCell::new(NameTable::default());
}

/// Intern a name, returning the shared allocation for it.
pub(crate) fn intern(namespace: Option<&str>, name: &str) -> Rc<InternedName> {
    NAMES.with(|table| table.borrow_mut().intern(namespace, name))
}

/// Split `ns/name` text into its parts. A lone `/` is an unqualified name.
pub(crate) fn split_qualified(text: &str) -> (Option<&str>, &str) {
    if text == "/" {
        return (None, text);
    }
    match text.find('/') {
        Some(pos) if pos > 0 && pos + 1 < text.len() => (Some(&text[..pos]), &text[pos + 1..]),
        _ => (None, text),
    }
}

/// Identity handle shared by [`crate::Symbol`] and [`crate::Keyword`].
#[derive(Clone)]
pub(crate) struct NameHandle(pub(crate) Rc<InternedName>);

impl PartialEq for NameHandle {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for NameHandle {}

impl Hash for NameHandle {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.0) as *const () as usize).hash(state);
    }
}

impl PartialOrd for NameHandle {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NameHandle {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.0.namespace(), self.0.name()).cmp(&(other.0.namespace(), other.0.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_returns_same_allocation() {
        let a = intern(Some("user"), "x");
        let b = intern(Some("user"), "x");
        assert!(Rc::ptr_eq(&a, &b));
        let c = intern(None, "x");
        assert!(!Rc::ptr_eq(&a, &c));
    }

    #[test]
    fn split_handles_edge_cases() {
        assert_eq!(split_qualified("/"), (None, "/"));
        assert_eq!(split_qualified("a/b"), (Some("a"), "b"));
        assert_eq!(split_qualified("core//"), (Some("core"), "/"));
        assert_eq!(split_qualified("plain"), (None, "plain"));
    }
}

// sorrel-core - Auxiliary runtime objects
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Opaque runtime objects that take part in the value model through a small
//! capability contract: a type name, a description, equality and hashing.

use std::any::Any;
use std::cell::RefCell;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use regex::Regex;

use crate::namespace::Var;

/// Capability contract for auxiliary values.
pub trait Auxiliary: fmt::Debug {
    fn type_name(&self) -> &'static str;

    /// Printed representation.
    fn describe(&self) -> String;

    fn equals(&self, other: &dyn Auxiliary) -> bool;

    fn hash_value(&self) -> u64;

    fn as_any(&self) -> &dyn Any;
}

fn hash_of(value: impl Hash) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

// ============================================================================
// String builder
// ============================================================================

/// A mutable string buffer, compared by identity.
#[derive(Debug, Default)]
pub struct StringBuilder {
    buffer: RefCell<String>,
}

impl StringBuilder {
    pub fn new(initial: &str) -> Self {
        StringBuilder {
            buffer: RefCell::new(initial.to_string()),
        }
    }

    pub fn append(&self, text: &str) {
        self.buffer.borrow_mut().push_str(text);
    }

    pub fn reverse(&self) {
        let reversed: String = self.buffer.borrow().chars().rev().collect();
        *self.buffer.borrow_mut() = reversed;
    }

    #[must_use]
    pub fn contents(&self) -> String {
        self.buffer.borrow().clone()
    }
}

impl Auxiliary for StringBuilder {
    fn type_name(&self) -> &'static str {
        "string-builder"
    }

    fn describe(&self) -> String {
        self.contents()
    }

    fn equals(&self, other: &dyn Auxiliary) -> bool {
        std::ptr::addr_eq(self as *const Self, other.as_any() as *const dyn Any)
    }

    fn hash_value(&self) -> u64 {
        hash_of(self as *const Self as usize)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Compiled pattern
// ============================================================================

/// A compiled regular expression. Two patterns are equal when their source
/// text is equal.
#[derive(Debug)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    pub fn compile(source: &str) -> std::result::Result<Self, regex::Error> {
        Ok(Pattern {
            regex: Regex::new(source)?,
        })
    }

    #[must_use]
    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

impl Auxiliary for Pattern {
    fn type_name(&self) -> &'static str {
        "pattern"
    }

    fn describe(&self) -> String {
        format!("#\"{}\"", self.regex.as_str())
    }

    fn equals(&self, other: &dyn Auxiliary) -> bool {
        other
            .as_any()
            .downcast_ref::<Pattern>()
            .is_some_and(|p| p.regex.as_str() == self.regex.as_str())
    }

    fn hash_value(&self) -> u64 {
        hash_of(self.regex.as_str())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Unbound Var sentinel
// ============================================================================

/// The value read from a Var that has been declared but never bound.
#[derive(Debug)]
pub struct UnboundVar {
    var: Var,
}

impl UnboundVar {
    pub fn new(var: Var) -> Self {
        UnboundVar { var }
    }

    #[must_use]
    pub fn var(&self) -> &Var {
        &self.var
    }
}

impl Auxiliary for UnboundVar {
    fn type_name(&self) -> &'static str {
        "unbound"
    }

    fn describe(&self) -> String {
        format!("#<Unbound Unbound: {}>", self.var)
    }

    fn equals(&self, other: &dyn Auxiliary) -> bool {
        other
            .as_any()
            .downcast_ref::<UnboundVar>()
            .is_some_and(|u| u.var.ptr_eq(&self.var))
    }

    fn hash_value(&self) -> u64 {
        hash_of(self.var.identity())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

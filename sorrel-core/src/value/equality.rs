// sorrel-core - Value equality and hashing
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Equality and hashing for [`Value`].
//!
//! Equality is structural per concrete type. Integers never equal floats.
//! Lists, sequences and vectors compare element-wise across
//! representations, and hash identically when equal. Maps only equal maps.
//! Functions, macros, namespaces and Vars compare by identity. Reader-macro
//! forms never compare equal, not even to themselves.
//!
//! Unrealized lazy sequences are compared by identity here; the `=` builtin
//! realizes its arguments before comparing.

// Value hashes Vars and lazy sequences by identity, not by their mutable
// contents.
#![allow(clippy::mutable_key_type)]

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use super::{Seq, Value};

/// Elements of a sequential value, if all of them are available without
/// forcing a lazy sequence.
fn sequential_items(value: &Value) -> Option<Vec<Value>> {
    match value {
        Value::Vector(items) => Some(items.iter().cloned().collect()),
        Value::Seq(seq) => seq.realized_items(),
        _ => None,
    }
}

fn sequential_eq(a: &Value, b: &Value) -> bool {
    if let (Value::Seq(Seq::Lazy(x)), Value::Seq(Seq::Lazy(y))) = (a, b)
        && x.ptr_eq(y)
    {
        return true;
    }
    match (a, b) {
        (Value::Vector(x), Value::Vector(y)) => x == y,
        (Value::Seq(Seq::List(x)), Value::Vector(y))
        | (Value::Vector(x), Value::Seq(Seq::List(y)))
        | (Value::Seq(Seq::List(x)), Value::Seq(Seq::List(y))) => x == y,
        _ => match (sequential_items(a), sequential_items(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        },
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Keyword(a), Value::Keyword(b)) => a == b,
            (Value::Namespace(a), Value::Namespace(b)) => a.ptr_eq(b),
            (Value::Var(a), Value::Var(b)) => a.ptr_eq(b),
            (Value::Auxiliary(a), Value::Auxiliary(b)) => a.equals(b.as_ref()),
            (Value::Seq(_) | Value::Vector(_), Value::Seq(_) | Value::Vector(_)) => {
                sequential_eq(self, other)
            }
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Macro(a), Value::Macro(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::BuiltIn(a), Value::BuiltIn(b)) => a == b,
            (Value::Special(a), Value::Special(b)) => a == b,
            _ => false,
        }
    }
}

/// `Eq` is required for [`ValueMap`](super::ValueMap) keys, but it is not
/// reflexive for every value: `##NaN` and reader-macro forms are unequal to
/// themselves. Such a key can be inserted into a map yet never looked up,
/// and inserting it twice keeps two entries.
impl Eq for Value {}

/// Tag hashed ahead of every sequential value, so lists and vectors agree.
const SEQUENTIAL_TAG: u8 = 0xA5;

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Seq(_) | Value::Vector(_) => {
                SEQUENTIAL_TAG.hash(state);
                match sequential_items(self) {
                    Some(items) => {
                        items.len().hash(state);
                        for item in &items {
                            item.hash(state);
                        }
                    }
                    // Unrealized lazy sequences only equal themselves.
                    None => {
                        if let Value::Seq(seq) = self {
                            seq.identity().hash(state);
                        }
                    }
                }
                return;
            }
            _ => {}
        }

        std::mem::discriminant(self).hash(state);
        match self {
            Value::Nil => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(n) => n.hash(state),
            Value::Float(f) => {
                // 0.0 and -0.0 are equal, so they must hash alike.
                let normalized = if *f == 0.0 { 0.0f64 } else { *f };
                normalized.to_bits().hash(state);
            }
            Value::Char(c) => c.hash(state),
            Value::String(s) => s.hash(state),
            Value::Symbol(sym) => sym.hash(state),
            Value::Keyword(kw) => kw.hash(state),
            Value::Namespace(ns) => ns.identity().hash(state),
            Value::Var(var) => var.identity().hash(state),
            Value::Auxiliary(aux) => aux.hash_value().hash(state),
            Value::Map(map) => {
                // Order-independent: combine per-entry hashes commutatively.
                let mut combined: u64 = 0;
                for (k, v) in map {
                    let mut entry = DefaultHasher::new();
                    k.hash(&mut entry);
                    v.hash(&mut entry);
                    combined = combined.wrapping_add(entry.finish());
                }
                map.len().hash(state);
                combined.hash(state);
            }
            Value::Macro(m) => (Rc::as_ptr(m) as usize).hash(state),
            Value::Function(f) => (Rc::as_ptr(f) as usize).hash(state),
            Value::BuiltIn(b) => b.hash(state),
            Value::Special(sf) => sf.hash(state),
            Value::ReaderMacro(rm) => (Rc::as_ptr(rm) as usize).hash(state),
            Value::Seq(_) | Value::Vector(_) => unreachable!("sequential values hashed above"),
        }
    }
}

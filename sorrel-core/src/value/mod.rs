// sorrel-core - Value types for Sorrel
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! The runtime value model.
//!
//! [`Value`] is a closed tagged union over every runtime value. Collections
//! are persistent (`im`), so cloning a value is cheap and values are
//! immutable once constructed. Reference-typed members (namespaces, Vars,
//! functions, macros, lazy sequences) share state through `Rc`.

mod auxiliary;
mod display;
mod equality;
mod seq;
mod tokens;

pub use auxiliary::{Auxiliary, Pattern, StringBuilder, UnboundVar};
pub use display::PrintStyle;
pub use seq::{ConsCell, LazySeq, Seq, Step};
pub use tokens::{BuiltIn, ReaderMacro, ReaderMacroForm, SpecialForm};

use std::rc::Rc;

use im::{HashMap, Vector};

use crate::function::{Function, Macro};
use crate::keyword::Keyword;
use crate::namespace::{Namespace, Var};
use crate::symbol::Symbol;

/// Persistent map type used for `{...}` values.
pub type ValueMap = HashMap<Value, Value>;

/// A Sorrel runtime value.
#[derive(Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    /// Fixed-width integer; arithmetic on it is overflow-checked.
    Int(i64),
    Float(f64),
    Char(char),
    String(Rc<str>),
    Symbol(Symbol),
    Keyword(Keyword),
    Namespace(Namespace),
    Var(Var),
    /// Opaque runtime object (string builder, compiled pattern, ...).
    Auxiliary(Rc<dyn Auxiliary>),
    Seq(Seq),
    Vector(Vector<Value>),
    Map(ValueMap),
    Macro(Rc<Macro>),
    Function(Rc<Function>),
    BuiltIn(BuiltIn),
    Special(SpecialForm),
    ReaderMacro(Rc<ReaderMacroForm>),
}

// ============================================================================
// Constructors
// ============================================================================

impl Value {
    #[inline]
    pub fn nil() -> Self {
        Value::Nil
    }

    #[inline]
    pub fn bool(b: bool) -> Self {
        Value::Bool(b)
    }

    #[inline]
    pub fn int(n: i64) -> Self {
        Value::Int(n)
    }

    #[inline]
    pub fn float(f: f64) -> Self {
        Value::Float(f)
    }

    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Value::String(s.into())
    }

    pub fn symbol(name: &str) -> Self {
        Value::Symbol(Symbol::parse(name))
    }

    pub fn keyword(name: &str) -> Self {
        Value::Keyword(Keyword::parse(name))
    }

    /// A fully realized list.
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Seq(Seq::List(items.into_iter().collect()))
    }

    pub fn empty_list() -> Self {
        Value::Seq(Seq::empty())
    }

    pub fn vector(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Vector(items.into_iter().collect())
    }

    pub fn map(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Value::Map(entries.into_iter().collect())
    }

    pub fn auxiliary(aux: impl Auxiliary + 'static) -> Self {
        Value::Auxiliary(Rc::new(aux))
    }

    pub fn reader_macro(kind: ReaderMacro, form: Value) -> Self {
        Value::ReaderMacro(Rc::new(ReaderMacroForm { kind, form }))
    }
}

// ============================================================================
// Inspection
// ============================================================================

impl Value {
    /// Only `nil` and `false` are falsy.
    #[inline]
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    #[inline]
    #[must_use]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Char(_) => "char",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Keyword(_) => "keyword",
            Value::Namespace(_) => "namespace",
            Value::Var(_) => "var",
            Value::Auxiliary(aux) => aux.type_name(),
            Value::Seq(Seq::List(_)) => "list",
            Value::Seq(_) => "seq",
            Value::Vector(_) => "vector",
            Value::Map(_) => "map",
            Value::Macro(_) => "macro",
            Value::Function(_) => "function",
            Value::BuiltIn(_) => "builtin",
            Value::Special(_) => "special-form",
            Value::ReaderMacro(_) => "reader-macro",
        }
    }

    /// The elements of a fully realized list, if this is one.
    #[must_use]
    pub fn as_list(&self) -> Option<&Vector<Value>> {
        match self {
            Value::Seq(Seq::List(items)) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Value::Symbol(sym) => Some(sym),
            _ => None,
        }
    }

    /// Downcast an auxiliary value to a concrete type.
    #[must_use]
    pub fn as_auxiliary<T: 'static>(&self) -> Option<&T> {
        match self {
            Value::Auxiliary(aux) => aux.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Whether `first`/`rest`/`seq` accept this value.
    #[must_use]
    pub fn is_seqable(&self) -> bool {
        matches!(
            self,
            Value::Nil | Value::Seq(_) | Value::Vector(_) | Value::Map(_) | Value::String(_)
        )
    }
}

impl From<Seq> for Value {
    fn from(seq: Seq) -> Self {
        Value::Seq(seq)
    }
}

impl From<Symbol> for Value {
    fn from(sym: Symbol) -> Self {
        Value::Symbol(sym)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

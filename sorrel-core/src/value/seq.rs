// sorrel-core - Sequences and lazy sequences
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Sequence values.
//!
//! A [`Seq`] is either a fully realized list, a cons cell prepending one
//! value to another sequence, or a [`LazySeq`] wrapping a zero-argument
//! thunk. Forcing a lazy sequence runs its thunk at most once; the result
//! is memoized and shared by every clone.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use im::Vector;

use super::Value;
use crate::context::Context;
use crate::error::{EvalError, Result};

/// A sequence value.
#[derive(Debug, Clone)]
pub enum Seq {
    List(Vector<Value>),
    Cons(Rc<ConsCell>),
    Lazy(LazySeq),
}

/// One value prepended to a sequence without realizing it.
#[derive(Debug)]
pub struct ConsCell {
    pub first: Value,
    pub rest: Seq,
}

/// The first element and remainder of a sequence.
#[derive(Debug, Clone)]
pub enum Step {
    Empty,
    Item(Value, Seq),
}

impl Seq {
    #[must_use]
    pub fn empty() -> Self {
        Seq::List(Vector::new())
    }

    pub fn cons(first: Value, rest: Seq) -> Self {
        Seq::Cons(Rc::new(ConsCell { first, rest }))
    }

    /// Convert a seqable value into a sequence without forcing anything.
    pub fn coerce(value: &Value, origin: &'static str) -> Result<Seq> {
        match value {
            Value::Nil => Ok(Seq::empty()),
            Value::Seq(seq) => Ok(seq.clone()),
            Value::Vector(items) => Ok(Seq::List(items.clone())),
            Value::Map(map) => Ok(Seq::List(
                map.iter()
                    .map(|(k, v)| Value::vector([k.clone(), v.clone()]))
                    .collect(),
            )),
            Value::String(s) => Ok(Seq::List(s.chars().map(Value::Char).collect())),
            other => Err(EvalError::type_error(origin, "a seqable collection", other)),
        }
    }

    /// Identity of the underlying allocation, for hashing unrealized
    /// sequences.
    pub(crate) fn identity(&self) -> usize {
        match self {
            Seq::List(items) => items as *const _ as usize,
            Seq::Cons(cell) => Rc::as_ptr(cell) as usize,
            Seq::Lazy(lazy) => Rc::as_ptr(&lazy.state) as *const () as usize,
        }
    }

    /// All elements, if they are available without running a thunk.
    #[must_use]
    pub fn realized_items(&self) -> Option<Vec<Value>> {
        let mut out = Vec::new();
        let mut current = self.clone();
        loop {
            match current {
                Seq::List(items) => {
                    out.extend(items.iter().cloned());
                    return Some(out);
                }
                Seq::Cons(cell) => {
                    out.push(cell.first.clone());
                    current = cell.rest.clone();
                }
                Seq::Lazy(lazy) => current = lazy.cached()?,
            }
        }
    }

    /// Split off the first element, forcing lazy sequences as needed.
    pub fn step(&self, ctx: &Context) -> Result<Step> {
        let mut current = self.clone();
        loop {
            match current {
                Seq::List(items) => {
                    return Ok(match items.front() {
                        None => Step::Empty,
                        Some(first) => Step::Item(first.clone(), Seq::List(items.skip(1))),
                    });
                }
                Seq::Cons(cell) => return Ok(Step::Item(cell.first.clone(), cell.rest.clone())),
                Seq::Lazy(lazy) => current = lazy.force(ctx)?,
            }
        }
    }

    /// Realize every element.
    pub fn to_vec(&self, ctx: &Context) -> Result<Vec<Value>> {
        let mut out = Vec::new();
        let mut current = self.clone();
        loop {
            match current.step(ctx)? {
                Step::Empty => return Ok(out),
                Step::Item(first, rest) => {
                    out.push(first);
                    // Fast path once the remainder is a plain list.
                    if let Seq::List(items) = &rest {
                        out.extend(items.iter().cloned());
                        return Ok(out);
                    }
                    current = rest;
                }
            }
        }
    }

    /// Realize every element into a plain list.
    pub fn realize(&self, ctx: &Context) -> Result<Seq> {
        match self {
            Seq::List(_) => Ok(self.clone()),
            _ => Ok(Seq::List(self.to_vec(ctx)?.into_iter().collect())),
        }
    }

    pub fn is_empty(&self, ctx: &Context) -> Result<bool> {
        Ok(matches!(self.step(ctx)?, Step::Empty))
    }
}

// ============================================================================
// Lazy sequences
// ============================================================================

enum LazyState {
    Pending(Value),
    Forcing,
    Realized(Seq),
}

/// A sequence produced on demand by a zero-argument thunk.
#[derive(Clone)]
pub struct LazySeq {
    state: Rc<RefCell<LazyState>>,
}

impl LazySeq {
    /// Wrap a callable thunk.
    pub fn new(thunk: Value) -> Self {
        LazySeq {
            state: Rc::new(RefCell::new(LazyState::Pending(thunk))),
        }
    }

    #[must_use]
    pub fn is_realized(&self) -> bool {
        matches!(*self.state.borrow(), LazyState::Realized(_))
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &LazySeq) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    /// The memoized sequence, if the thunk has already run.
    #[must_use]
    pub fn cached(&self) -> Option<Seq> {
        match &*self.state.borrow() {
            LazyState::Realized(seq) => Some(seq.clone()),
            _ => None,
        }
    }

    /// Run the thunk if it has not run yet and return the memoized result.
    ///
    /// If the thunk fails, the sequence stays pending and the error is
    /// returned.
    pub fn force(&self, ctx: &Context) -> Result<Seq> {
        let previous = std::mem::replace(&mut *self.state.borrow_mut(), LazyState::Forcing);
        let thunk = match previous {
            LazyState::Pending(thunk) => thunk,
            LazyState::Realized(seq) => {
                *self.state.borrow_mut() = LazyState::Realized(seq.clone());
                return Ok(seq);
            }
            LazyState::Forcing => {
                return Err(EvalError::runtime(
                    "lazy sequence was realized while it was being realized",
                ));
            }
        };

        tracing::trace!("forcing lazy sequence");
        let produced = crate::eval::apply(&thunk, Vec::new(), ctx)
            .into_value("lazy-seq")
            .and_then(|value| Seq::coerce(&value, "lazy-seq"));

        match produced {
            Ok(seq) => {
                // A thunk returning another lazy sequence is flattened.
                let seq = match seq {
                    Seq::Lazy(inner) => match inner.force(ctx) {
                        Ok(seq) => seq,
                        Err(err) => {
                            *self.state.borrow_mut() = LazyState::Pending(thunk);
                            return Err(err);
                        }
                    },
                    other => other,
                };
                *self.state.borrow_mut() = LazyState::Realized(seq.clone());
                Ok(seq)
            }
            Err(err) => {
                *self.state.borrow_mut() = LazyState::Pending(thunk);
                Err(err)
            }
        }
    }
}

impl fmt::Debug for LazySeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_realized() {
            write!(f, "LazySeq(realized)")
        } else {
            write!(f, "LazySeq(pending)")
        }
    }
}

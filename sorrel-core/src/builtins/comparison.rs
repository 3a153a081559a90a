// sorrel-core - Comparison and predicate built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Comparison: =, ==, <, <=, >, >=, not, identical?, the type predicates
//! and the numeric sign and class predicates.

use std::cmp::Ordering;
use std::rc::Rc;

use crate::context::Context;
use crate::error::{EvalError, Result};
use crate::value::{BuiltIn, Seq, Value};

use super::arithmetic::Num;
use super::{at_least, exact};

/// Realize every lazy sequence reachable from `value`, so structural
/// equality sees their elements.
fn realize_deep(value: &Value, ctx: &Context) -> Result<Value> {
    match value {
        Value::Seq(seq) => {
            let items = seq.to_vec(ctx)?;
            let items = items
                .iter()
                .map(|item| realize_deep(item, ctx))
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::list(items))
        }
        Value::Vector(items) => Ok(Value::vector(
            items
                .iter()
                .map(|item| realize_deep(item, ctx))
                .collect::<Result<Vec<_>>>()?,
        )),
        Value::Map(map) => {
            let mut entries = Vec::with_capacity(map.len());
            for (k, v) in map {
                entries.push((realize_deep(k, ctx)?, realize_deep(v, ctx)?));
            }
            Ok(Value::map(entries))
        }
        other => Ok(other.clone()),
    }
}

/// `(= x y ...)`: structural equality. Integers never equal floats.
pub(crate) fn builtin_equals(args: &[Value], ctx: &Context) -> Result<Value> {
    at_least("=", args, 1)?;
    let first = realize_deep(&args[0], ctx)?;
    for other in &args[1..] {
        if first != realize_deep(other, ctx)? {
            return Ok(Value::Bool(false));
        }
    }
    Ok(Value::Bool(true))
}

fn compare_nums(a: Num, b: Num) -> Option<Ordering> {
    match (a, b) {
        (Num::Int(a), Num::Int(b)) => Some(a.cmp(&b)),
        (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
    }
}

/// Check that every adjacent pair of numbers satisfies `accept`.
fn chain(
    origin: &'static str,
    args: &[Value],
    accept: impl Fn(Ordering) -> bool,
) -> Result<Value> {
    at_least(origin, args, 1)?;
    let nums = args
        .iter()
        .map(|arg| Num::from_value(origin, arg))
        .collect::<Result<Vec<_>>>()?;
    let holds = nums
        .windows(2)
        .all(|pair| compare_nums(pair[0], pair[1]).is_some_and(&accept));
    Ok(Value::Bool(holds))
}

/// `(== x y ...)`: numeric equality across integers and floats.
pub(crate) fn builtin_num_equals(args: &[Value]) -> Result<Value> {
    chain("==", args, |o| o == Ordering::Equal)
}

pub(crate) fn builtin_lt(args: &[Value]) -> Result<Value> {
    chain("<", args, |o| o == Ordering::Less)
}

pub(crate) fn builtin_le(args: &[Value]) -> Result<Value> {
    chain("<=", args, |o| o != Ordering::Greater)
}

pub(crate) fn builtin_gt(args: &[Value]) -> Result<Value> {
    chain(">", args, |o| o == Ordering::Greater)
}

pub(crate) fn builtin_ge(args: &[Value]) -> Result<Value> {
    chain(">=", args, |o| o != Ordering::Less)
}

pub(crate) fn builtin_not(args: &[Value]) -> Result<Value> {
    let [x] = exact::<1>("not", args)?;
    Ok(Value::Bool(!x.is_truthy()))
}

/// `(identical? a b)`: reference types compare by identity, everything
/// else by value.
pub(crate) fn builtin_identical(args: &[Value]) -> Result<Value> {
    let [a, b] = exact::<2>("identical?", args)?;
    let same = match (a, b) {
        (Value::Function(x), Value::Function(y)) => Rc::ptr_eq(x, y),
        (Value::Macro(x), Value::Macro(y)) => Rc::ptr_eq(x, y),
        (Value::Auxiliary(x), Value::Auxiliary(y)) => Rc::ptr_eq(x, y),
        (Value::String(x), Value::String(y)) => Rc::ptr_eq(x, y),
        (Value::Seq(Seq::Lazy(x)), Value::Seq(Seq::Lazy(y))) => x.ptr_eq(y),
        (Value::Seq(Seq::Cons(x)), Value::Seq(Seq::Cons(y))) => Rc::ptr_eq(x, y),
        (Value::Seq(_) | Value::Vector(_) | Value::Map(_), _) => false,
        (x, y) => x == y,
    };
    Ok(Value::Bool(same))
}

/// The one-argument type predicates.
pub(crate) fn builtin_predicate(builtin: BuiltIn, args: &[Value]) -> Result<Value> {
    let [x] = exact::<1>(builtin.name(), args)?;
    let result = match builtin {
        BuiltIn::NilP => x.is_nil(),
        BuiltIn::NumberP => matches!(x, Value::Int(_) | Value::Float(_)),
        BuiltIn::IntP => matches!(x, Value::Int(_)),
        BuiltIn::FloatP => matches!(x, Value::Float(_)),
        BuiltIn::StringP => matches!(x, Value::String(_)),
        BuiltIn::SymbolP => matches!(x, Value::Symbol(_)),
        BuiltIn::KeywordP => matches!(x, Value::Keyword(_)),
        BuiltIn::FnP => matches!(x, Value::Function(_) | Value::BuiltIn(_)),
        BuiltIn::SeqP => matches!(x, Value::Seq(_)),
        BuiltIn::VectorP => matches!(x, Value::Vector(_)),
        BuiltIn::MapP => matches!(x, Value::Map(_)),
        BuiltIn::CharP => matches!(x, Value::Char(_)),
        BuiltIn::VarP => matches!(x, Value::Var(_)),
        BuiltIn::TrueP => matches!(x, Value::Bool(true)),
        BuiltIn::FalseP => matches!(x, Value::Bool(false)),
        other => {
            return Err(EvalError::invalid_argument(
                other.name(),
                "not a type predicate",
            ));
        }
    };
    Ok(Value::Bool(result))
}

/// `pos?`, `neg?`, `zero?`, `nan?` and `infinite?`. Non-numbers are an
/// error; NaN is neither positive, negative nor zero.
pub(crate) fn builtin_numeric_predicate(builtin: BuiltIn, args: &[Value]) -> Result<Value> {
    let [x] = exact::<1>(builtin.name(), args)?;
    let n = Num::from_value(builtin.name(), x)?;
    let result = match (builtin, n) {
        (BuiltIn::PosP, Num::Int(i)) => i > 0,
        (BuiltIn::NegP, Num::Int(i)) => i < 0,
        (BuiltIn::ZeroP, Num::Int(i)) => i == 0,
        (BuiltIn::NanP | BuiltIn::InfiniteP, Num::Int(_)) => false,
        (BuiltIn::PosP, Num::Float(f)) => f > 0.0,
        (BuiltIn::NegP, Num::Float(f)) => f < 0.0,
        (BuiltIn::ZeroP, Num::Float(f)) => f == 0.0,
        (BuiltIn::NanP, Num::Float(f)) => f.is_nan(),
        (BuiltIn::InfiniteP, Num::Float(f)) => f.is_infinite(),
        (other, _) => {
            return Err(EvalError::invalid_argument(
                other.name(),
                "not a numeric predicate",
            ));
        }
    };
    Ok(Value::Bool(result))
}

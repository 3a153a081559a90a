// sorrel-core - Arithmetic built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Arithmetic operations: +, -, *, /, rem, quot, inc, dec, and the int
//! and double conversions
//!
//! ## Integer Overflow Behaviour
//!
//! Integer arithmetic is checked and fails with an overflow error instead
//! of wrapping or promoting. Once either operand is a float the operation
//! is carried out in floating point and follows IEEE semantics, including
//! division by zero.
//!
//! `/` on two integers yields an integer when the division is exact and a
//! float otherwise; an integer zero divisor is an error.

use crate::error::{EvalError, Result};
use crate::value::Value;

use super::{at_least, exact};

/// A numeric argument.
#[derive(Debug, Clone, Copy)]
pub(super) enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    pub(super) fn from_value(origin: &'static str, value: &Value) -> Result<Num> {
        match value {
            Value::Int(n) => Ok(Num::Int(*n)),
            Value::Float(n) => Ok(Num::Float(*n)),
            other => Err(EvalError::type_error(origin, "a number", other)),
        }
    }

    pub(super) fn as_f64(self) -> f64 {
        match self {
            Num::Int(n) => n as f64,
            Num::Float(n) => n,
        }
    }

    fn into_value(self) -> Value {
        match self {
            Num::Int(n) => Value::Int(n),
            Num::Float(n) => Value::Float(n),
        }
    }
}

/// Fold the arguments with `int_op` while every value is an integer, and
/// with `float_op` as soon as one is a float.
fn fold(
    origin: &'static str,
    init: Num,
    args: &[Value],
    int_op: impl Fn(i64, i64) -> Result<Num>,
    float_op: impl Fn(f64, f64) -> f64,
) -> Result<Value> {
    let mut acc = init;
    for arg in args {
        let rhs = Num::from_value(origin, arg)?;
        acc = match (acc, rhs) {
            (Num::Int(a), Num::Int(b)) => int_op(a, b)?,
            (a, b) => Num::Float(float_op(a.as_f64(), b.as_f64())),
        };
    }
    Ok(acc.into_value())
}

fn checked(origin: &'static str, result: Option<i64>) -> Result<Num> {
    result.map(Num::Int).ok_or_else(|| EvalError::overflow(origin))
}

pub(crate) fn builtin_add(args: &[Value]) -> Result<Value> {
    fold(
        "+",
        Num::Int(0),
        args,
        |a, b| checked("+", a.checked_add(b)),
        |a, b| a + b,
    )
}

pub(crate) fn builtin_mul(args: &[Value]) -> Result<Value> {
    fold(
        "*",
        Num::Int(1),
        args,
        |a, b| checked("*", a.checked_mul(b)),
        |a, b| a * b,
    )
}

/// `(- x)` negates; `(- x y ...)` subtracts the rest from `x`.
pub(crate) fn builtin_sub(args: &[Value]) -> Result<Value> {
    at_least("-", args, 1)?;
    let first = Num::from_value("-", &args[0])?;
    if args.len() == 1 {
        return match first {
            Num::Int(n) => checked("-", n.checked_neg()).map(Num::into_value),
            Num::Float(n) => Ok(Value::Float(-n)),
        };
    }
    fold(
        "-",
        first,
        &args[1..],
        |a, b| checked("-", a.checked_sub(b)),
        |a, b| a - b,
    )
}

fn divide_ints(a: i64, b: i64) -> Result<Num> {
    if b == 0 {
        return Err(EvalError::divide_by_zero("/"));
    }
    // i64::MIN / -1 has no integer remainder either.
    match a.checked_rem(b) {
        Some(0) => checked("/", a.checked_div(b)),
        Some(_) => Ok(Num::Float(a as f64 / b as f64)),
        None => Err(EvalError::overflow("/")),
    }
}

/// `(/ x)` is the reciprocal; `(/ x y ...)` divides `x` by the rest.
pub(crate) fn builtin_div(args: &[Value]) -> Result<Value> {
    at_least("/", args, 1)?;
    let first = Num::from_value("/", &args[0])?;
    if args.len() == 1 {
        return fold("/", Num::Int(1), args, divide_ints, |a, b| a / b);
    }
    fold("/", first, &args[1..], divide_ints, |a, b| a / b)
}

/// Shared shape of `rem` and `quot`: two numbers, integer zero divisor is
/// an error.
fn integer_division(
    origin: &'static str,
    args: &[Value],
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value> {
    let [a, b] = exact::<2>(origin, args)?;
    match (Num::from_value(origin, a)?, Num::from_value(origin, b)?) {
        (Num::Int(_), Num::Int(0)) => Err(EvalError::divide_by_zero(origin)),
        (Num::Int(a), Num::Int(b)) => checked(origin, int_op(a, b)).map(Num::into_value),
        (a, b) => Ok(Value::Float(float_op(a.as_f64(), b.as_f64()))),
    }
}

/// Remainder of truncated division; the sign follows the dividend.
pub(crate) fn builtin_rem(args: &[Value]) -> Result<Value> {
    integer_division("rem", args, i64::checked_rem, |a, b| a % b)
}

/// Quotient of truncated division.
pub(crate) fn builtin_quot(args: &[Value]) -> Result<Value> {
    integer_division("quot", args, i64::checked_div, |a, b| (a / b).trunc())
}

pub(crate) fn builtin_inc(args: &[Value]) -> Result<Value> {
    let [x] = exact::<1>("inc", args)?;
    match Num::from_value("inc", x)? {
        Num::Int(n) => checked("inc", n.checked_add(1)).map(Num::into_value),
        Num::Float(n) => Ok(Value::Float(n + 1.0)),
    }
}

pub(crate) fn builtin_dec(args: &[Value]) -> Result<Value> {
    let [x] = exact::<1>("dec", args)?;
    match Num::from_value("dec", x)? {
        Num::Int(n) => checked("dec", n.checked_sub(1)).map(Num::into_value),
        Num::Float(n) => Ok(Value::Float(n - 1.0)),
    }
}

/// `(int x)`: integers pass through, floats truncate toward zero and
/// characters yield their code point. A float outside the integer range,
/// or NaN, is an overflow.
pub(crate) fn builtin_int(args: &[Value]) -> Result<Value> {
    let [x] = exact::<1>("int", args)?;
    match x {
        Value::Int(n) => Ok(Value::Int(*n)),
        Value::Char(c) => Ok(Value::Int(i64::from(u32::from(*c)))),
        Value::Float(f) => {
            // -2^63 and 2^63 are exact as f64; the range is half-open.
            const LOWER: f64 = i64::MIN as f64;
            let truncated = f.trunc();
            if truncated.is_nan() || truncated < LOWER || truncated >= -LOWER {
                return Err(EvalError::overflow("int"));
            }
            Ok(Value::Int(truncated as i64))
        }
        other => Err(EvalError::type_error("int", "a number or character", other)),
    }
}

pub(crate) fn builtin_double(args: &[Value]) -> Result<Value> {
    let [x] = exact::<1>("double", args)?;
    Ok(Value::Float(Num::from_value("double", x)?.as_f64()))
}

// sorrel-core - Sequence built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Sequence operations: cons, first, rest, next, seq, concat, empty?,
//! lazy-seq, realized?, reduce
//!
//! `first`, `rest`, `next`, `seq` and `empty?` force a lazy sequence's
//! thunk the first time they look at it; every later access reuses the
//! memoized result.

use crate::context::Context;
use crate::error::{EvalError, Result};
use crate::value::{LazySeq, Seq, Step, Value};

use super::{between, exact};

fn step_of(origin: &'static str, coll: &Value, ctx: &Context) -> Result<Step> {
    Seq::coerce(coll, origin)?.step(ctx)
}

/// `(cons x coll)` prepends without realizing `coll`.
pub(crate) fn builtin_cons(args: &[Value]) -> Result<Value> {
    let [x, coll] = exact::<2>("cons", args)?;
    let seq = match Seq::coerce(coll, "cons")? {
        Seq::List(mut items) => {
            items.push_front(x.clone());
            Seq::List(items)
        }
        other => Seq::cons(x.clone(), other),
    };
    Ok(Value::Seq(seq))
}

pub(crate) fn builtin_first(args: &[Value], ctx: &Context) -> Result<Value> {
    let [coll] = exact::<1>("first", args)?;
    Ok(match step_of("first", coll, ctx)? {
        Step::Empty => Value::Nil,
        Step::Item(first, _) => first,
    })
}

/// `(rest coll)`: everything after the first element; never nil.
pub(crate) fn builtin_rest(args: &[Value], ctx: &Context) -> Result<Value> {
    let [coll] = exact::<1>("rest", args)?;
    Ok(match step_of("rest", coll, ctx)? {
        Step::Empty => Value::empty_list(),
        Step::Item(_, rest) => Value::Seq(rest),
    })
}

/// `(next coll)`: like `rest`, but nil when nothing remains.
pub(crate) fn builtin_next(args: &[Value], ctx: &Context) -> Result<Value> {
    let [coll] = exact::<1>("next", args)?;
    match step_of("next", coll, ctx)? {
        Step::Empty => Ok(Value::Nil),
        Step::Item(_, rest) => {
            if rest.is_empty(ctx)? {
                Ok(Value::Nil)
            } else {
                Ok(Value::Seq(rest))
            }
        }
    }
}

/// `(seq coll)`: a sequence over `coll`, or nil when it is empty.
pub(crate) fn builtin_seq(args: &[Value], ctx: &Context) -> Result<Value> {
    let [coll] = exact::<1>("seq", args)?;
    let seq = Seq::coerce(coll, "seq")?;
    if seq.is_empty(ctx)? {
        Ok(Value::Nil)
    } else {
        Ok(Value::Seq(seq))
    }
}

/// `(concat coll ...)` realizes its arguments into one list.
pub(crate) fn builtin_concat(args: &[Value], ctx: &Context) -> Result<Value> {
    let mut out = im::Vector::new();
    for coll in args {
        out.extend(Seq::coerce(coll, "concat")?.to_vec(ctx)?);
    }
    Ok(Value::Seq(Seq::List(out)))
}

pub(crate) fn builtin_empty_p(args: &[Value], ctx: &Context) -> Result<Value> {
    let [coll] = exact::<1>("empty?", args)?;
    Ok(Value::Bool(Seq::coerce(coll, "empty?")?.is_empty(ctx)?))
}

/// `(lazy-seq f)` wraps a function of no arguments; `f` runs at most once,
/// when the sequence is first inspected.
pub(crate) fn builtin_lazy_seq(args: &[Value]) -> Result<Value> {
    let [thunk] = exact::<1>("lazy-seq", args)?;
    let callable = match thunk {
        Value::Function(func) => func.arities().select(0).is_some(),
        Value::BuiltIn(_) => true,
        _ => false,
    };
    if !callable {
        return Err(EvalError::invalid_argument(
            "lazy-seq",
            "argument must be a function taking no arguments",
        ));
    }
    Ok(Value::Seq(Seq::Lazy(LazySeq::new(thunk.clone()))))
}

/// `(reduce f coll)` / `(reduce f init coll)`: fold `coll` with `f`.
///
/// Without `init` the first element seeds the fold, and an empty `coll`
/// yields `(f)`. Lazy sequences are forced one step at a time.
pub(crate) fn builtin_reduce(args: &[Value], ctx: &Context) -> Result<Value> {
    between("reduce", args, 2, 3)?;
    let (f, init, coll) = match args {
        [f, coll] => (f, None, coll),
        [f, init, coll] => (f, Some(init.clone()), coll),
        _ => return Err(EvalError::arity("reduce", "2 or 3", args.len())),
    };
    let call = |args: Vec<Value>| crate::eval::apply(f, args, ctx).into_value("reduce");

    let mut rest = Seq::coerce(coll, "reduce")?;
    let mut acc = match init {
        Some(init) => init,
        None => match rest.step(ctx)? {
            Step::Empty => return call(Vec::new()),
            Step::Item(first, tail) => {
                rest = tail;
                first
            }
        },
    };
    while let Step::Item(item, tail) = rest.step(ctx)? {
        acc = call(vec![acc, item])?;
        rest = tail;
    }
    Ok(acc)
}

pub(crate) fn builtin_realized_p(args: &[Value]) -> Result<Value> {
    let [x] = exact::<1>("realized?", args)?;
    match x {
        Value::Seq(Seq::Lazy(lazy)) => Ok(Value::Bool(lazy.is_realized())),
        Value::Seq(_) => Ok(Value::Bool(true)),
        other => Err(EvalError::type_error("realized?", "a sequence", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InterpreterConfig;
    use crate::error::ErrorKind;
    use crate::runtime::Runtime;
    use crate::value::BuiltIn;

    fn ctx() -> Context {
        Runtime::new(InterpreterConfig::default())
            .unwrap()
            .root_context()
    }

    fn lazy_empty() -> Value {
        builtin_lazy_seq(&[Value::BuiltIn(BuiltIn::List)]).unwrap()
    }

    #[test]
    fn test_first_rest_next_on_nil_and_empty() {
        let ctx = ctx();
        assert_eq!(builtin_first(&[Value::Nil], &ctx).unwrap(), Value::Nil);
        assert_eq!(
            builtin_rest(&[Value::Nil], &ctx).unwrap(),
            Value::empty_list()
        );
        assert_eq!(
            builtin_next(&[Value::list([Value::Int(1)])], &ctx).unwrap(),
            Value::Nil
        );
        assert_eq!(builtin_seq(&[Value::vector([])], &ctx).unwrap(), Value::Nil);
    }

    #[test]
    fn test_cons_onto_lazy_keeps_it_pending() {
        let ctx = ctx();
        let lazy = lazy_empty();
        let consed = builtin_cons(&[Value::Int(1), lazy.clone()]).unwrap();
        if let Value::Seq(Seq::Lazy(l)) = &lazy {
            assert!(!l.is_realized());
        }
        assert_eq!(builtin_first(&[consed.clone()], &ctx).unwrap(), Value::Int(1));
        assert_eq!(builtin_next(&[consed], &ctx).unwrap(), Value::Nil);
        assert_eq!(builtin_realized_p(&[lazy]).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_concat() {
        let ctx = ctx();
        let result = builtin_concat(
            &[
                Value::list([Value::Int(1)]),
                Value::Nil,
                Value::vector([Value::Int(2), Value::Int(3)]),
            ],
            &ctx,
        )
        .unwrap();
        assert_eq!(result.to_string(), "(1 2 3)");
        assert_eq!(builtin_concat(&[], &ctx).unwrap(), Value::empty_list());
    }

    #[test]
    fn test_lazy_seq_requires_thunk() {
        let err = builtin_lazy_seq(&[Value::Int(1)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        let err = builtin_realized_p(&[Value::Int(1)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_reduce() {
        let ctx = ctx();
        let add = Value::BuiltIn(BuiltIn::Add);
        let items = Value::vector([Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert_eq!(
            builtin_reduce(&[add.clone(), items.clone()], &ctx).unwrap(),
            Value::Int(6)
        );
        assert_eq!(
            builtin_reduce(&[add.clone(), Value::Int(10), items], &ctx).unwrap(),
            Value::Int(16)
        );
        assert_eq!(
            builtin_reduce(&[add.clone(), Value::Nil], &ctx).unwrap(),
            Value::Int(0)
        );
        assert_eq!(
            builtin_reduce(&[add.clone(), Value::Int(5), lazy_empty()], &ctx).unwrap(),
            Value::Int(5)
        );
        let err = builtin_reduce(&[add.clone(), Value::list([Value::Int(1), Value::Nil])], &ctx)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        let err = builtin_reduce(&[add, Value::Int(1)], &ctx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}

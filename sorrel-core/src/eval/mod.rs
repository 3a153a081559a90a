// sorrel-core - Evaluator
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! The evaluator.
//!
//! [`eval`] walks an expanded form. Symbols resolve through the context
//! chain; vectors and maps evaluate element-wise; lists dispatch on their
//! head:
//!
//! 1. a special-form token gets its raw argument forms;
//! 2. a builtin token gets its arguments evaluated left to right;
//! 3. a head resolving to a macro expands the raw arguments, then the
//!    expansion is evaluated in place;
//! 4. anything else is evaluated and [`apply`]d to the evaluated arguments.
//!
//! Every other value evaluates to itself.

pub(crate) mod fn_forms;
pub(crate) mod special_forms;
pub(crate) mod trampoline;

use std::rc::Rc;

use crate::builtins;
use crate::context::{Binding, Context, ContextMode};
use crate::error::{EvalError, EvalResult, ReadError, Result, try_eval};
use crate::expand::expand;
use crate::function::{Function, Macro};
use crate::stack::ensure_sufficient_stack;
use crate::symbol::Symbol;
use crate::value::{Seq, Value, ValueMap};

/// Evaluate a form that has already been through reader expansion.
///
/// Each call counts one level against `max_eval_depth`; the native stack
/// grows as needed so that limit, not a stack overflow, ends runaway
/// recursion.
pub fn eval(form: &Value, ctx: &Context) -> EvalResult {
    ensure_sufficient_stack(|| eval_guarded(form, ctx))
}

fn eval_guarded(form: &Value, ctx: &Context) -> EvalResult {
    let _guard = try_eval!(ctx.runtime().enter());

    match form {
        Value::Symbol(sym) => eval_symbol(sym, ctx, false),
        Value::Seq(seq) => eval_seq(form, seq, ctx),
        Value::Vector(items) => {
            let items = try_eval!(eval_args(items.iter(), ctx));
            EvalResult::Success(Value::Vector(items.into_iter().collect()))
        }
        Value::Map(map) => eval_map(map, ctx).into(),
        Value::Macro(m) => EvalError::EvaluatingMacro {
            name: m.name().to_string(),
        }
        .into(),
        Value::Special(sf) => EvalError::EvaluatingSpecialForm {
            name: sf.name().to_string(),
        }
        .into(),
        Value::ReaderMacro(rm) => {
            EvalError::from(ReadError::UnmatchedReaderMacro(rm.kind.prefix())).into()
        }
        _ => EvalResult::Success(form.clone()),
    }
}

/// Expand reader macros in a raw form, evaluate it, and reject a stray
/// recur-signal. This is the entry point for top-level forms and `eval`.
#[tracing::instrument(level = "trace", skip_all)]
pub fn eval_form(form: &Value, ctx: &Context) -> Result<Value> {
    let expanded = expand(form, ctx)?;
    eval(&expanded, ctx).into_value("eval")
}

/// Resolve a symbol.
///
/// A macro is only valid as the head of a list (`as_head`). A macro
/// parameter read in normal mode evaluates its argument form.
fn eval_symbol(sym: &Symbol, ctx: &Context, as_head: bool) -> EvalResult {
    match ctx.lookup(sym) {
        None => EvalError::invalid_symbol(sym).into(),
        Some(Binding::Literal(value) | Binding::FunctionParam(value)) => {
            EvalResult::Success(value)
        }
        Some(Binding::MacroParam(form)) => match ctx.mode() {
            ContextMode::Macro => EvalResult::Success(form),
            ContextMode::Normal => eval(&form, ctx),
        },
        Some(Binding::BoundMacro(m)) => {
            if as_head {
                EvalResult::Success(Value::Macro(m))
            } else {
                EvalError::EvaluatingMacro {
                    name: m.name().to_string(),
                }
                .into()
            }
        }
        Some(Binding::Unbound(var)) => EvalResult::Success(var.value()),
    }
}

fn eval_seq(form: &Value, seq: &Seq, ctx: &Context) -> EvalResult {
    // Code built at runtime (cons cells, lazy seqs) is realized first.
    let items = try_eval!(seq.to_vec(ctx));
    let Some((head, args)) = items.split_first() else {
        return EvalResult::Success(form.clone());
    };

    match head {
        Value::Special(sf) => special_forms::dispatch(*sf, args, ctx),
        Value::BuiltIn(b) => {
            let args = try_eval!(eval_args(args.iter(), ctx));
            builtins::call(*b, args, ctx)
        }
        _ => {
            let callee = match head {
                Value::Symbol(sym) => eval_symbol(sym, ctx, true),
                other => eval(other, ctx),
            };
            let callee = match callee {
                EvalResult::Success(value) => value,
                EvalResult::Recur(_) => {
                    return EvalError::recur_misuse(
                        "call",
                        "recur cannot be used as a function",
                    )
                    .into();
                }
                failure @ EvalResult::Failure(_) => return failure,
            };
            if let Value::Macro(m) = &callee {
                let expansion = try_eval!(Macro::expand(m, args.to_vec()));
                return eval(&expansion, ctx);
            }
            let args = try_eval!(eval_args(args.iter(), ctx));
            apply(&callee, args, ctx)
        }
    }
}

/// Evaluate argument forms left to right. A recur-signal in argument
/// position is misuse.
pub(crate) fn eval_args<'a>(
    forms: impl IntoIterator<Item = &'a Value>,
    ctx: &Context,
) -> Result<Vec<Value>> {
    forms
        .into_iter()
        .map(|form| eval(form, ctx).into_value("argument"))
        .collect()
}

fn eval_map(map: &ValueMap, ctx: &Context) -> Result<Value> {
    let mut out = ValueMap::new();
    for (k, v) in map {
        let k = eval(k, ctx).into_value("map")?;
        let v = eval(v, ctx).into_value("map")?;
        out.insert(k, v);
    }
    Ok(Value::Map(out))
}

/// Call `callee` with already-evaluated arguments.
///
/// Besides builtins and functions, vectors index with one argument, and
/// maps, keywords and symbols look up with one argument plus an optional
/// fallback.
pub fn apply(callee: &Value, args: Vec<Value>, ctx: &Context) -> EvalResult {
    match callee {
        Value::BuiltIn(b) => builtins::call(*b, args, ctx),
        Value::Function(func) => Function::call(func, args),
        Value::Vector(items) => {
            if args.len() != 1 {
                return EvalError::arity("vector", "1", args.len()).into();
            }
            let index = match &args[0] {
                Value::Int(n) => *n,
                other => return EvalError::type_error("vector", "an integer index", other).into(),
            };
            usize::try_from(index)
                .ok()
                .and_then(|i| items.get(i).cloned())
                .ok_or_else(|| EvalError::out_of_bounds("vector", index))
                .into()
        }
        Value::Map(map) => {
            let (key, fallback) = try_eval!(lookup_args("map", &args));
            EvalResult::Success(map.get(key).cloned().unwrap_or(fallback))
        }
        Value::Keyword(_) | Value::Symbol(_) => {
            let origin = if matches!(callee, Value::Keyword(_)) {
                "keyword"
            } else {
                "symbol"
            };
            let (coll, fallback) = try_eval!(lookup_args(origin, &args));
            builtins::get(coll, callee, fallback).into()
        }
        Value::Macro(m) => EvalError::EvaluatingMacro {
            name: m.name().to_string(),
        }
        .into(),
        Value::Special(sf) => EvalError::EvaluatingSpecialForm {
            name: sf.name().to_string(),
        }
        .into(),
        other => EvalError::not_evalable(other).into(),
    }
}

/// Split `[x]` or `[x fallback]`.
fn lookup_args<'a>(origin: &'static str, args: &'a [Value]) -> Result<(&'a Value, Value)> {
    match args {
        [x] => Ok((x, Value::Nil)),
        [x, fallback] => Ok((x, fallback.clone())),
        _ => Err(EvalError::arity(origin, "1 or 2", args.len())),
    }
}

/// Wrap a function value for storage in a [`Value`].
pub(crate) fn function_value(func: Function) -> Value {
    Value::Function(Rc::new(func))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InterpreterConfig;
    use crate::error::ErrorKind;
    use crate::runtime::Runtime;
    use crate::value::{BuiltIn, SpecialForm};

    fn ctx() -> Context {
        Runtime::new(InterpreterConfig::default())
            .unwrap()
            .root_context()
    }

    fn call(head: Value, args: impl IntoIterator<Item = Value>) -> Value {
        Value::list(std::iter::once(head).chain(args))
    }

    #[test]
    fn test_self_evaluating() {
        let ctx = ctx();
        for v in [Value::Nil, Value::Int(3), Value::string("s"), Value::keyword("k")] {
            assert_eq!(eval(&v, &ctx).into_value("test").unwrap(), v);
        }
        let empty = Value::empty_list();
        assert_eq!(eval(&empty, &ctx).into_value("test").unwrap(), empty);
    }

    #[test]
    fn test_builtin_head() {
        let ctx = ctx();
        let form = call(Value::BuiltIn(BuiltIn::Add), [Value::Int(1), Value::Int(2)]);
        assert_eq!(eval(&form, &ctx).into_value("test").unwrap(), Value::Int(3));
    }

    #[test]
    fn test_special_form_as_value() {
        let ctx = ctx();
        let err = eval(&Value::Special(SpecialForm::If), &ctx)
            .into_value("test")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EvaluatingSpecialForm);
    }

    #[test]
    fn test_unknown_symbol() {
        let ctx = ctx();
        let err = eval(&Value::symbol("missing"), &ctx)
            .into_value("test")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSymbol);
    }

    #[test]
    fn test_collection_heads() {
        let ctx = ctx();
        let v = Value::vector([Value::Int(10), Value::Int(20)]);
        assert_eq!(
            apply(&v, vec![Value::Int(1)], &ctx).into_value("test").unwrap(),
            Value::Int(20)
        );
        let err = apply(&v, vec![Value::Int(5)], &ctx)
            .into_value("test")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfBounds);
        let err = apply(&v, vec![], &ctx).into_value("test").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Arity);

        let m = Value::map([(Value::keyword("a"), Value::Int(1))]);
        assert_eq!(
            apply(&Value::keyword("a"), vec![m.clone()], &ctx)
                .into_value("test")
                .unwrap(),
            Value::Int(1)
        );
        assert_eq!(
            apply(&m, vec![Value::keyword("b"), Value::Int(0)], &ctx)
                .into_value("test")
                .unwrap(),
            Value::Int(0)
        );
    }

    #[test]
    fn test_not_evalable_head() {
        let ctx = ctx();
        let err = eval(&call(Value::Int(1), [Value::Int(2)]), &ctx)
            .into_value("test")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotEvalable);
    }

    #[test]
    fn test_depth_limit() {
        let runtime = Runtime::new(InterpreterConfig::default().with_max_eval_depth(5)).unwrap();
        let ctx = runtime.root_context();
        let mut form = Value::Int(1);
        for _ in 0..10 {
            form = call(Value::BuiltIn(BuiltIn::Inc), [form]);
        }
        let err = eval(&form, &ctx).into_value("test").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MaxDepthExceeded);
        assert_eq!(runtime.depth(), 0);
    }
}

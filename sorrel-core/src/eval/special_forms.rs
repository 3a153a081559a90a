// sorrel-core - Special forms
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Special forms. Each receives its raw argument forms.

use crate::context::{Binding, Bindings, Context};
use crate::error::{EvalError, EvalResult, Result, try_eval};
use crate::symbol::Symbol;
use crate::value::{Seq, SpecialForm, Value};

use super::fn_forms::{eval_defmacro, eval_fn};
use super::trampoline::{eval_body, run_body};
use super::{apply, eval, eval_args};

/// Run the special form `sf` on its argument forms.
pub(crate) fn dispatch(sf: SpecialForm, args: &[Value], ctx: &Context) -> EvalResult {
    match sf {
        SpecialForm::Quote => EvalResult::Success(args.first().cloned().unwrap_or(Value::Nil)),
        SpecialForm::If => eval_if(args, ctx),
        SpecialForm::Do => eval_body(args, ctx),
        SpecialForm::Def => eval_def(args, ctx).into(),
        SpecialForm::Let => eval_let(args, ctx),
        SpecialForm::Var => eval_var(args, ctx).into(),
        SpecialForm::Fn => eval_fn(args, ctx).into(),
        SpecialForm::Defmacro => eval_defmacro(args, ctx).into(),
        SpecialForm::Loop => eval_loop(args, ctx),
        SpecialForm::Recur => match eval_args(args, ctx) {
            Ok(values) => EvalResult::Recur(values),
            Err(err) => err.into(),
        },
        SpecialForm::Apply => eval_apply(args, ctx),
        SpecialForm::Attempt => eval_attempt(args, ctx),
    }
}

fn eval_if(args: &[Value], ctx: &Context) -> EvalResult {
    let (test, then, otherwise) = match args {
        [test, then] => (test, then, None),
        [test, then, otherwise] => (test, then, Some(otherwise)),
        _ => return EvalError::arity("if", "2 or 3", args.len()).into(),
    };
    let test = try_eval!(eval(test, ctx).into_value("if"));
    if test.is_truthy() {
        eval(then, ctx)
    } else if let Some(otherwise) = otherwise {
        eval(otherwise, ctx)
    } else {
        EvalResult::Success(Value::Nil)
    }
}

/// `(def name)` declares an unbound Var unless it is already bound;
/// `(def name init)` binds it. Returns the Var.
fn eval_def(args: &[Value], ctx: &Context) -> Result<Value> {
    let (name, init) = match args {
        [name] => (name, None),
        [name, init] => (name, Some(init)),
        _ => return Err(EvalError::arity("def", "1 or 2", args.len())),
    };
    let Value::Symbol(sym) = name else {
        return Err(EvalError::invalid_argument(
            "def",
            "first argument must be a symbol",
        ));
    };
    let registry = ctx.registry();
    registry.definable_name(sym, "def")?;
    let var = match init {
        None => registry.set_unbound_var(sym)?,
        Some(form) => {
            let value = eval(form, ctx).into_value("def")?;
            registry.set_var(sym, value)?
        }
    };
    Ok(Value::Var(var))
}

/// Split a binding vector into `(name, init-form)` pairs.
fn binding_pairs<'a>(origin: &'static str, form: &'a Value) -> Result<Vec<(Symbol, &'a Value)>> {
    let Value::Vector(items) = form else {
        return Err(EvalError::type_error(origin, "a binding vector", form));
    };
    if items.len() % 2 != 0 {
        return Err(EvalError::binding_mismatch(origin));
    }
    let mut pairs = Vec::with_capacity(items.len() / 2);
    let mut iter = items.iter();
    while let (Some(name), Some(init)) = (iter.next(), iter.next()) {
        let sym = match name {
            Value::Symbol(sym) if sym.is_qualified() => {
                return Err(EvalError::qualified_symbol_misuse(origin, sym));
            }
            Value::Symbol(sym) => sym.clone(),
            other => return Err(EvalError::type_error(origin, "a symbol to bind", other)),
        };
        pairs.push((sym, init));
    }
    Ok(pairs)
}

/// Evaluate binding pairs in order, each seeing the ones before it.
fn bind_sequentially(
    origin: &'static str,
    pairs: &[(Symbol, &Value)],
    ctx: &Context,
) -> Result<Context> {
    let mut bindings = Bindings::new();
    let mut scope = ctx.clone();
    for (sym, init) in pairs {
        let value = eval(init, &scope).into_value(origin)?;
        bindings.insert(sym.clone(), Binding::Literal(value));
        scope = ctx.child(bindings.clone());
    }
    Ok(scope)
}

fn eval_let(args: &[Value], ctx: &Context) -> EvalResult {
    let Some((bindings, body)) = args.split_first() else {
        return EvalError::arity("let", "1+", 0).into();
    };
    let pairs = try_eval!(binding_pairs("let", bindings));
    let scope = try_eval!(bind_sequentially("let", &pairs, ctx));
    eval_body(body, &scope)
}

/// Like `let`, but a recur-signal from the body rebinds the loop names and
/// runs the body again.
fn eval_loop(args: &[Value], ctx: &Context) -> EvalResult {
    let Some((bindings, body)) = args.split_first() else {
        return EvalError::arity("loop", "1+", 0).into();
    };
    let pairs = try_eval!(binding_pairs("loop", bindings));
    let scope = try_eval!(bind_sequentially("loop", &pairs, ctx));
    let names: Vec<Symbol> = pairs.into_iter().map(|(sym, _)| sym).collect();

    run_body(body, scope, |values| {
        if values.len() != names.len() {
            return Err(EvalError::arity(
                "loop",
                names.len().to_string(),
                values.len(),
            ));
        }
        let bindings: Bindings = names
            .iter()
            .cloned()
            .zip(values.into_iter().map(Binding::Literal))
            .collect();
        Ok(ctx.child(bindings))
    })
}

/// `(var sym)` returns the Var a symbol resolves to, ignoring locals.
fn eval_var(args: &[Value], ctx: &Context) -> Result<Value> {
    let [name] = args else {
        return Err(EvalError::arity("var", "1", args.len()));
    };
    let Value::Symbol(sym) = name else {
        return Err(EvalError::type_error("var", "a symbol", name));
    };
    ctx.registry()
        .resolve(sym)
        .map(Value::Var)
        .ok_or_else(|| EvalError::invalid_symbol(sym))
}

/// `(apply f x y coll)`: the middle arguments are prepended to the elements
/// of the final collection. Maps contribute their entries as `[k v]`.
fn eval_apply(args: &[Value], ctx: &Context) -> EvalResult {
    if args.len() < 2 {
        return EvalError::arity("apply", "2+", args.len()).into();
    }
    let mut values = try_eval!(eval_args(args, ctx));
    let callee = values.remove(0);
    let Some(last) = values.pop() else {
        return EvalError::arity("apply", "2+", args.len()).into();
    };
    match &last {
        Value::Nil | Value::Seq(_) | Value::Vector(_) | Value::Map(_) => {
            let spread = try_eval!(Seq::coerce(&last, "apply").and_then(|seq| seq.to_vec(ctx)));
            values.extend(spread);
        }
        _ => {
            return EvalError::invalid_argument(
                "apply",
                "last argument must be a collection or nil",
            )
            .into();
        }
    }
    apply(&callee, values, ctx)
}

/// `(attempt a b ...)` returns the first form that evaluates without
/// error, or the last error.
fn eval_attempt(args: &[Value], ctx: &Context) -> EvalResult {
    let mut last_error = EvalError::arity("attempt", "1+", 0);
    for form in args {
        match eval(form, ctx).into_value("attempt") {
            Ok(value) => return EvalResult::Success(value),
            Err(err) => {
                tracing::debug!(error = %err, "attempt: form failed");
                last_error = err;
            }
        }
    }
    last_error.into()
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

    fn sym(name: &str) -> Value {
        Value::symbol(name)
    }

    fn run(sf: SpecialForm, args: &[Value], ctx: &Context) -> Result<Value> {
        dispatch(sf, args, ctx).into_value("test")
    }

    #[test]
    fn test_quote_without_args_is_nil() {
        assert_eq!(run(SpecialForm::Quote, &[], &ctx()).unwrap(), Value::Nil);
        assert_eq!(
            run(SpecialForm::Quote, &[sym("a")], &ctx()).unwrap(),
            sym("a")
        );
    }

    #[test]
    fn test_if_arity_and_falsiness() {
        let ctx = ctx();
        let err = run(SpecialForm::If, &[Value::Bool(true)], &ctx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Arity);
        assert_eq!(
            run(SpecialForm::If, &[Value::Nil, Value::Int(1)], &ctx).unwrap(),
            Value::Nil
        );
        assert_eq!(
            run(SpecialForm::If, &[Value::Int(0), Value::Int(1), Value::Int(2)], &ctx).unwrap(),
            Value::Int(1)
        );
    }

    #[test]
    fn test_def_returns_var() {
        let ctx = ctx();
        let var = run(SpecialForm::Def, &[sym("x"), Value::Int(4)], &ctx).unwrap();
        assert_eq!(var.to_string(), "#'user/x");
        let err = run(SpecialForm::Def, &[Value::Int(1)], &ctx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_let_is_sequential() {
        let ctx = ctx();
        let bindings = Value::vector([
            sym("a"),
            Value::Int(1),
            sym("b"),
            Value::list([Value::BuiltIn(BuiltIn::Inc), sym("a")]),
        ]);
        assert_eq!(
            run(SpecialForm::Let, &[bindings, sym("b")], &ctx).unwrap(),
            Value::Int(2)
        );
        let odd = Value::vector([sym("a")]);
        let err = run(SpecialForm::Let, &[odd], &ctx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BindingMismatch);
    }

    #[test]
    fn test_recur_outside_tail_is_misuse() {
        let ctx = ctx();
        let recur = Value::list([Value::Special(SpecialForm::Recur), Value::Int(1)]);
        let err = run(SpecialForm::Do, &[recur, Value::Nil], &ctx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RecurMisuse);
    }

    #[test]
    fn test_apply_requires_collection() {
        let ctx = ctx();
        let err = run(
            SpecialForm::Apply,
            &[Value::BuiltIn(BuiltIn::Add), Value::Int(1)],
            &ctx,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        let sum = run(
            SpecialForm::Apply,
            &[
                Value::BuiltIn(BuiltIn::Add),
                Value::Int(1),
                Value::vector([Value::Int(2), Value::Int(3)]),
            ],
            &ctx,
        )
        .unwrap();
        assert_eq!(sum, Value::Int(6));
    }

    #[test]
    fn test_attempt_returns_first_success() {
        let ctx = ctx();
        let failing = Value::list([Value::BuiltIn(BuiltIn::Error), Value::string("no")]);
        assert_eq!(
            run(SpecialForm::Attempt, &[failing.clone(), Value::Int(2)], &ctx).unwrap(),
            Value::Int(2)
        );
        let err = run(SpecialForm::Attempt, &[failing], &ctx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Runtime);
    }
}

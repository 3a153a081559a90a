// sorrel-core - fn and defmacro
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Parsing of `fn` and `defmacro` forms into arity clauses.
//!
//! Both accept a single clause `[params] body...` or several clauses
//! `([params] body...) ...`. In a parameter vector `&` marks the rest
//! parameter and must be second to last.

use std::rc::Rc;

use crate::context::Context;
use crate::error::{EvalError, Result};
use crate::function::{Arities, Function, Macro, SingleFn};
use crate::symbol::Symbol;
use crate::value::Value;

use super::function_value;

/// Symbol separating fixed parameters from the rest parameter.
const REST_MARKER: &str = "&";

fn parse_params(origin: &'static str, form: &Value) -> Result<(Vec<Symbol>, Option<Symbol>)> {
    let Value::Vector(items) = form else {
        return Err(EvalError::type_error(origin, "a parameter vector", form));
    };
    let mut symbols = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::Symbol(sym) if sym.is_qualified() => {
                return Err(EvalError::qualified_symbol_misuse(origin, sym));
            }
            Value::Symbol(sym) => symbols.push(sym.clone()),
            other => return Err(EvalError::type_error(origin, "a parameter symbol", other)),
        }
    }

    let marker = symbols.iter().position(|s| s.name() == REST_MARKER);
    match marker {
        None => Ok((symbols, None)),
        Some(at) if at + 2 == symbols.len() => {
            let rest = symbols.pop();
            symbols.truncate(at);
            Ok((symbols, rest))
        }
        Some(_) => Err(EvalError::invalid_argument(
            origin,
            "& must be followed by exactly one parameter",
        )),
    }
}

fn parse_clause(origin: &'static str, params: &Value, body: &[Value]) -> Result<SingleFn> {
    let (params, variadic) = parse_params(origin, params)?;
    Ok(SingleFn {
        params,
        variadic,
        body: body.to_vec(),
    })
}

/// Parse the clauses following the optional name.
fn parse_clauses(origin: &'static str, forms: &[Value]) -> Result<Vec<SingleFn>> {
    match forms.first() {
        None => Ok(Vec::new()),
        Some(params @ Value::Vector(_)) => Ok(vec![parse_clause(origin, params, &forms[1..])?]),
        Some(_) => forms
            .iter()
            .map(|form| match form.as_list().and_then(|items| items.front()) {
                Some(params) => {
                    let body: Vec<Value> = form
                        .as_list()
                        .map(|items| items.iter().skip(1).cloned().collect())
                        .unwrap_or_default();
                    parse_clause(origin, params, &body)
                }
                None => Err(EvalError::type_error(
                    origin,
                    "an arity clause ([params] body...)",
                    form,
                )),
            })
            .collect(),
    }
}

/// `(fn name? clauses...)`
pub(crate) fn eval_fn(args: &[Value], ctx: &Context) -> Result<Value> {
    let (name, clauses) = match args.split_first() {
        Some((Value::Symbol(sym), rest)) => {
            if sym.is_qualified() {
                return Err(EvalError::qualified_symbol_misuse("fn", sym));
            }
            (Some(sym.clone()), rest)
        }
        _ => (None, args),
    };
    let arities = Arities::build(parse_clauses("fn", clauses)?, "fn")?;
    Ok(function_value(Function::new(name, arities, ctx.clone())))
}

/// `(defmacro name clauses...)` binds a macro to `name` in the current
/// namespace and returns the Var.
pub(crate) fn eval_defmacro(args: &[Value], ctx: &Context) -> Result<Value> {
    let Some((Value::Symbol(sym), clauses)) = args.split_first() else {
        return match args.first() {
            None => Err(EvalError::arity("defmacro", "1+", 0)),
            Some(other) => Err(EvalError::type_error("defmacro", "a symbol", other)),
        };
    };
    let registry = ctx.registry();
    let name = registry.definable_name(sym, "defmacro")?;
    let arities = Arities::build(parse_clauses("defmacro", clauses)?, sym.to_string())?;
    let mac = Macro::new(name, arities, ctx.clone());
    let var = registry.set_var(sym, Value::Macro(Rc::new(mac)))?;
    Ok(Value::Var(var))
}

// sorrel-core - Namespace built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Namespace operations over the runtime's registry: ns-create, ns-set,
//! ns-get, ns-name, ns-all, ns-find, ns-remove, ns-unmap, ns-alias,
//! ns-unalias, ns-aliases, ns-refer, ns-resolve, ns-interns, ns-refers,
//! ns-map
//!
//! Functions taking a namespace accept either a namespace value or a
//! symbol naming a registered namespace.

use crate::context::Context;
use crate::error::{EvalError, Result};
use crate::namespace::{Namespace, Var};
use crate::symbol::Symbol;
use crate::value::{Value, ValueMap};

use super::{between, exact};

fn expect_name<'a>(origin: &'static str, value: &'a Value) -> Result<&'a Symbol> {
    match value {
        Value::Symbol(sym) if sym.is_qualified() => {
            Err(EvalError::qualified_symbol_misuse(origin, sym))
        }
        Value::Symbol(sym) => Ok(sym),
        other => Err(EvalError::type_error(origin, "a symbol", other)),
    }
}

/// The namespace named by the optional first argument, else the current
/// one.
fn namespace_or_current(origin: &'static str, args: &[Value], ctx: &Context) -> Result<Namespace> {
    between(origin, args, 0, 1)?;
    let registry = ctx.registry();
    match args.first() {
        Some(value) => registry.namespace_of(value, origin),
        None => Ok(registry.current()),
    }
}

fn var_map(vars: Vec<Var>) -> Value {
    Value::map(
        vars.into_iter()
            .map(|var| (Value::Symbol(var.name().clone()), Value::Var(var))),
    )
}

/// `(ns-create 'name)`: get or create a namespace.
pub(crate) fn builtin_ns_create(args: &[Value], ctx: &Context) -> Result<Value> {
    let [name] = exact::<1>("ns-create", args)?;
    let name = expect_name("ns-create", name)?;
    Ok(Value::Namespace(ctx.registry().create(name.name())))
}

/// `(ns-set ns)`: make a namespace current and return it. A symbol naming
/// no namespace creates it first.
pub(crate) fn builtin_ns_set(args: &[Value], ctx: &Context) -> Result<Value> {
    let [target] = exact::<1>("ns-set", args)?;
    let registry = ctx.registry();
    let ns = match target {
        Value::Namespace(ns) => ns.clone(),
        other => registry.create(expect_name("ns-set", other)?.name()),
    };
    registry.set_current(&ns)?;
    Ok(Value::Namespace(ns))
}

/// `(ns-get)` / `(ns-get ns)`: the current namespace, or the one named.
pub(crate) fn builtin_ns_get(args: &[Value], ctx: &Context) -> Result<Value> {
    namespace_or_current("ns-get", args, ctx).map(Value::Namespace)
}

pub(crate) fn builtin_ns_name(args: &[Value], ctx: &Context) -> Result<Value> {
    let [target] = exact::<1>("ns-name", args)?;
    let ns = ctx.registry().namespace_of(target, "ns-name")?;
    Ok(Value::Symbol(Symbol::new(ns.name())))
}

pub(crate) fn builtin_ns_all(args: &[Value], ctx: &Context) -> Result<Value> {
    exact::<0>("ns-all", args)?;
    Ok(Value::list(
        ctx.registry().all().into_iter().map(Value::Namespace),
    ))
}

/// `(ns-find 'name)`: the namespace, or nil.
pub(crate) fn builtin_ns_find(args: &[Value], ctx: &Context) -> Result<Value> {
    let [name] = exact::<1>("ns-find", args)?;
    let name = expect_name("ns-find", name)?;
    Ok(ctx
        .registry()
        .find(name.name())
        .map_or(Value::Nil, Value::Namespace))
}

/// `(ns-remove ns)`: detach a namespace from the registry. Values already
/// holding it keep working; lookups by name fail afterwards.
pub(crate) fn builtin_ns_remove(args: &[Value], ctx: &Context) -> Result<Value> {
    let [target] = exact::<1>("ns-remove", args)?;
    let registry = ctx.registry();
    let ns = registry.namespace_of(target, "ns-remove")?;
    registry.remove(&ns)?;
    Ok(Value::Nil)
}

/// `(ns-unmap ns 'name)`: remove a Var interned in `ns`. Namespaces that
/// referred it keep their refer.
pub(crate) fn builtin_ns_unmap(args: &[Value], ctx: &Context) -> Result<Value> {
    let [target, name] = exact::<2>("ns-unmap", args)?;
    let Value::Symbol(name) = name else {
        return Err(EvalError::type_error("ns-unmap", "a symbol", name));
    };
    let registry = ctx.registry();
    let ns = registry.namespace_of(target, "ns-unmap")?;
    registry.unmap(&ns, name)?;
    Ok(Value::Nil)
}

/// `(ns-alias 'alias ns)` in the current namespace.
pub(crate) fn builtin_ns_alias(args: &[Value], ctx: &Context) -> Result<Value> {
    let [alias, target] = exact::<2>("ns-alias", args)?;
    let Value::Symbol(alias) = alias else {
        return Err(EvalError::type_error("ns-alias", "a symbol", alias));
    };
    let registry = ctx.registry();
    let target = registry.namespace_of(target, "ns-alias")?;
    registry.alias(alias, &target)?;
    Ok(Value::Nil)
}

pub(crate) fn builtin_ns_unalias(args: &[Value], ctx: &Context) -> Result<Value> {
    let [alias] = exact::<1>("ns-unalias", args)?;
    ctx.registry().unalias(expect_name("ns-unalias", alias)?);
    Ok(Value::Nil)
}

/// `(ns-aliases)` / `(ns-aliases ns)`: a map from alias to namespace.
pub(crate) fn builtin_ns_aliases(args: &[Value], ctx: &Context) -> Result<Value> {
    let ns = namespace_or_current("ns-aliases", args, ctx)?;
    let map: ValueMap = ns
        .aliases()
        .into_iter()
        .map(|(alias, target)| (Value::Symbol(alias), Value::Namespace(target)))
        .collect();
    Ok(Value::Map(map))
}

/// `(ns-refer ns)`: refer every Var of `ns` into the current namespace.
pub(crate) fn builtin_ns_refer(args: &[Value], ctx: &Context) -> Result<Value> {
    let [target] = exact::<1>("ns-refer", args)?;
    let registry = ctx.registry();
    let from = registry.namespace_of(target, "ns-refer")?;
    registry.refer(&from)?;
    Ok(Value::Nil)
}

/// `(ns-resolve 'sym)` / `(ns-resolve ns 'sym)`: the Var a symbol names,
/// or nil.
pub(crate) fn builtin_ns_resolve(args: &[Value], ctx: &Context) -> Result<Value> {
    between("ns-resolve", args, 1, 2)?;
    let registry = ctx.registry();
    let (ns, sym) = match args {
        [sym] => (registry.current(), sym),
        [ns, sym] => (registry.namespace_of(ns, "ns-resolve")?, sym),
        _ => return Err(EvalError::arity("ns-resolve", "1 or 2", args.len())),
    };
    let Value::Symbol(sym) = sym else {
        return Err(EvalError::type_error("ns-resolve", "a symbol", sym));
    };
    Ok(registry
        .resolve_in(&ns, sym)
        .map_or(Value::Nil, Value::Var))
}

/// `(ns-interns)` / `(ns-interns ns)`: a map from name to Var for the Vars
/// defined in the namespace.
pub(crate) fn builtin_ns_interns(args: &[Value], ctx: &Context) -> Result<Value> {
    let ns = namespace_or_current("ns-interns", args, ctx)?;
    Ok(var_map(ns.interns()))
}

/// `(ns-refers)` / `(ns-refers ns)`: a map from name to the referred Var.
pub(crate) fn builtin_ns_refers(args: &[Value], ctx: &Context) -> Result<Value> {
    let ns = namespace_or_current("ns-refers", args, ctx)?;
    Ok(var_map(ns.refers()))
}

/// `(ns-map)` / `(ns-map ns)`: every name the namespace can resolve
/// unqualified, mapped to its Var.
pub(crate) fn builtin_ns_map(args: &[Value], ctx: &Context) -> Result<Value> {
    let ns = namespace_or_current("ns-map", args, ctx)?;
    let mut vars = ns.refers();
    vars.extend(ns.interns());
    Ok(var_map(vars))
}

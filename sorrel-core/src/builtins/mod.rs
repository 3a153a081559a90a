// sorrel-core - Built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Built-in functions.
//!
//! Every [`BuiltIn`] token is bound to a Var of the same name in the `core`
//! namespace when a runtime starts. A builtin receives already-evaluated
//! arguments and the calling context; it never sees raw forms and never
//! produces a recur-signal.

// Value hashes Vars and lazy sequences by identity.
#![allow(clippy::mutable_key_type)]

mod arithmetic;
mod collections;
mod comparison;
mod io;
mod misc;
mod namespaces;
mod sequences;
mod strings;

use tracing::{debug, trace};

use crate::context::Context;
use crate::error::{EvalError, EvalResult, Result};
use crate::namespace::NamespaceRegistry;
use crate::value::{BuiltIn, Value};

pub(crate) use collections::get;

/// Bind every builtin in the `core` namespace.
pub(crate) fn install(registry: &NamespaceRegistry) {
    for &builtin in BuiltIn::ALL {
        registry.define_core(builtin.name(), Value::BuiltIn(builtin));
    }
    debug!(count = BuiltIn::ALL.len(), "installed builtins");
}

/// Call a builtin with evaluated arguments.
pub(crate) fn call(builtin: BuiltIn, args: Vec<Value>, ctx: &Context) -> EvalResult {
    trace!(builtin = builtin.name(), argc = args.len(), "calling builtin");
    dispatch(builtin, &args, ctx).into()
}

fn dispatch(builtin: BuiltIn, args: &[Value], ctx: &Context) -> Result<Value> {
    use BuiltIn as B;
    match builtin {
        B::Add => arithmetic::builtin_add(args),
        B::Subtract => arithmetic::builtin_sub(args),
        B::Multiply => arithmetic::builtin_mul(args),
        B::Divide => arithmetic::builtin_div(args),
        B::Rem => arithmetic::builtin_rem(args),
        B::Quot => arithmetic::builtin_quot(args),
        B::Inc => arithmetic::builtin_inc(args),
        B::Dec => arithmetic::builtin_dec(args),
        B::Int => arithmetic::builtin_int(args),
        B::Double => arithmetic::builtin_double(args),

        B::Equals => comparison::builtin_equals(args, ctx),
        B::NumEquals => comparison::builtin_num_equals(args),
        B::Lt => comparison::builtin_lt(args),
        B::Le => comparison::builtin_le(args),
        B::Gt => comparison::builtin_gt(args),
        B::Ge => comparison::builtin_ge(args),
        B::Not => comparison::builtin_not(args),
        B::Identical => comparison::builtin_identical(args),
        B::NilP
        | B::NumberP
        | B::IntP
        | B::FloatP
        | B::StringP
        | B::SymbolP
        | B::KeywordP
        | B::FnP
        | B::SeqP
        | B::VectorP
        | B::MapP
        | B::CharP
        | B::VarP
        | B::TrueP
        | B::FalseP => comparison::builtin_predicate(builtin, args),
        B::PosP | B::NegP | B::ZeroP | B::NanP | B::InfiniteP => {
            comparison::builtin_numeric_predicate(builtin, args)
        }

        B::List => Ok(Value::list(args.iter().cloned())),
        B::Vector => Ok(Value::vector(args.iter().cloned())),
        B::Hashmap => collections::builtin_hashmap(args),
        B::Nth => collections::builtin_nth(args, ctx),
        B::Get => collections::builtin_get(args),
        B::Count => collections::builtin_count(args, ctx),
        B::Assoc => collections::builtin_assoc(args),
        B::Dissoc => collections::builtin_dissoc(args),
        B::Conj => collections::builtin_conj(args),
        B::Keys => collections::builtin_keys(args),
        B::Vals => collections::builtin_vals(args),

        B::Cons => sequences::builtin_cons(args),
        B::First => sequences::builtin_first(args, ctx),
        B::Rest => sequences::builtin_rest(args, ctx),
        B::Next => sequences::builtin_next(args, ctx),
        B::Seq => sequences::builtin_seq(args, ctx),
        B::Concat => sequences::builtin_concat(args, ctx),
        B::EmptyP => sequences::builtin_empty_p(args, ctx),
        B::LazySeq => sequences::builtin_lazy_seq(args),
        B::RealizedP => sequences::builtin_realized_p(args),
        B::Reduce => sequences::builtin_reduce(args, ctx),

        B::Symbol => misc::builtin_symbol(args),
        B::Keyword => misc::builtin_keyword(args),
        B::Name => misc::builtin_name(args),
        B::Namespace => misc::builtin_namespace(args),
        B::Gensym => misc::builtin_gensym(args, ctx),
        B::Eval => misc::builtin_eval(args, ctx),
        B::Macroexpand => misc::builtin_macroexpand(args, ctx),
        B::Error => misc::builtin_error(args),
        B::Deref => misc::builtin_deref(args),

        B::Str => strings::builtin_str(args),
        B::Subs => strings::builtin_subs(args),
        B::UpperCase => strings::builtin_upper_case(args),
        B::LowerCase => strings::builtin_lower_case(args),
        B::Replace => strings::builtin_replace(args, ctx),
        B::ReplaceFirst => strings::builtin_replace_first(args, ctx),
        B::Sb => strings::builtin_sb(args),
        B::SbAppend => strings::builtin_sb_append(args),
        B::SbReverse => strings::builtin_sb_reverse(args),
        B::RePattern => strings::builtin_re_pattern(args),
        B::ReFind => strings::builtin_re_find(args),
        B::ReSeq => strings::builtin_re_seq(args),
        B::ReIterate => strings::builtin_re_iterate(args, ctx),

        B::Print => io::builtin_print(args, ctx),
        B::Println => io::builtin_println(args, ctx),
        B::Read => io::builtin_read(args, ctx),
        B::ReadString => io::builtin_read_string(args, ctx),

        B::NsCreate => namespaces::builtin_ns_create(args, ctx),
        B::NsSet => namespaces::builtin_ns_set(args, ctx),
        B::NsGet => namespaces::builtin_ns_get(args, ctx),
        B::NsName => namespaces::builtin_ns_name(args, ctx),
        B::NsAll => namespaces::builtin_ns_all(args, ctx),
        B::NsFind => namespaces::builtin_ns_find(args, ctx),
        B::NsRemove => namespaces::builtin_ns_remove(args, ctx),
        B::NsUnmap => namespaces::builtin_ns_unmap(args, ctx),
        B::NsAlias => namespaces::builtin_ns_alias(args, ctx),
        B::NsUnalias => namespaces::builtin_ns_unalias(args, ctx),
        B::NsAliases => namespaces::builtin_ns_aliases(args, ctx),
        B::NsRefer => namespaces::builtin_ns_refer(args, ctx),
        B::NsResolve => namespaces::builtin_ns_resolve(args, ctx),
        B::NsInterns => namespaces::builtin_ns_interns(args, ctx),
        B::NsRefers => namespaces::builtin_ns_refers(args, ctx),
        B::NsMap => namespaces::builtin_ns_map(args, ctx),
    }
}

// ============================================================================
// Argument helpers
// ============================================================================

/// Require exactly `N` arguments.
fn exact<'a, const N: usize>(origin: &'static str, args: &'a [Value]) -> Result<&'a [Value; N]> {
    args.try_into()
        .map_err(|_| EvalError::arity(origin, N.to_string(), args.len()))
}

/// Require at least `min` arguments.
fn at_least(origin: &'static str, args: &[Value], min: usize) -> Result<()> {
    if args.len() < min {
        return Err(EvalError::arity(origin, format!("{}+", min), args.len()));
    }
    Ok(())
}

/// Require between `min` and `max` arguments.
fn between(origin: &'static str, args: &[Value], min: usize, max: usize) -> Result<()> {
    if args.len() < min || args.len() > max {
        let expected = if max == min + 1 {
            format!("{} or {}", min, max)
        } else {
            format!("{} to {}", min, max)
        };
        return Err(EvalError::arity(origin, expected, args.len()));
    }
    Ok(())
}

fn expect_int(origin: &'static str, value: &Value) -> Result<i64> {
    match value {
        Value::Int(n) => Ok(*n),
        other => Err(EvalError::type_error(origin, "an integer", other)),
    }
}

fn expect_str<'a>(origin: &'static str, value: &'a Value) -> Result<&'a str> {
    match value {
        Value::String(s) => Ok(&**s),
        other => Err(EvalError::type_error(origin, "a string", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InterpreterConfig;
    use crate::runtime::Runtime;

    #[test]
    fn test_every_builtin_is_bound_in_core() {
        let runtime = Runtime::new(InterpreterConfig::default()).unwrap();
        let core = runtime.registry().core().clone();
        for &builtin in BuiltIn::ALL {
            let var = core
                .find_var(&crate::symbol::Symbol::new(builtin.name()))
                .unwrap_or_else(|| panic!("{} is not bound", builtin.name()));
            assert_eq!(var.value(), Value::BuiltIn(builtin));
        }
    }

    #[test]
    fn test_arity_helpers() {
        let args = [Value::Int(1), Value::Int(2)];
        assert!(exact::<2>("t", &args).is_ok());
        assert!(exact::<1>("t", &args).is_err());
        assert!(at_least("t", &args, 3).is_err());
        let err = between("t", &args, 0, 1).unwrap_err();
        assert!(err.to_string().contains("expected 0 or 1"));
    }
}

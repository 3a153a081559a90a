// sorrel-core - Naming and evaluation built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! symbol, keyword, name, namespace, gensym, eval, macroexpand, error, deref

use crate::context::{Binding, Context};
use crate::error::{EvalError, Result};
use crate::eval::eval_form;
use crate::function::Macro;
use crate::keyword::Keyword;
use crate::symbol::Symbol;
use crate::value::{PrintStyle, Value};

use super::{between, exact, expect_str};

/// Prefix of symbols made by `(gensym)`.
const DEFAULT_GENSYM_PREFIX: &str = "G__";

/// Namespace and name parts of the arguments to `symbol` or `keyword`.
fn name_parts<'a>(origin: &'static str, args: &'a [Value]) -> Result<(Option<&'a str>, &'a str)> {
    between(origin, args, 1, 2)?;
    match args {
        [name] => match name {
            Value::String(s) => Ok((None, &**s)),
            Value::Symbol(sym) => Ok((sym.namespace(), sym.name())),
            Value::Keyword(kw) => Ok((kw.namespace(), kw.name())),
            other => Err(EvalError::type_error(origin, "a string, symbol or keyword", other)),
        },
        [ns, name] => {
            let ns = match ns {
                Value::Nil => None,
                other => Some(expect_str(origin, other)?),
            };
            Ok((ns, expect_str(origin, name)?))
        }
        _ => Err(EvalError::arity(origin, "1 or 2", args.len())),
    }
}

/// `(symbol name)` / `(symbol ns name)`
pub(crate) fn builtin_symbol(args: &[Value]) -> Result<Value> {
    let (ns, name) = name_parts("symbol", args)?;
    if name.is_empty() {
        return Err(EvalError::invalid_argument("symbol", "name cannot be empty"));
    }
    Ok(Value::Symbol(match ns {
        Some(ns) => Symbol::qualified(ns, name),
        None => Symbol::new(name),
    }))
}

/// `(keyword name)` / `(keyword ns name)`
pub(crate) fn builtin_keyword(args: &[Value]) -> Result<Value> {
    let (ns, name) = name_parts("keyword", args)?;
    if name.is_empty() {
        return Err(EvalError::invalid_argument("keyword", "name cannot be empty"));
    }
    Ok(Value::Keyword(match ns {
        Some(ns) => Keyword::qualified(ns, name),
        None => Keyword::new(name),
    }))
}

pub(crate) fn builtin_name(args: &[Value]) -> Result<Value> {
    let [x] = exact::<1>("name", args)?;
    match x {
        Value::String(_) => Ok(x.clone()),
        Value::Symbol(sym) => Ok(Value::string(sym.name())),
        Value::Keyword(kw) => Ok(Value::string(kw.name())),
        other => Err(EvalError::type_error("name", "a string, symbol or keyword", other)),
    }
}

/// `(namespace x)`: the qualifier of a symbol or keyword, or nil.
pub(crate) fn builtin_namespace(args: &[Value]) -> Result<Value> {
    let [x] = exact::<1>("namespace", args)?;
    let qualifier = match x {
        Value::Symbol(sym) => sym.namespace(),
        Value::Keyword(kw) => kw.namespace(),
        other => return Err(EvalError::type_error("namespace", "a symbol or keyword", other)),
    };
    Ok(qualifier.map_or(Value::Nil, Value::string))
}

/// `(gensym)` / `(gensym prefix)`
pub(crate) fn builtin_gensym(args: &[Value], ctx: &Context) -> Result<Value> {
    between("gensym", args, 0, 1)?;
    let prefix = match args.first() {
        None => DEFAULT_GENSYM_PREFIX,
        Some(Value::String(s)) => &**s,
        Some(Value::Symbol(sym)) => sym.name(),
        Some(other) => return Err(EvalError::type_error("gensym", "a string or symbol", other)),
    };
    Ok(Value::Symbol(ctx.runtime().gensym(prefix)))
}

/// `(eval form)` evaluates data as code against the namespaces, without
/// the caller's local bindings.
pub(crate) fn builtin_eval(args: &[Value], ctx: &Context) -> Result<Value> {
    let [form] = exact::<1>("eval", args)?;
    eval_form(form, &ctx.runtime().root_context())
}

/// The macro a form calls, if its head is a symbol bound to one.
fn macro_call(form: &Value, ctx: &Context) -> Option<(std::rc::Rc<Macro>, Vec<Value>)> {
    let items = form.as_list()?;
    let Value::Symbol(head) = items.front()? else {
        return None;
    };
    let mac = match ctx.lookup(head)? {
        Binding::BoundMacro(mac) => mac,
        Binding::Literal(Value::Macro(mac)) => mac,
        _ => return None,
    };
    Some((mac, items.iter().skip(1).cloned().collect()))
}

/// `(macroexpand form)` expands the form while its head names a macro.
pub(crate) fn builtin_macroexpand(args: &[Value], ctx: &Context) -> Result<Value> {
    let [form] = exact::<1>("macroexpand", args)?;
    let mut form = form.clone();
    while let Some((mac, call_args)) = macro_call(&form, ctx) {
        form = Macro::expand(&mac, call_args)?;
    }
    Ok(form)
}

/// `(error msg ...)` fails with a runtime error whose message is the
/// arguments printed as by `str`.
pub(crate) fn builtin_error(args: &[Value]) -> Result<Value> {
    let message: String = args.iter().map(|arg| arg.render(PrintStyle::Raw)).collect();
    Err(EvalError::runtime(message))
}

/// `(deref var)`
pub(crate) fn builtin_deref(args: &[Value]) -> Result<Value> {
    let [x] = exact::<1>("deref", args)?;
    match x {
        Value::Var(var) => Ok(var.value()),
        other => Err(EvalError::type_error("deref", "a var", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InterpreterConfig;
    use crate::error::ErrorKind;
    use crate::runtime::Runtime;

    fn ctx() -> Context {
        Runtime::new(InterpreterConfig::default())
            .unwrap()
            .root_context()
    }

    #[test]
    fn test_symbol_and_keyword_construction() {
        assert_eq!(
            builtin_symbol(&[Value::string("a")]).unwrap(),
            Value::symbol("a")
        );
        assert_eq!(
            builtin_symbol(&[Value::string("ns"), Value::string("a")])
                .unwrap()
                .to_string(),
            "ns/a"
        );
        assert_eq!(
            builtin_keyword(&[Value::symbol("x")]).unwrap().to_string(),
            ":x"
        );
        let err = builtin_symbol(&[Value::string("")]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_name_and_namespace() {
        let sym = Value::Symbol(Symbol::qualified("foo", "bar"));
        assert_eq!(builtin_name(&[sym.clone()]).unwrap(), Value::string("bar"));
        assert_eq!(builtin_namespace(&[sym]).unwrap(), Value::string("foo"));
        assert_eq!(
            builtin_namespace(&[Value::keyword("k")]).unwrap(),
            Value::Nil
        );
    }

    #[test]
    fn test_gensym_is_unique() {
        let ctx = ctx();
        let a = builtin_gensym(&[], &ctx).unwrap();
        let b = builtin_gensym(&[], &ctx).unwrap();
        assert_ne!(a, b);
        assert!(a.to_string().starts_with("G__"));
        let c = builtin_gensym(&[Value::string("tmp")], &ctx).unwrap();
        assert!(c.to_string().starts_with("tmp"));
    }

    #[test]
    fn test_error_is_runtime() {
        let err = builtin_error(&[Value::string("bad "), Value::Int(1)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Runtime);
        assert_eq!(err.to_string(), "bad 1");
    }

    #[test]
    fn test_deref_unbound_var() {
        let ctx = ctx();
        let var = ctx.registry().set_unbound_var(&Symbol::new("x")).unwrap();
        let value = builtin_deref(&[Value::Var(var)]).unwrap();
        assert_eq!(value.type_name(), "unbound");
    }

    #[test]
    fn test_eval_data() {
        let ctx = ctx();
        let form = Value::list([Value::symbol("+"), Value::Int(1), Value::Int(2)]);
        assert_eq!(builtin_eval(&[form], &ctx).unwrap(), Value::Int(3));
    }
}

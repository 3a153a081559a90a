// sorrel-embed - Namespace integration tests
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Integration tests for namespaces: creation, switching, aliases,
//! refers, removal and the reserved system namespace.

mod common;

use common::{ErrorKind, Value, eval_all, eval_str, new_interpreter};

const LIB: &str = "(ns-set 'lib) (def x 1) (def y 2) (ns-set 'user)";

#[test]
fn test_default_namespace() {
    let interp = new_interpreter();
    assert_eq!(interp.current_namespace().name(), "user");
    assert_eq!(
        eval_all("(ns-name (ns-get))", &interp).unwrap(),
        Value::symbol("user")
    );
}

#[test]
fn test_ns_get_by_name_or_value() {
    assert!(matches!(
        eval_str("(ns-create 'lib) (ns-get 'lib)").unwrap(),
        Value::Namespace(ns) if ns.name() == "lib"
    ));
    assert_eval!("(ns-name (ns-get (ns-find 'user)))", Value::symbol("user"));
    assert_eval!("(ns-name (ns-get (ns-create 'other)))", Value::symbol("other"));
    assert_eval_err!("(ns-get 'missing)", ErrorKind::InvalidNamespace);
    assert_eval_err!("(ns-get :user)", ErrorKind::InvalidArgument);
    assert_eval_err!("(ns-get 'user 'lib)", ErrorKind::Arity);
}

#[test]
fn test_ns_set_returns_the_namespace() {
    assert_eval!("(ns-name (ns-set 'fresh))", Value::symbol("fresh"));
    assert_eval!("(= (ns-set 'lib) (ns-get 'lib))", Value::Bool(true));
}

#[test]
fn test_core_is_reserved() {
    assert_eval_err!("(ns-set 'core)", ErrorKind::ReservedNamespace);
    assert_eval_err!("(ns-remove 'core)", ErrorKind::ReservedNamespace);
    assert_eval_err_contains!("(ns-set 'core)", "namespace core is reserved");
}

#[test]
fn test_switching_namespaces() {
    let interp = new_interpreter();
    eval_all(LIB, &interp).unwrap();
    assert_eq!(interp.current_namespace().name(), "user");
    assert!(interp.get("x").is_none());
    assert_eq!(interp.get("lib/x"), Some(Value::Int(1)));
    assert_eq!(eval_all("lib/y", &interp).unwrap(), Value::Int(2));
}

#[test]
fn test_new_namespaces_refer_core() {
    assert_eval!("(ns-set 'fresh) (inc 1)", Value::Int(2));
    assert_eval!("(ns-set 'fresh) (core/inc 1)", Value::Int(2));
}

#[test]
fn test_shadowing_a_core_name() {
    let interp = new_interpreter();
    assert_eq!(eval_all("(def inc 5) inc", &interp).unwrap(), Value::Int(5));
    assert_eq!(eval_all("(core/inc 1)", &interp).unwrap(), Value::Int(2));
    // Builtin tokens are not affected by Vars.
    assert_eq!(eval_all("(.inc 1)", &interp).unwrap(), Value::Int(2));
}

#[test]
fn test_qualified_def() {
    assert_eval!("(def user/x 1) x", Value::Int(1));
    assert_eval_err!("(ns-create 'lib) (def lib/x 1)", ErrorKind::QualifiedSymbolMisuse);
}

#[test]
fn test_aliases() {
    let interp = new_interpreter();
    eval_all(LIB, &interp).unwrap();
    assert_eq!(
        eval_all("(ns-alias 'l 'lib) l/x", &interp).unwrap(),
        Value::Int(1)
    );
    // Re-aliasing to the same namespace is allowed.
    eval_all("(ns-alias 'l 'lib)", &interp).unwrap();

    let err = eval_all("(ns-create 'other) (ns-alias 'l 'other)", &interp).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AliasRebinding);

    eval_all("(ns-unalias 'l)", &interp).unwrap();
    let err = eval_all("l/x", &interp).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidSymbol);
}

#[test]
fn test_alias_target_must_be_a_namespace() {
    let interp = new_interpreter();
    eval_all(LIB, &interp).unwrap();
    eval_all("(ns-alias 'l 'lib)", &interp).unwrap();
    let err = eval_all("(ns-alias 'm 'l)", &interp).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidNamespace);
    let err = eval_all("(ns-alias 'm 'missing)", &interp).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidNamespace);
}

#[test]
fn test_refer() {
    let interp = new_interpreter();
    eval_all(LIB, &interp).unwrap();
    assert_eq!(
        eval_all("(ns-refer 'lib) (+ x y)", &interp).unwrap(),
        Value::Int(3)
    );
    let err = eval_all("(def x 10)", &interp).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::VarRebinding);
}

#[test]
fn test_removed_namespace() {
    let interp = new_interpreter();
    eval_all("(def n (ns-create 'lib))", &interp).unwrap();
    eval_all("(ns-remove 'lib)", &interp).unwrap();

    assert_eq!(eval_all("(ns-find 'lib)", &interp).unwrap(), Value::Nil);
    assert_eq!(
        eval_all("(ns-name 'lib)", &interp).unwrap_err().kind(),
        ErrorKind::InvalidNamespace
    );
    // The captured value still works.
    assert_eq!(
        eval_all("(ns-name n)", &interp).unwrap(),
        Value::symbol("lib")
    );
    assert_eq!(
        eval_all("(ns-set n)", &interp).unwrap_err().kind(),
        ErrorKind::InvalidNamespace
    );
}

#[test]
fn test_cannot_remove_current_namespace() {
    assert_eval_err!("(ns-remove (ns-get))", ErrorKind::InvalidArgument);
}

#[test]
fn test_resolve_and_interns() {
    assert_eval!("(def x 1) (= (ns-resolve 'x) #'x)", Value::Bool(true));
    assert_eval!("(ns-resolve 'nope)", Value::Nil);
    assert_eval!("(def a 1) (def b 2) (count (ns-interns))", Value::Int(2));
    assert_eval!(
        "(ns-set 'lib) (def z 3) (ns-set 'user) (count (ns-interns 'lib))",
        Value::Int(1)
    );
    assert_eval!("(map? (ns-refers))", Value::Bool(true));
}

#[test]
fn test_unmap() {
    let interp = new_interpreter();
    eval_all(LIB, &interp).unwrap();
    eval_all("(ns-refer 'lib)", &interp).unwrap();
    assert_eq!(eval_all("(ns-unmap 'lib 'x)", &interp).unwrap(), Value::Nil);

    // The Var is gone from lib but user keeps its refer.
    let err = eval_all("lib/x", &interp).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidSymbol);
    assert_eq!(eval_all("x", &interp).unwrap(), Value::Int(1));
    assert_eq!(eval_all("lib/y", &interp).unwrap(), Value::Int(2));

    // Unknown names are ignored.
    assert_eq!(eval_all("(ns-unmap 'lib 'nope)", &interp).unwrap(), Value::Nil);

    let err = eval_all("(ns-unmap 'lib 'lib/y)", &interp).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::QualifiedSymbolMisuse);
    let err = eval_all("(ns-unmap 'core 'inc)", &interp).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ReservedNamespace);
    let err = eval_all("(ns-unmap 'missing 'x)", &interp).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidNamespace);
}

#[test]
fn test_ns_map_merges_interns_and_refers() {
    assert_eval!("(def z 1) (= (get (ns-map) 'z) #'z)", Value::Bool(true));
    assert_eval!("(= (get (ns-map) 'inc) #'core/inc)", Value::Bool(true));
    assert_eval!(
        "(def mine 1) (= (count (ns-map)) (+ (count (ns-interns)) (count (ns-refers))))",
        Value::Bool(true)
    );
    assert_eval!(
        "(ns-set 'lib) (def w 2) (ns-set 'user) (= (get (ns-map 'lib) 'w) #'lib/w)",
        Value::Bool(true)
    );
}

#[test]
fn test_ns_all_and_find() {
    let interp = new_interpreter();
    assert!(matches!(eval_all("(count (ns-all))", &interp).unwrap(), Value::Int(n) if n >= 2));
    assert_eq!(
        eval_all("(seq? (ns-all))", &interp).unwrap(),
        Value::Bool(true)
    );
    assert!(matches!(
        eval_all("(ns-find 'user)", &interp).unwrap(),
        Value::Namespace(_)
    ));
}

#[test]
fn test_syntax_quote_in_other_namespace_calls_back() {
    // Symbols in a macro expansion are qualified with the defining
    // namespace, so they resolve from any caller.
    let interp = new_interpreter();
    eval_all(
        "(ns-set 'lib) (def secret 42) (defmacro reveal [] `secret) (ns-set 'user)",
        &interp,
    )
    .unwrap();
    assert_eq!(eval_all("(lib/reveal)", &interp).unwrap(), Value::Int(42));
}

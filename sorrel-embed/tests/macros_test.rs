// sorrel-embed - Macro and syntax-quote integration tests
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Integration tests for defmacro, macroexpand, syntax-quote expansion and
//! auto-gensyms.

mod common;

use common::{ErrorKind, Value, eval_all, eval_str, new_interpreter};

fn ints(items: impl IntoIterator<Item = i64>) -> impl Iterator<Item = Value> {
    items.into_iter().map(Value::Int)
}

fn string_of(value: Value) -> String {
    match value {
        Value::String(s) => s.to_string(),
        other => panic!("expected a string, got {}", other),
    }
}

// =============================================================================
// defmacro
// =============================================================================

#[test]
fn test_macro_receives_unevaluated_forms() {
    let interp = new_interpreter();
    eval_all("(defmacro unless [c a b] `(if ~c ~b ~a))", &interp).unwrap();
    assert_eq!(eval_all("(unless false 1 2)", &interp).unwrap(), Value::Int(1));
    // The untaken branch is never evaluated.
    assert_eq!(
        eval_all("(unless true (error \"no\") :ok)", &interp).unwrap(),
        Value::keyword("ok")
    );
}

#[test]
fn test_macro_with_rest_and_splice() {
    let interp = new_interpreter();
    eval_all("(defmacro my-do [& body] `(do ~@body))", &interp).unwrap();
    assert_eq!(eval_all("(my-do 1 2 3)", &interp).unwrap(), Value::Int(3));
    assert_eq!(eval_all("(my-do)", &interp).unwrap(), Value::Nil);
}

#[test]
fn test_expansion_is_evaluated_in_callers_scope() {
    assert_eval!("(defmacro m [x] x) (let [y 5] (m y))", Value::Int(5));
}

#[test]
fn test_qualified_core_names_in_expansions() {
    assert_eval!("(defmacro twice [x] `(+ ~x ~x)) (twice 4)", Value::Int(8));
}

#[test]
fn test_auto_gensym_hygiene() {
    assert_eval!(
        "(defmacro square [v] `(let [t# ~v] (* t# t#))) (let [t 2] (square (+ t 1)))",
        Value::Int(9)
    );
}

#[test]
fn test_macro_is_not_a_value() {
    assert_eval_err!("(defmacro m [] 1) m", ErrorKind::EvaluatingMacro);
    assert_eval_err!("(defmacro m [] 1) (apply m [])", ErrorKind::EvaluatingMacro);
}

#[test]
fn test_macro_arity_errors() {
    assert_eval_err!("(defmacro m [x] x) (m)", ErrorKind::Arity);
    assert_eval_err!("(defmacro m)", ErrorKind::NoFnArities);
    assert_eval_err!("(defmacro 1 [] 1)", ErrorKind::InvalidArgument);
}

#[test]
fn test_macroexpand() {
    let interp = new_interpreter();
    eval_all("(defmacro unless [c a b] `(if ~c ~b ~a))", &interp).unwrap();
    let expanded = eval_all("(macroexpand '(unless false 1 2))", &interp).unwrap();
    assert_eq!(expanded.to_string(), "(if false 2 1)");
    assert_eq!(
        eval_all("(macroexpand '(+ 1 2))", &interp).unwrap().to_string(),
        "(+ 1 2)"
    );
}

// =============================================================================
// Syntax-quote
// =============================================================================

#[test]
fn test_symbols_are_namespace_qualified() {
    assert_eval!("`a", Value::symbol("user/a"));
    assert_eval!("`core/x", Value::symbol("core/x"));
    assert_eval!("`&", Value::symbol("&"));
    assert_eval!("`1", Value::Int(1));
}

#[test]
fn test_qualification_uses_current_namespace() {
    assert_eval!("(ns-set 'lib) `a", Value::symbol("lib/a"));
}

#[test]
fn test_unquote_and_splice() {
    assert_eval!("(def c 5) `(~c)", Value::list(ints([5])));
    assert_eval!("`(1 ~@[2 3] 4)", Value::list(ints([1, 2, 3, 4])));
    assert_eval!("`(1 ~@nil)", Value::list(ints([1])));
    assert_eval!("`()", Value::empty_list());
}

#[test]
fn test_syntax_quoted_collections() {
    assert_eval!(
        "(def c 5) `[a ~c]",
        Value::vector([Value::symbol("user/a"), Value::Int(5)])
    );
    assert_eval!(
        "(def c 5) `{:k ~c}",
        Value::map([(Value::keyword("k"), Value::Int(5))])
    );
    assert_eval!("`[~@[1 2]]", Value::vector(ints([1, 2])));
}

#[test]
fn test_gensym_list_expansion() {
    let interp = new_interpreter();
    eval_all("(def c 5) (def r `(a b# ~c b#))", &interp).unwrap();

    assert_eq!(eval_all("(count r)", &interp).unwrap(), Value::Int(4));
    assert_eq!(eval_all("(first r)", &interp).unwrap(), Value::symbol("user/a"));
    assert_eq!(eval_all("(nth r 2)", &interp).unwrap(), Value::Int(5));
    assert_eq!(
        eval_all("(= (nth r 1) (nth r 3))", &interp).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        eval_all("(namespace (nth r 1))", &interp).unwrap(),
        Value::Nil
    );

    let name = string_of(eval_all("(name (nth r 1))", &interp).unwrap());
    assert!(name.starts_with("b__"), "unexpected gensym {}", name);
    assert!(name.ends_with("__auto__"), "unexpected gensym {}", name);
}

#[test]
fn test_gensyms_are_unique_across_expansions() {
    assert_eval!("(= `x# `x#)", Value::Bool(false));
    assert_eval!("(let [r `(x# x#)] (= (first r) (nth r 1)))", Value::Bool(true));
}

#[test]
fn test_quote_inside_syntax_quote() {
    assert_eval!(
        "`'a",
        Value::list([
            Value::Special(sorrel_core::SpecialForm::Quote),
            Value::symbol("user/a"),
        ])
    );
}

#[test]
fn test_misplaced_unquotes_are_read_errors() {
    assert_eval_err!("~a", ErrorKind::Read);
    assert_eval_err!("(+ 1 ~@a)", ErrorKind::Read);
    assert_eval_err!("`~@a", ErrorKind::Read);
}

#[test]
fn test_gensym_builtin() {
    assert_eval!("(symbol? (gensym))", Value::Bool(true));
    assert_eval!("(= (gensym) (gensym))", Value::Bool(false));
    let name = string_of(eval_str("(name (gensym \"tmp\"))").unwrap());
    assert!(name.starts_with("tmp"));
}

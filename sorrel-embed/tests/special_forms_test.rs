// sorrel-embed - Special form integration tests
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Integration tests for quote, if, do, def, let, var, apply and attempt,
//! plus truthiness and calling collections.

mod common;

use common::{ErrorKind, Value, eval_all, eval_str, new_interpreter};

// =============================================================================
// quote, if, do
// =============================================================================

#[test]
fn test_quote() {
    assert_eval!("(quote a)", Value::symbol("a"));
    assert_eval!("'(a 1)", Value::list([Value::symbol("a"), Value::Int(1)]));
    assert_eval!("(quote)", Value::Nil);
}

#[test]
fn test_truthiness() {
    assert_eval!("(if nil 1 2)", Value::Int(2));
    assert_eval!("(if false 1 2)", Value::Int(2));
    assert_eval!("(if 0 1 2)", Value::Int(1));
    assert_eval!("(if \"\" 1 2)", Value::Int(1));
    assert_eval!("(if () 1 2)", Value::Int(1));
    assert_eval!("(if false 1)", Value::Nil);
}

#[test]
fn test_if_arity() {
    assert_eval_err!("(if true)", ErrorKind::Arity);
    assert_eval_err!("(if 1 2 3 4)", ErrorKind::Arity);
}

#[test]
fn test_do() {
    assert_eval!("(do)", Value::Nil);
    assert_eval!("(do 1 2 3)", Value::Int(3));
}

// =============================================================================
// def and var
// =============================================================================

#[test]
fn test_def_binds_in_current_namespace() {
    let interp = new_interpreter();
    let var = eval_all("(def x 42)", &interp).unwrap();
    assert!(matches!(var, Value::Var(_)));
    assert_eq!(interp.get("x"), Some(Value::Int(42)));
    assert_eq!(eval_all("(def x 7) x", &interp).unwrap(), Value::Int(7));
}

#[test]
fn test_def_without_init_keeps_binding() {
    assert_eval!("(def x 1) (def x) x", Value::Int(1));
}

#[test]
fn test_def_rejects_non_symbol() {
    assert_eval_err!("(def 1 2)", ErrorKind::InvalidArgument);
}

#[test]
fn test_var_and_deref() {
    assert_eval!("(def x 3) (deref (var x))", Value::Int(3));
    assert_eval!("(def x 3) @#'x", Value::Int(3));
    assert_eval!("(def x 3) (= (var x) #'x)", Value::Bool(true));
    assert_eval_err!("(var nope)", ErrorKind::InvalidSymbol);
}

#[test]
fn test_unresolved_symbol() {
    assert_eval_err!("nope", ErrorKind::InvalidSymbol);
    assert_eval_err_contains!("nope", "unable to resolve symbol: nope");
}

#[test]
fn test_special_forms_cannot_be_shadowed() {
    assert_eval!("(let [x 1] (if x :yes :no))", Value::keyword("yes"));
    assert_eval_err!("(def f if) f", ErrorKind::EvaluatingSpecialForm);
}

// =============================================================================
// let
// =============================================================================

#[test]
fn test_let_is_sequential() {
    assert_eval!("(let [x 1 y (+ x 1)] y)", Value::Int(2));
    assert_eval!("(let [x 1 x (inc x)] x)", Value::Int(2));
    assert_eval!("(let [])", Value::Nil);
}

#[test]
fn test_let_shadows_globals() {
    assert_eval!("(def x 1) (let [x 2] x)", Value::Int(2));
    assert_eval!("(def x 1) (let [y 2] x)", Value::Int(1));
}

#[test]
fn test_let_binding_errors() {
    assert_eval_err!("(let [x] x)", ErrorKind::BindingMismatch);
    assert_eval_err!("(let [user/x 1] x)", ErrorKind::QualifiedSymbolMisuse);
    assert_eval_err!("(let (x 1) x)", ErrorKind::InvalidArgument);
}

// =============================================================================
// apply and attempt
// =============================================================================

#[test]
fn test_apply() {
    assert_eval!("(apply + 1 2 [3 4])", Value::Int(10));
    assert_eval!("(apply + '(1 2))", Value::Int(3));
    assert_eval!("(apply + nil)", Value::Int(0));
    assert_eval!("(apply (fn [& xs] (count xs)) 1 [2 3])", Value::Int(3));
    assert_eval_err!("(apply + 1 2)", ErrorKind::InvalidArgument);
    assert_eval_err!("(apply +)", ErrorKind::Arity);
}

#[test]
fn test_attempt() {
    assert_eval!("(attempt (error \"a\") 5)", Value::Int(5));
    assert_eval!("(attempt 1 (error \"never\"))", Value::Int(1));
    assert_eval_err!("(attempt)", ErrorKind::Arity);
    let err = eval_str("(attempt (error \"a\") (error \"b\"))").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Runtime);
    assert_eq!(err.to_string(), "b");
}

// =============================================================================
// Calling collections and keywords
// =============================================================================

#[test]
fn test_collections_as_functions() {
    assert_eval!("({:a 1} :a)", Value::Int(1));
    assert_eval!("({:a 1} :b 9)", Value::Int(9));
    assert_eval!("(:a {:a 1})", Value::Int(1));
    assert_eval!("(:b {:a 1} 9)", Value::Int(9));
    assert_eval!("([10 20 30] 1)", Value::Int(20));
    assert_eval_err!("([10 20] 5)", ErrorKind::OutOfBounds);
}

#[test]
fn test_not_evalable() {
    assert_eval_err!("(1 2)", ErrorKind::NotEvalable);
    assert_eval!("()", Value::empty_list());
}

#[test]
fn test_error_builtin() {
    assert_eval_err!("(error \"boom\" 1)", ErrorKind::Runtime);
    assert_eval_err_contains!("(error \"boom\" 1)", "boom1");
}

#[test]
fn test_collection_literals_evaluate_elements() {
    assert_eval!(
        "(let [x 1] [x (inc x)])",
        Value::vector([Value::Int(1), Value::Int(2)])
    );
    assert_eval!(
        "(let [k :a] {k (+ 1 1)})",
        Value::map([(Value::keyword("a"), Value::Int(2))])
    );
}

// =============================================================================
// Depth limit
// =============================================================================

#[test]
fn test_default_depth_limit_stops_deep_recursion() {
    // Runs on the test harness thread with the default limit, so the
    // native stack has to outlast max_eval_depth.
    let interp = new_interpreter();
    eval_all(
        "(def count-down (fn [n] (if (= n 0) 0 (+ 1 (count-down (- n 1))))))",
        &interp,
    )
    .unwrap();
    assert_eq!(eval_all("(count-down 1000)", &interp).unwrap(), Value::Int(1000));

    let err = eval_all("(count-down 100000)", &interp).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MaxDepthExceeded);
    assert_eq!(eval_all("(count-down 10)", &interp).unwrap(), Value::Int(10));
}


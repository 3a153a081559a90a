// sorrel-embed - Common test utilities
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Shared test helpers for Sorrel integration tests.
//!
//! # Usage
//!
//! In your test file, add:
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! # Available Helpers
//!
//! - [`eval_str`] - Evaluate code in a fresh interpreter
//! - [`eval_all`] - Evaluate code in an existing interpreter
//! - [`new_interpreter`] - Create a new interpreter with default settings
//!
//! # Macros
//!
//! - [`assert_eval!`] - Assert that code evaluates to an expected value
//! - [`assert_eval_err!`] - Assert that code fails with a given error kind
//! - [`assert_eval_err_contains!`] - Assert that an error message contains
//!   a pattern

#[allow(unused_imports)]
pub use sorrel_embed::{ErrorKind, EvalError, EvalResult, Interpreter, InterpreterConfig, Value};

/// Evaluate every form of `s` in a fresh interpreter, returning the last
/// value.
pub fn eval_str(s: &str) -> Result<Value, EvalError> {
    eval_all(s, &new_interpreter())
}

/// Evaluate every form of `s` in the given interpreter, returning the last
/// value. A stray recur-signal counts as a failure.
pub fn eval_all(s: &str, interp: &Interpreter) -> Result<Value, EvalError> {
    match interp.evaluate(s) {
        EvalResult::Success(value) => Ok(value),
        EvalResult::Failure(err) => Err(err),
        EvalResult::Recur(_) => panic!("top-level evaluation of '{}' leaked a recur-signal", s),
    }
}

/// Create a new interpreter with the default configuration.
///
/// # Panics
///
/// Panics if the runtime cannot be created (should never happen).
#[must_use]
pub fn new_interpreter() -> Interpreter {
    Interpreter::new().expect("failed to create interpreter")
}

/// Assert that evaluating `input` produces the expected value.
///
/// # Example
///
/// ```ignore
/// assert_eval!("(+ 1 2)", Value::Int(3));
/// ```
#[macro_export]
macro_rules! assert_eval {
    ($input:expr, $expected:expr) => {
        let result = $crate::common::eval_str($input);
        assert!(
            result.is_ok(),
            "Failed to evaluate '{}': {:?}",
            $input,
            result.as_ref().err()
        );
        pretty_assertions::assert_eq!(
            result.unwrap(),
            $expected,
            "Evaluation of '{}' did not match expected",
            $input
        );
    };
}

/// Assert that evaluating `input` fails with the given [`ErrorKind`].
///
/// # Example
///
/// ```ignore
/// assert_eval_err!("(/ 1 0)", ErrorKind::DivideByZero);
/// ```
#[macro_export]
macro_rules! assert_eval_err {
    ($input:expr, $kind:expr) => {
        match $crate::common::eval_str($input) {
            Ok(value) => panic!("Expected error for '{}' but got {}", $input, value),
            Err(err) => assert_eq!(
                err.kind(),
                $kind,
                "Unexpected error for '{}': {}",
                $input,
                err
            ),
        }
    };
}

/// Assert that evaluating `input` produces an error whose message contains
/// the given pattern (case-insensitive).
///
/// # Example
///
/// ```ignore
/// assert_eval_err_contains!("(/ 1 0)", "divide by zero");
/// ```
#[macro_export]
macro_rules! assert_eval_err_contains {
    ($input:expr, $pattern:expr) => {
        match $crate::common::eval_str($input) {
            Ok(value) => panic!("Expected error for '{}' but got {}", $input, value),
            Err(err) => {
                let message = err.to_string();
                assert!(
                    message.to_lowercase().contains(&$pattern.to_lowercase()),
                    "Error message '{}' does not contain '{}'",
                    message,
                    $pattern
                );
            }
        }
    };
}

// sorrel-embed - Embedding API for Sorrel
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # sorrel-embed
//!
//! A high-level embedding API for the Sorrel language: one
//! [`Interpreter`] wires the reader to the evaluator and exposes text
//! evaluation, variable access and host hooks.
//!
//! ## Quick Start
//!
//! ```rust
//! use sorrel_embed::{EvalResult, Interpreter, Value};
//!
//! let interp = Interpreter::new().unwrap();
//! let result = interp.evaluate("(let [x 2] (* x 21))");
//! assert!(matches!(result, EvalResult::Success(Value::Int(42))));
//! ```

mod interpreter;

pub use interpreter::Interpreter;

// Re-export core types for convenience
pub use sorrel_core::{
    ErrorKind, EvalError, EvalResult, Host, InterpreterConfig, Namespace, Result, StdHost, Value,
    Var,
};

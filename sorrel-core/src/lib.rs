// sorrel-core - Value model and evaluator for the Sorrel language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # sorrel-core
//!
//! Value model, namespaces and tree-walking evaluator for Sorrel, a small
//! Clojure-like Lisp.
//!
//! The core has no parser. Front ends (see `sorrel-reader`) turn text into
//! raw [`Value`] trees; [`eval_form`] expands their reader macros and
//! evaluates them against a [`Context`] obtained from a [`Runtime`].

mod builtins;
pub mod config;
pub mod context;
pub mod error;
pub mod eval;
pub mod expand;
pub mod function;
mod intern;
pub mod keyword;
pub mod namespace;
pub mod runtime;
mod stack;
pub mod symbol;
pub mod value;

pub use config::InterpreterConfig;
pub use context::{Binding, Context, ContextMode};
pub use error::{ErrorKind, EvalError, EvalResult, ReadError, Result};
pub use eval::{apply, eval, eval_form};
pub use expand::expand;
pub use function::{Function, Macro};
pub use keyword::Keyword;
pub use namespace::{Namespace, NamespaceRegistry, Var};
pub use runtime::{Host, Runtime, SourceReader, StdHost};
pub use symbol::Symbol;
pub use value::{BuiltIn, PrintStyle, ReaderMacro, Seq, SpecialForm, Value};

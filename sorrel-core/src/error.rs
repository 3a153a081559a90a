// sorrel-core - Error and result types for the Sorrel evaluator
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Error types and the tri-state evaluation result.
//!
//! Every evaluation step produces an [`EvalResult`]: a value, a recur-signal
//! carrying already-evaluated arguments for the enclosing trampoline, or an
//! [`EvalError`]. Helpers that cannot produce a recur-signal return the plain
//! [`Result`] alias so they can use `?`.

use std::borrow::Cow;
use std::fmt;

use thiserror::Error;

use crate::value::Value;

/// Result type for evaluation helpers that never produce a recur-signal.
pub type Result<T> = std::result::Result<T, EvalError>;

/// Name of the form or builtin an error originated in.
pub type Origin = Cow<'static, str>;

/// Errors produced while expanding reader macros.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("reader macro '{0}' has no matching form")]
    UnmatchedReaderMacro(&'static str),
    #[error("illegal form: {0}")]
    IllegalForm(String),
    #[error("unquote-splice used outside of a collection")]
    UnquoteSpliceMisuse,
    #[error("{message} at {line}:{column}")]
    Parse {
        message: String,
        line: usize,
        column: usize,
    },
}

/// Discriminant of an [`EvalError`], used for matching without fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Arity,
    InvalidArgument,
    OutOfBounds,
    NotEvalable,
    DivideByZero,
    IntegerOverflow,
    BindingMismatch,
    InvalidSymbol,
    QualifiedSymbolMisuse,
    RecurMisuse,
    EvaluatingMacro,
    EvaluatingSpecialForm,
    NoFnArities,
    MultipleVariadicArities,
    MultipleDefinitionsPerArity,
    FixedArityExceedsVariableArity,
    Read,
    VarRebinding,
    AliasRebinding,
    InvalidNamespace,
    ReservedNamespace,
    Runtime,
    MaxDepthExceeded,
}

/// Errors that can occur during evaluation.
#[derive(Debug, Clone, Error)]
pub enum EvalError {
    #[error("{origin}: wrong number of arguments (expected {expected}, got {actual})")]
    Arity {
        origin: Origin,
        expected: Cow<'static, str>,
        actual: usize,
    },
    #[error("{origin}: invalid argument: {message}")]
    InvalidArgument { origin: Origin, message: String },
    #[error("{origin}: index {index} is out of bounds")]
    OutOfBounds { origin: Origin, index: i64 },
    #[error("cannot call {form} as a function")]
    NotEvalable { form: String },
    #[error("{origin}: divide by zero")]
    DivideByZero { origin: Origin },
    #[error("{origin}: integer overflow")]
    IntegerOverflow { origin: Origin },
    #[error("{origin}: binding vector requires an even number of forms")]
    BindingMismatch { origin: Origin },
    #[error("unable to resolve symbol: {symbol}")]
    InvalidSymbol { symbol: String },
    #[error("{origin}: qualified symbol {symbol} cannot be used here")]
    QualifiedSymbolMisuse { origin: Origin, symbol: String },
    #[error("{origin}: {message}")]
    RecurMisuse { origin: Origin, message: Cow<'static, str> },
    #[error("cannot take the value of macro {name}")]
    EvaluatingMacro { name: String },
    #[error("cannot take the value of special form {name}")]
    EvaluatingSpecialForm { name: String },
    #[error("{origin}: no arities were defined")]
    NoFnArities { origin: Origin },
    #[error("{origin}: more than one variadic arity was defined")]
    MultipleVariadicArities { origin: Origin },
    #[error("{origin}: arity {arity} was defined more than once")]
    MultipleDefinitionsPerArity { origin: Origin, arity: usize },
    #[error(
        "{origin}: fixed arity {fixed} has more parameters than the variadic arity ({variadic})"
    )]
    FixedArityExceedsVariableArity {
        origin: Origin,
        fixed: usize,
        variadic: usize,
    },
    #[error("read error: {0}")]
    Read(#[from] ReadError),
    #[error("cannot rebind {name}: it was referred from another namespace")]
    VarRebinding { name: String },
    #[error("alias {alias} already refers to a different namespace")]
    AliasRebinding { alias: String },
    #[error("no such namespace: {name}")]
    InvalidNamespace { name: String },
    #[error("namespace {name} is reserved")]
    ReservedNamespace { name: String },
    #[error("{message}")]
    Runtime { message: String },
    #[error("maximum evaluation depth ({limit}) exceeded")]
    MaxDepthExceeded { limit: usize },
}

impl EvalError {
    /// The discriminant of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            EvalError::Arity { .. } => ErrorKind::Arity,
            EvalError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            EvalError::OutOfBounds { .. } => ErrorKind::OutOfBounds,
            EvalError::NotEvalable { .. } => ErrorKind::NotEvalable,
            EvalError::DivideByZero { .. } => ErrorKind::DivideByZero,
            EvalError::IntegerOverflow { .. } => ErrorKind::IntegerOverflow,
            EvalError::BindingMismatch { .. } => ErrorKind::BindingMismatch,
            EvalError::InvalidSymbol { .. } => ErrorKind::InvalidSymbol,
            EvalError::QualifiedSymbolMisuse { .. } => ErrorKind::QualifiedSymbolMisuse,
            EvalError::RecurMisuse { .. } => ErrorKind::RecurMisuse,
            EvalError::EvaluatingMacro { .. } => ErrorKind::EvaluatingMacro,
            EvalError::EvaluatingSpecialForm { .. } => ErrorKind::EvaluatingSpecialForm,
            EvalError::NoFnArities { .. } => ErrorKind::NoFnArities,
            EvalError::MultipleVariadicArities { .. } => ErrorKind::MultipleVariadicArities,
            EvalError::MultipleDefinitionsPerArity { .. } => {
                ErrorKind::MultipleDefinitionsPerArity
            }
            EvalError::FixedArityExceedsVariableArity { .. } => {
                ErrorKind::FixedArityExceedsVariableArity
            }
            EvalError::Read(_) => ErrorKind::Read,
            EvalError::VarRebinding { .. } => ErrorKind::VarRebinding,
            EvalError::AliasRebinding { .. } => ErrorKind::AliasRebinding,
            EvalError::InvalidNamespace { .. } => ErrorKind::InvalidNamespace,
            EvalError::ReservedNamespace { .. } => ErrorKind::ReservedNamespace,
            EvalError::Runtime { .. } => ErrorKind::Runtime,
            EvalError::MaxDepthExceeded { .. } => ErrorKind::MaxDepthExceeded,
        }
    }

    /// Create an arity error.
    pub fn arity(
        origin: impl Into<Origin>,
        expected: impl Into<Cow<'static, str>>,
        actual: usize,
    ) -> Self {
        EvalError::Arity {
            origin: origin.into(),
            expected: expected.into(),
            actual,
        }
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument(origin: impl Into<Origin>, message: impl Into<String>) -> Self {
        EvalError::InvalidArgument {
            origin: origin.into(),
            message: message.into(),
        }
    }

    pub fn out_of_bounds(origin: impl Into<Origin>, index: i64) -> Self {
        EvalError::OutOfBounds {
            origin: origin.into(),
            index,
        }
    }

    pub fn not_evalable(form: &Value) -> Self {
        EvalError::NotEvalable {
            form: form.to_string(),
        }
    }

    pub fn divide_by_zero(origin: impl Into<Origin>) -> Self {
        EvalError::DivideByZero {
            origin: origin.into(),
        }
    }

    pub fn overflow(origin: impl Into<Origin>) -> Self {
        EvalError::IntegerOverflow {
            origin: origin.into(),
        }
    }

    pub fn binding_mismatch(origin: impl Into<Origin>) -> Self {
        EvalError::BindingMismatch {
            origin: origin.into(),
        }
    }

    pub fn invalid_symbol(symbol: impl fmt::Display) -> Self {
        EvalError::InvalidSymbol {
            symbol: symbol.to_string(),
        }
    }

    pub fn qualified_symbol_misuse(origin: impl Into<Origin>, symbol: impl fmt::Display) -> Self {
        EvalError::QualifiedSymbolMisuse {
            origin: origin.into(),
            symbol: symbol.to_string(),
        }
    }

    pub fn recur_misuse(
        origin: impl Into<Origin>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        EvalError::RecurMisuse {
            origin: origin.into(),
            message: message.into(),
        }
    }

    pub fn invalid_namespace(name: impl fmt::Display) -> Self {
        EvalError::InvalidNamespace {
            name: name.to_string(),
        }
    }

    /// A user-triggered error with a custom message.
    pub fn runtime(message: impl Into<String>) -> Self {
        EvalError::Runtime {
            message: message.into(),
        }
    }

    /// Type mismatch on a builtin argument, reported as an invalid argument.
    pub fn type_error(origin: impl Into<Origin>, expected: &str, got: &Value) -> Self {
        EvalError::invalid_argument(
            origin,
            format!("expected {}, got {}", expected, got.type_name()),
        )
    }
}

/// Outcome of evaluating a form.
#[derive(Debug, Clone)]
#[must_use]
pub enum EvalResult {
    Success(Value),
    /// Arguments for the innermost enclosing `fn` or `loop` trampoline.
    Recur(Vec<Value>),
    Failure(EvalError),
}

impl EvalResult {
    /// Chain another step after a successful value. Recur-signals and
    /// failures pass through untouched.
    pub fn then(self, f: impl FnOnce(Value) -> EvalResult) -> EvalResult {
        match self {
            EvalResult::Success(value) => f(value),
            other => other,
        }
    }

    pub fn map(self, f: impl FnOnce(Value) -> Value) -> EvalResult {
        self.then(|value| EvalResult::Success(f(value)))
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, EvalResult::Success(_))
    }

    #[must_use]
    pub fn is_recur(&self) -> bool {
        matches!(self, EvalResult::Recur(_))
    }

    /// Convert to a plain result, treating a recur-signal as misuse by
    /// `origin`.
    pub fn into_value(self, origin: impl Into<Origin>) -> Result<Value> {
        match self {
            EvalResult::Success(value) => Ok(value),
            EvalResult::Recur(_) => Err(EvalError::recur_misuse(
                origin,
                "recur can only appear in the tail position of a fn or loop body",
            )),
            EvalResult::Failure(err) => Err(err),
        }
    }

    /// The error, if this is a failure.
    #[must_use]
    pub fn err(&self) -> Option<&EvalError> {
        match self {
            EvalResult::Failure(err) => Some(err),
            _ => None,
        }
    }
}

impl From<Result<Value>> for EvalResult {
    fn from(result: Result<Value>) -> Self {
        match result {
            Ok(value) => EvalResult::Success(value),
            Err(err) => EvalResult::Failure(err),
        }
    }
}

impl From<EvalError> for EvalResult {
    fn from(err: EvalError) -> Self {
        EvalResult::Failure(err)
    }
}

/// Unwrap a `Result` inside a function returning [`EvalResult`], returning
/// the failure early.
macro_rules! try_eval {
    ($expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(err) => return $crate::error::EvalResult::Failure(err.into()),
        }
    };
}

pub(crate) use try_eval;

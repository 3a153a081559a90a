// sorrel-embed - Interpreter implementation
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! The Interpreter struct - main entry point for embedding Sorrel.

use std::path::Path;
use std::rc::Rc;

use sorrel_core::{
    EvalError, EvalResult, Host, InterpreterConfig, Namespace, Result, Runtime, Symbol, Value,
    Var, eval_form,
};
use sorrel_reader::{Reader, read_all};
use tracing::debug;

/// The Sorrel interpreter.
///
/// Owns a [`Runtime`] with the builtins installed and the source reader
/// hooked up for `read` and `read-string`.
///
/// # Thread Safety
///
/// **`Interpreter` is NOT thread-safe.** Values share state through `Rc`
/// and `RefCell`. Create one interpreter per thread.
///
/// # Example
///
/// ```rust
/// use sorrel_embed::Interpreter;
///
/// let interp = Interpreter::new().unwrap();
/// let result = interp.evaluate("(+ 1 2 3)");
/// assert_eq!(Interpreter::describe(&result), "6");
/// ```
pub struct Interpreter {
    runtime: Runtime,
}

impl Interpreter {
    /// Create an interpreter with the default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(InterpreterConfig::default())
    }

    pub fn with_config(config: InterpreterConfig) -> Result<Self> {
        let runtime = Runtime::new(config)?;
        runtime.set_reader(Rc::new(Reader));
        Ok(Interpreter { runtime })
    }

    /// Read and evaluate every form in `text`, returning the value of the
    /// last one. Empty input evaluates to nil; the first failure stops
    /// evaluation.
    ///
    /// ```rust
    /// use sorrel_embed::Interpreter;
    ///
    /// let interp = Interpreter::new().unwrap();
    /// let result = interp.evaluate("(def x 42) (* x 2)");
    /// assert_eq!(Interpreter::describe(&result), "84");
    /// ```
    pub fn evaluate(&self, text: &str) -> EvalResult {
        let forms = match read_all(text) {
            Ok(forms) => forms,
            Err(err) => return EvalError::Read(err.into()).into(),
        };
        debug!(forms = forms.len(), "evaluating source");
        let mut result = Value::Nil;
        for form in &forms {
            match self.evaluate_value(form) {
                EvalResult::Success(value) => result = value,
                other => return other,
            }
        }
        EvalResult::Success(result)
    }

    /// Evaluate one already-read form.
    pub fn evaluate_value(&self, form: &Value) -> EvalResult {
        eval_form(form, &self.runtime.root_context()).into()
    }

    /// Evaluate a source file.
    pub fn evaluate_file(&self, path: impl AsRef<Path>) -> EvalResult {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => self.evaluate(&text),
            Err(err) => EvalError::runtime(format!("cannot read {}: {}", path.display(), err)).into(),
        }
    }

    /// The bound value of `name` as seen from the current namespace.
    ///
    /// Returns `None` if the symbol resolves to nothing or to an unbound
    /// Var.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        self.runtime
            .registry()
            .resolve(&Symbol::parse(name))
            .and_then(|var| var.get())
    }

    /// Bind `name` in the current namespace.
    pub fn define(&self, name: &str, value: Value) -> Result<Var> {
        self.runtime.registry().set_var(&Symbol::new(name), value)
    }

    #[must_use]
    pub fn current_namespace(&self) -> Namespace {
        self.runtime.registry().current()
    }

    /// Route `print`, `println` and `read` through `host`.
    pub fn set_host(&self, host: Rc<dyn Host>) {
        self.runtime.set_host(host);
    }

    #[must_use]
    pub fn config(&self) -> &InterpreterConfig {
        self.runtime.config()
    }

    /// Get access to the underlying runtime.
    #[must_use]
    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// A one-line description of a result for display: the readable form
    /// of a value, or the error message.
    #[must_use]
    pub fn describe(result: &EvalResult) -> String {
        match result {
            EvalResult::Success(value) => value.to_string(),
            EvalResult::Recur(_) => "error: recur outside of a fn or loop body".to_string(),
            EvalResult::Failure(err) => format!("error: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sorrel_core::ErrorKind;

    #[test]
    fn test_evaluate_returns_last_value() {
        let interp = Interpreter::new().unwrap();
        let result = interp.evaluate("1 2 (+ 1 2)");
        assert!(matches!(result, EvalResult::Success(Value::Int(3))));
        assert!(matches!(interp.evaluate(""), EvalResult::Success(Value::Nil)));
    }

    #[test]
    fn test_parse_errors_are_read_errors() {
        let interp = Interpreter::new().unwrap();
        let result = interp.evaluate("(+ 1");
        assert_eq!(result.err().map(EvalError::kind), Some(ErrorKind::Read));
    }

    #[test]
    fn test_define_and_get() {
        let interp = Interpreter::new().unwrap();
        interp.define("answer", Value::Int(42)).unwrap();
        assert_eq!(interp.get("answer"), Some(Value::Int(42)));
        assert_eq!(interp.get("user/answer"), Some(Value::Int(42)));
        assert!(interp.get("missing").is_none());
        assert!(interp.get("inc").is_some());
    }

    #[test]
    fn test_describe() {
        let interp = Interpreter::new().unwrap();
        assert_eq!(Interpreter::describe(&interp.evaluate("\"s\"")), "\"s\"");
        let failure = interp.evaluate("(error \"boom\")");
        assert_eq!(Interpreter::describe(&failure), "error: boom");
    }

    #[test]
    fn test_with_config() {
        let config = InterpreterConfig::default().with_default_namespace("scratch");
        let interp = Interpreter::with_config(config).unwrap();
        assert_eq!(interp.current_namespace().name(), "scratch");
    }
}

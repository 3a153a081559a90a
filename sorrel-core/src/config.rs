// sorrel-core - Interpreter configuration
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Interpreter configuration.

/// Settings fixed when an interpreter is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Maximum nesting of evaluation before failing with
    /// `MaxDepthExceeded`. Loops and tail calls through `recur` do not
    /// count against it.
    pub max_eval_depth: usize,
    /// Namespace made current at startup.
    pub default_namespace: String,
    /// Whether front ends print the value of each top-level form.
    pub echo_results: bool,
}

impl InterpreterConfig {
    pub const DEFAULT_MAX_EVAL_DEPTH: usize = 10_000;

    #[must_use]
    pub fn with_max_eval_depth(mut self, depth: usize) -> Self {
        self.max_eval_depth = depth;
        self
    }

    #[must_use]
    pub fn with_default_namespace(mut self, name: impl Into<String>) -> Self {
        self.default_namespace = name.into();
        self
    }

    #[must_use]
    pub fn with_echo_results(mut self, echo: bool) -> Self {
        self.echo_results = echo;
        self
    }
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            max_eval_depth: Self::DEFAULT_MAX_EVAL_DEPTH,
            default_namespace: "user".to_string(),
            echo_results: true,
        }
    }
}

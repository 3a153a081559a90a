// sorrel-core - Per-interpreter runtime state
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! State shared by every context of one interpreter: the namespace
//! registry, the gensym counter, the host hooks, the source reader used by
//! `read-string`, and the evaluation depth counter.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

use crate::config::InterpreterConfig;
use crate::context::Context;
use crate::error::{EvalError, ReadError, Result};
use crate::namespace::NamespaceRegistry;
use crate::symbol::Symbol;
use crate::value::Value;

/// Process I/O used by the `print`, `println` and `read` builtins.
pub trait Host {
    /// Write text without adding a newline.
    fn print(&self, text: &str) -> io::Result<()>;

    /// Read one line without its terminator; `None` at end of input.
    fn read_line(&self) -> io::Result<Option<String>>;
}

/// [`Host`] backed by the process's stdin and stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdHost;

impl Host for StdHost {
    fn print(&self, text: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        stdout.flush()
    }

    fn read_line(&self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

/// Turns source text into raw, unexpanded forms.
///
/// The core crate has no parser of its own; front ends install one so that
/// `read` and `read-string` work.
pub trait SourceReader {
    fn read(&self, text: &str) -> std::result::Result<Vec<Value>, ReadError>;
}

/// Shared handle to an interpreter's runtime state.
#[derive(Clone)]
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

struct RuntimeInner {
    registry: NamespaceRegistry,
    config: InterpreterConfig,
    gensym_counter: Cell<u64>,
    depth: Cell<usize>,
    host: RefCell<Rc<dyn Host>>,
    reader: RefCell<Option<Rc<dyn SourceReader>>>,
}

impl Runtime {
    /// Create a runtime with the builtins installed in `core` and the
    /// configured default namespace current.
    pub fn new(config: InterpreterConfig) -> Result<Self> {
        let registry = NamespaceRegistry::new();
        crate::builtins::install(&registry);
        let default_ns = registry.create(&config.default_namespace);
        registry.set_current(&default_ns)?;
        Ok(Runtime {
            inner: Rc::new(RuntimeInner {
                registry,
                config,
                gensym_counter: Cell::new(0),
                depth: Cell::new(0),
                host: RefCell::new(Rc::new(StdHost)),
                reader: RefCell::new(None),
            }),
        })
    }

    #[inline]
    #[must_use]
    pub fn registry(&self) -> &NamespaceRegistry {
        &self.inner.registry
    }

    #[must_use]
    pub fn config(&self) -> &InterpreterConfig {
        &self.inner.config
    }

    /// A fresh root context evaluating against this runtime.
    #[must_use]
    pub fn root_context(&self) -> Context {
        Context::root(self.clone())
    }

    /// Next value of the gensym counter; unique for the interpreter's
    /// lifetime.
    pub fn next_gensym_id(&self) -> u64 {
        let id = self.inner.gensym_counter.get() + 1;
        self.inner.gensym_counter.set(id);
        id
    }

    /// A fresh unqualified symbol `<prefix><n>`.
    pub fn gensym(&self, prefix: &str) -> Symbol {
        Symbol::new(&format!("{}{}", prefix, self.next_gensym_id()))
    }

    #[must_use]
    pub fn host(&self) -> Rc<dyn Host> {
        self.inner.host.borrow().clone()
    }

    pub fn set_host(&self, host: Rc<dyn Host>) {
        *self.inner.host.borrow_mut() = host;
    }

    #[must_use]
    pub fn reader(&self) -> Option<Rc<dyn SourceReader>> {
        self.inner.reader.borrow().clone()
    }

    pub fn set_reader(&self, reader: Rc<dyn SourceReader>) {
        *self.inner.reader.borrow_mut() = Some(reader);
    }

    /// Current evaluation nesting.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.inner.depth.get()
    }

    /// Enter one level of evaluation, failing once the configured maximum
    /// is exceeded. The level is left when the guard drops.
    pub(crate) fn enter(&self) -> Result<DepthGuard<'_>> {
        let depth = &self.inner.depth;
        let next = depth.get() + 1;
        let limit = self.inner.config.max_eval_depth;
        if next > limit {
            return Err(EvalError::MaxDepthExceeded { limit });
        }
        depth.set(next);
        Ok(DepthGuard { depth })
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("registry", &self.inner.registry)
            .field("config", &self.inner.config)
            .field("depth", &self.inner.depth.get())
            .finish_non_exhaustive()
    }
}

/// RAII guard for one level of evaluation depth.
pub(crate) struct DepthGuard<'a> {
    depth: &'a Cell<usize>,
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}

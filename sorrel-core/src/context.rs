// sorrel-core - Lexical contexts
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Lexical scoping.
//!
//! A [`Context`] maps names to [`Binding`]s and optionally points at a
//! parent. Contexts are immutable once built: `let`, `loop` and function
//! calls create a child instead of mutating. Names missing from every local
//! scope are resolved through the current namespace of the runtime the
//! root context holds, so `def` always lands in the registry regardless of
//! nesting.

use std::fmt;
use std::rc::Rc;

use im::HashMap;

use crate::function::Macro;
use crate::namespace::{NamespaceRegistry, Var};
use crate::runtime::Runtime;
use crate::symbol::Symbol;
use crate::value::Value;

/// What a name is bound to.
#[derive(Clone)]
pub enum Binding {
    /// A `let` or `loop` local.
    Literal(Value),
    /// A function parameter.
    FunctionParam(Value),
    /// A macro parameter. Holds the raw, unevaluated argument form.
    MacroParam(Value),
    /// A Var or local holding a macro.
    BoundMacro(Rc<Macro>),
    /// A declared but unbound Var.
    Unbound(Var),
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Literal(v) => write!(f, "Literal({})", v),
            Binding::FunctionParam(v) => write!(f, "FunctionParam({})", v),
            Binding::MacroParam(v) => write!(f, "MacroParam({})", v),
            Binding::BoundMacro(m) => write!(f, "BoundMacro({})", m.name()),
            Binding::Unbound(var) => write!(f, "Unbound({})", var),
        }
    }
}

/// Whether macro parameters read as their raw forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextMode {
    Normal,
    /// Inside a macro body.
    Macro,
}

/// Bindings for one scope.
pub type Bindings = HashMap<Symbol, Binding>;

/// A scope in the lexical chain.
#[derive(Clone)]
pub struct Context {
    inner: Rc<ContextInner>,
}

struct ContextInner {
    bindings: Bindings,
    parent: Option<Context>,
    mode: ContextMode,
    runtime: Runtime,
}

impl Context {
    /// A root context with no local bindings.
    pub(crate) fn root(runtime: Runtime) -> Self {
        Context {
            inner: Rc::new(ContextInner {
                bindings: Bindings::new(),
                parent: None,
                mode: ContextMode::Normal,
                runtime,
            }),
        }
    }

    /// A child scope in the same mode.
    #[must_use]
    pub fn child(&self, bindings: Bindings) -> Self {
        self.child_with_mode(bindings, self.inner.mode)
    }

    /// A child scope in an explicit mode, as used for function and macro
    /// calls.
    #[must_use]
    pub fn child_with_mode(&self, bindings: Bindings, mode: ContextMode) -> Self {
        Context {
            inner: Rc::new(ContextInner {
                bindings,
                parent: Some(self.clone()),
                mode,
                runtime: self.inner.runtime.clone(),
            }),
        }
    }

    #[inline]
    #[must_use]
    pub fn runtime(&self) -> &Runtime {
        &self.inner.runtime
    }

    #[inline]
    #[must_use]
    pub fn registry(&self) -> &NamespaceRegistry {
        self.inner.runtime.registry()
    }

    #[inline]
    #[must_use]
    pub fn mode(&self) -> ContextMode {
        self.inner.mode
    }

    /// Find the binding for `sym`: local scopes innermost first, then the
    /// current namespace. Qualified symbols skip local scopes.
    #[must_use]
    pub fn lookup(&self, sym: &Symbol) -> Option<Binding> {
        if !sym.is_qualified() {
            let mut current = Some(self);
            while let Some(ctx) = current {
                if let Some(binding) = ctx.inner.bindings.get(sym) {
                    return Some(binding.clone());
                }
                current = ctx.inner.parent.as_ref();
            }
        }
        let var = self.registry().resolve(sym)?;
        Some(match var.get() {
            None => Binding::Unbound(var),
            Some(Value::Macro(m)) => Binding::BoundMacro(m),
            Some(value) => Binding::Literal(value),
        })
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut depth = 0;
        let mut current = self.inner.parent.as_ref();
        while let Some(ctx) = current {
            depth += 1;
            current = ctx.inner.parent.as_ref();
        }
        f.debug_struct("Context")
            .field("locals", &self.inner.bindings.len())
            .field("depth", &depth)
            .field("mode", &self.inner.mode)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InterpreterConfig;

    fn root() -> Context {
        Runtime::new(InterpreterConfig::default())
            .unwrap()
            .root_context()
    }

    fn bind(name: &str, value: Value) -> Bindings {
        Bindings::unit(Symbol::new(name), Binding::Literal(value))
    }

    #[test]
    fn test_child_shadows_parent() {
        let ctx = root();
        let outer = ctx.child(bind("x", Value::Int(1)));
        let inner = outer.child(bind("x", Value::Int(2)));
        assert!(matches!(
            inner.lookup(&Symbol::new("x")),
            Some(Binding::Literal(Value::Int(2)))
        ));
        assert!(matches!(
            outer.lookup(&Symbol::new("x")),
            Some(Binding::Literal(Value::Int(1)))
        ));
    }

    #[test]
    fn test_falls_back_to_namespace() {
        let ctx = root();
        ctx.registry()
            .set_var(&Symbol::new("y"), Value::Int(5))
            .unwrap();
        let child = ctx.child(Bindings::new());
        assert!(matches!(
            child.lookup(&Symbol::new("y")),
            Some(Binding::Literal(Value::Int(5)))
        ));
        assert!(child.lookup(&Symbol::new("nope")).is_none());
    }

    #[test]
    fn test_unbound_var_binding() {
        let ctx = root();
        ctx.registry().set_unbound_var(&Symbol::new("z")).unwrap();
        assert!(matches!(
            ctx.lookup(&Symbol::new("z")),
            Some(Binding::Unbound(_))
        ));
    }

    #[test]
    fn test_mode_is_inherited() {
        let ctx = root().child_with_mode(Bindings::new(), ContextMode::Macro);
        assert_eq!(ctx.child(Bindings::new()).mode(), ContextMode::Macro);
    }

    #[test]
    fn test_qualified_symbols_skip_locals() {
        let ctx = root();
        ctx.registry()
            .set_var(&Symbol::new("q"), Value::Int(1))
            .unwrap();
        let child = ctx.child(bind("q", Value::Int(2)));
        assert!(matches!(
            child.lookup(&Symbol::parse("user/q")),
            Some(Binding::Literal(Value::Int(1)))
        ));
    }
}

// sorrel-core - Namespace system for global bindings
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Namespaces and Vars.
//!
//! A [`Namespace`] owns the Vars interned in it, the Vars it refers from
//! other namespaces, and aliases naming other namespaces. Namespaces live
//! in a [`NamespaceRegistry`] keyed by name, together with the mutable
//! current-namespace pointer. Every registry mutation goes through the
//! operations on the registry so the rebinding rules are enforced in one
//! place.
//!
//! Removing a namespace only detaches it from the registry: looking it up
//! by name fails afterwards, but a [`Namespace`] value captured earlier
//! keeps working.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::error::{EvalError, Result};
use crate::symbol::Symbol;
use crate::value::{UnboundVar, Value};

// ============================================================================
// Var
// ============================================================================

/// A named, mutable single-slot cell owned by a namespace.
///
/// A Var starts out unbound. Reading an unbound Var yields an
/// [`UnboundVar`] sentinel rather than an error.
#[derive(Clone)]
pub struct Var {
    inner: Rc<VarInner>,
}

struct VarInner {
    namespace: Rc<str>,
    name: Symbol,
    slot: RefCell<Option<Value>>,
}

impl Var {
    pub(crate) fn new(namespace: Rc<str>, name: Symbol) -> Self {
        Var {
            inner: Rc::new(VarInner {
                namespace,
                name,
                slot: RefCell::new(None),
            }),
        }
    }

    /// The unqualified name.
    #[must_use]
    pub fn name(&self) -> &Symbol {
        &self.inner.name
    }

    /// Name of the namespace the Var was interned in.
    #[must_use]
    pub fn namespace_name(&self) -> &str {
        &self.inner.namespace
    }

    /// `ns/name` as a symbol.
    #[must_use]
    pub fn qualified_name(&self) -> Symbol {
        Symbol::qualified(&self.inner.namespace, self.inner.name.name())
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.inner.slot.borrow().is_some()
    }

    /// The bound value, if any.
    #[must_use]
    pub fn get(&self) -> Option<Value> {
        self.inner.slot.borrow().clone()
    }

    /// The bound value, or the unbound sentinel.
    #[must_use]
    pub fn value(&self) -> Value {
        match self.get() {
            Some(value) => value,
            None => Value::auxiliary(UnboundVar::new(self.clone())),
        }
    }

    pub(crate) fn bind(&self, value: Value) {
        *self.inner.slot.borrow_mut() = Some(value);
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Var) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Address-based identity used for hashing.
    pub(crate) fn identity(&self) -> usize {
        Rc::as_ptr(&self.inner) as usize
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#'{}/{}", self.inner.namespace, self.inner.name)
    }
}

impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Var({}/{}", self.inner.namespace, self.inner.name)?;
        if !self.is_bound() {
            write!(f, ", unbound")?;
        }
        write!(f, ")")
    }
}

// ============================================================================
// Namespace
// ============================================================================

/// A named container of Vars, refers and aliases.
#[derive(Clone)]
pub struct Namespace {
    inner: Rc<NamespaceInner>,
}

struct NamespaceInner {
    name: Rc<str>,
    /// Set once the namespace has been removed from its registry.
    deleted: Cell<bool>,
    state: RefCell<NamespaceState>,
}

#[derive(Default)]
struct NamespaceState {
    vars: HashMap<Symbol, Var>,
    refers: HashMap<Symbol, Var>,
    aliases: HashMap<Symbol, Namespace>,
    /// Aliases naming this namespace itself, kept apart so the namespace
    /// never holds a reference to itself.
    self_aliases: HashSet<Symbol>,
}

impl Namespace {
    fn new(name: &str) -> Self {
        Namespace {
            inner: Rc::new(NamespaceInner {
                name: Rc::from(name),
                deleted: Cell::new(false),
                state: RefCell::new(NamespaceState::default()),
            }),
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Whether the namespace has been removed from its registry.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.inner.deleted.get()
    }

    /// Look up a Var interned in this namespace. Refers are not consulted.
    #[must_use]
    pub fn find_var(&self, name: &Symbol) -> Option<Var> {
        self.inner.state.borrow().vars.get(name).cloned()
    }

    /// Look up a referred Var.
    #[must_use]
    pub fn find_refer(&self, name: &Symbol) -> Option<Var> {
        self.inner.state.borrow().refers.get(name).cloned()
    }

    /// Resolve an unqualified name: interned Vars first, then refers.
    #[must_use]
    pub fn lookup(&self, name: &Symbol) -> Option<Var> {
        let state = self.inner.state.borrow();
        state
            .vars
            .get(name)
            .or_else(|| state.refers.get(name))
            .cloned()
    }

    /// The namespace an alias points to, including aliases naming this
    /// namespace itself.
    #[must_use]
    pub fn alias_target(&self, alias: &Symbol) -> Option<Namespace> {
        let state = self.inner.state.borrow();
        if let Some(target) = state.aliases.get(alias) {
            return Some(target.clone());
        }
        state.self_aliases.contains(alias).then(|| self.clone())
    }

    /// Snapshot of interned Vars.
    #[must_use]
    pub fn interns(&self) -> Vec<Var> {
        self.inner.state.borrow().vars.values().cloned().collect()
    }

    /// Snapshot of referred Vars.
    #[must_use]
    pub fn refers(&self) -> Vec<Var> {
        self.inner.state.borrow().refers.values().cloned().collect()
    }

    /// Snapshot of aliases.
    #[must_use]
    pub fn aliases(&self) -> Vec<(Symbol, Namespace)> {
        let state = self.inner.state.borrow();
        let mut out: Vec<_> = state
            .aliases
            .iter()
            .map(|(alias, ns)| (alias.clone(), ns.clone()))
            .collect();
        out.extend(
            state
                .self_aliases
                .iter()
                .map(|alias| (alias.clone(), self.clone())),
        );
        out
    }

    /// Get or create the Var for `name` in this namespace.
    fn intern(&self, name: &Symbol) -> Var {
        let mut state = self.inner.state.borrow_mut();
        state
            .vars
            .entry(name.clone())
            .or_insert_with(|| Var::new(self.inner.name.clone(), name.clone()))
            .clone()
    }

    fn remove_refer(&self, name: &Symbol) -> Option<Var> {
        self.inner.state.borrow_mut().refers.remove(name)
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Namespace) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn identity(&self) -> usize {
        Rc::as_ptr(&self.inner) as usize
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Namespace")
            .field("name", &self.inner.name)
            .field("deleted", &self.is_deleted())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Registry
// ============================================================================

/// All namespaces of one interpreter plus the current-namespace pointer.
#[derive(Clone)]
pub struct NamespaceRegistry {
    inner: Rc<RegistryInner>,
}

struct RegistryInner {
    namespaces: RefCell<HashMap<Rc<str>, Namespace>>,
    current: RefCell<Namespace>,
    core: Namespace,
}

impl NamespaceRegistry {
    /// Name of the system namespace holding the builtins.
    pub const CORE_NS: &'static str = "core";

    /// Create a registry containing only the system namespace, which is
    /// also current until [`set_current`](Self::set_current) is called.
    pub fn new() -> Self {
        let core = Namespace::new(Self::CORE_NS);
        let mut namespaces = HashMap::new();
        namespaces.insert(core.inner.name.clone(), core.clone());
        NamespaceRegistry {
            inner: Rc::new(RegistryInner {
                namespaces: RefCell::new(namespaces),
                current: RefCell::new(core.clone()),
                core,
            }),
        }
    }

    /// The system namespace.
    #[must_use]
    pub fn core(&self) -> &Namespace {
        &self.inner.core
    }

    #[must_use]
    pub fn current(&self) -> Namespace {
        self.inner.current.borrow().clone()
    }

    #[must_use]
    pub fn is_core(&self, ns: &Namespace) -> bool {
        ns.ptr_eq(&self.inner.core)
    }

    /// Find a registered namespace by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<Namespace> {
        self.inner.namespaces.borrow().get(name).cloned()
    }

    /// Every registered namespace.
    #[must_use]
    pub fn all(&self) -> Vec<Namespace> {
        self.inner.namespaces.borrow().values().cloned().collect()
    }

    /// Get or create a namespace. New namespaces refer every Var of the
    /// system namespace.
    pub fn create(&self, name: &str) -> Namespace {
        if let Some(ns) = self.find(name) {
            return ns;
        }
        let ns = Namespace::new(name);
        {
            let mut state = ns.inner.state.borrow_mut();
            for var in self.inner.core.interns() {
                state.refers.insert(var.name().clone(), var);
            }
        }
        self.inner
            .namespaces
            .borrow_mut()
            .insert(ns.inner.name.clone(), ns.clone());
        debug!(namespace = name, "created namespace");
        ns
    }

    /// Make `ns` current. The system namespace cannot be made current.
    pub fn set_current(&self, ns: &Namespace) -> Result<()> {
        if self.is_core(ns) {
            return Err(EvalError::ReservedNamespace {
                name: ns.name().to_string(),
            });
        }
        if ns.is_deleted() {
            return Err(EvalError::invalid_namespace(ns.name()));
        }
        debug!(namespace = ns.name(), "switched namespace");
        *self.inner.current.borrow_mut() = ns.clone();
        Ok(())
    }

    /// Turn a symbol or namespace value into a namespace.
    ///
    /// A namespace value is always accepted, even after removal. A symbol
    /// must name a registered namespace.
    pub fn namespace_of(&self, value: &Value, origin: &'static str) -> Result<Namespace> {
        match value {
            Value::Namespace(ns) => Ok(ns.clone()),
            Value::Symbol(sym) => self
                .find(sym.name())
                .ok_or_else(|| EvalError::invalid_namespace(sym)),
            other => Err(EvalError::type_error(
                origin,
                "a symbol or namespace",
                other,
            )),
        }
    }

    /// Detach a namespace from the registry. Returns `false` if it was not
    /// registered.
    pub fn remove(&self, ns: &Namespace) -> Result<bool> {
        if self.is_core(ns) {
            return Err(EvalError::ReservedNamespace {
                name: ns.name().to_string(),
            });
        }
        if ns.ptr_eq(&self.current()) {
            return Err(EvalError::invalid_argument(
                "ns-remove",
                "cannot remove the current namespace",
            ));
        }
        let removed = {
            let mut namespaces = self.inner.namespaces.borrow_mut();
            match namespaces.get(ns.name()) {
                Some(registered) if registered.ptr_eq(ns) => {
                    namespaces.remove(ns.name());
                    true
                }
                _ => false,
            }
        };
        if removed {
            ns.inner.deleted.set(true);
            let mut state = ns.inner.state.borrow_mut();
            state.aliases.clear();
            state.self_aliases.clear();
            debug!(namespace = ns.name(), "removed namespace");
        }
        Ok(removed)
    }

    /// Alias `target` as `alias` in the current namespace.
    pub fn alias(&self, alias: &Symbol, target: &Namespace) -> Result<()> {
        if alias.is_qualified() {
            return Err(EvalError::qualified_symbol_misuse("ns-alias", alias));
        }
        if target.is_deleted() {
            return Err(EvalError::invalid_namespace(target.name()));
        }
        let current = self.current();
        if let Some(existing) = current.alias_target(alias) {
            if existing.ptr_eq(target) {
                return Ok(());
            }
            return Err(EvalError::AliasRebinding {
                alias: alias.to_string(),
            });
        }
        let mut state = current.inner.state.borrow_mut();
        if target.ptr_eq(&current) {
            state.self_aliases.insert(alias.clone());
        } else {
            state.aliases.insert(alias.clone(), target.clone());
        }
        debug!(alias = %alias, target = target.name(), "added alias");
        Ok(())
    }

    /// Remove an alias from the current namespace. Unknown aliases are
    /// ignored.
    pub fn unalias(&self, alias: &Symbol) {
        let current = self.current();
        let mut state = current.inner.state.borrow_mut();
        state.aliases.remove(alias);
        state.self_aliases.remove(alias);
    }

    /// Remove the Var interned as `name` in `ns`. Refers are left alone and
    /// unknown names are ignored. The system namespace cannot be unmapped
    /// from.
    pub fn unmap(&self, ns: &Namespace, name: &Symbol) -> Result<Option<Var>> {
        if self.is_core(ns) {
            return Err(EvalError::ReservedNamespace {
                name: ns.name().to_string(),
            });
        }
        if name.is_qualified() {
            return Err(EvalError::qualified_symbol_misuse("ns-unmap", name));
        }
        let removed = ns.inner.state.borrow_mut().vars.remove(name);
        if removed.is_some() {
            debug!(namespace = ns.name(), name = %name, "unmapped var");
        }
        Ok(removed)
    }

    /// Refer every Var interned in `from` into the current namespace.
    ///
    /// Fails without changing anything if one of the names is already
    /// referred from a different namespace. A Var interned locally under a
    /// referred name is replaced by the refer.
    pub fn refer(&self, from: &Namespace) -> Result<()> {
        let current = self.current();
        if from.ptr_eq(&current) {
            return Ok(());
        }
        let incoming = from.interns();
        {
            let state = current.inner.state.borrow();
            for var in &incoming {
                if let Some(existing) = state.refers.get(var.name())
                    && existing.namespace_name() != from.name()
                {
                    return Err(EvalError::VarRebinding {
                        name: var.name().to_string(),
                    });
                }
            }
        }
        let mut state = current.inner.state.borrow_mut();
        for var in incoming {
            state.vars.remove(var.name());
            state.refers.insert(var.name().clone(), var);
        }
        debug!(from = from.name(), into = current.name(), "referred namespace");
        Ok(())
    }

    /// Resolve a symbol against the current namespace.
    ///
    /// The namespace a qualified symbol names is found through the current
    /// namespace's aliases, then the registry by name. The name is then
    /// looked up among that namespace's Vars, then its refers, so
    /// `user/inc` finds the `inc` that `user` refers from `core`.
    #[must_use]
    pub fn resolve(&self, sym: &Symbol) -> Option<Var> {
        self.resolve_in(&self.current(), sym)
    }

    /// Resolve a symbol as if `ns` were current.
    #[must_use]
    pub fn resolve_in(&self, ns: &Namespace, sym: &Symbol) -> Option<Var> {
        match sym.namespace() {
            None => ns.lookup(sym),
            Some(qualifier) if qualifier == ns.name() => ns.lookup(&sym.unqualified()),
            Some(qualifier) => {
                let target = ns
                    .alias_target(&Symbol::new(qualifier))
                    .or_else(|| self.find(qualifier))?;
                target.lookup(&sym.unqualified())
            }
        }
    }

    /// Check that `sym` may be defined in the current namespace and return
    /// its unqualified form.
    pub(crate) fn definable_name(&self, sym: &Symbol, origin: &'static str) -> Result<Symbol> {
        match sym.namespace() {
            None => Ok(sym.clone()),
            Some(qualifier) if qualifier == self.current().name() => Ok(sym.unqualified()),
            Some(_) => Err(EvalError::qualified_symbol_misuse(origin, sym)),
        }
    }

    /// Bind `sym` to `value` in the current namespace, creating the Var if
    /// needed.
    ///
    /// A name referred from the system namespace is shadowed by a new local
    /// Var; a name referred from any other namespace cannot be rebound.
    pub fn set_var(&self, sym: &Symbol, value: Value) -> Result<Var> {
        let name = self.definable_name(sym, "def")?;
        let current = self.current();
        if let Some(referred) = current.find_refer(&name) {
            if referred.namespace_name() != Self::CORE_NS {
                return Err(EvalError::VarRebinding {
                    name: referred.qualified_name().to_string(),
                });
            }
            warn!(
                name = %name,
                namespace = current.name(),
                "shadowing a core Var with a local definition"
            );
            current.remove_refer(&name);
        }
        let var = current.intern(&name);
        var.bind(value);
        debug!(var = %var, "bound var");
        Ok(var)
    }

    /// Declare `sym` in the current namespace without binding it. An
    /// already bound Var keeps its value.
    pub fn set_unbound_var(&self, sym: &Symbol) -> Result<Var> {
        let name = self.definable_name(sym, "def")?;
        let current = self.current();
        if let Some(referred) = current.find_refer(&name) {
            return Err(EvalError::VarRebinding {
                name: referred.qualified_name().to_string(),
            });
        }
        Ok(current.intern(&name))
    }

    /// Intern and bind a Var in the system namespace. Used while installing
    /// builtins.
    pub(crate) fn define_core(&self, name: &str, value: Value) -> Var {
        let var = self.inner.core.intern(&Symbol::new(name));
        var.bind(value);
        var
    }
}

impl Default for NamespaceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NamespaceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamespaceRegistry")
            .field("current", &self.current().name())
            .field("count", &self.inner.namespaces.borrow().len())
            .finish()
    }
}

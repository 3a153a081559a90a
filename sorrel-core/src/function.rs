// sorrel-core - User-defined functions and macros
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! User-defined functions and macros.
//!
//! Both are a set of [`SingleFn`] arity clauses plus the context they were
//! defined in. A call picks the clause by argument count: an exact fixed
//! arity wins, otherwise the variadic clause takes any count at least as
//! large as its fixed parameters.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::context::{Binding, Bindings, Context, ContextMode};
use crate::error::{EvalError, EvalResult, Origin, Result};
use crate::eval::trampoline::run_body;
use crate::symbol::Symbol;
use crate::value::Value;

/// One arity clause: parameters, an optional rest parameter, and a body.
#[derive(Debug, Clone)]
pub struct SingleFn {
    pub params: Vec<Symbol>,
    pub variadic: Option<Symbol>,
    pub body: Vec<Value>,
}

impl SingleFn {
    /// Number of fixed parameters.
    #[inline]
    #[must_use]
    pub fn fixed(&self) -> usize {
        self.params.len()
    }

    #[inline]
    #[must_use]
    pub fn is_variadic(&self) -> bool {
        self.variadic.is_some()
    }

    /// Bind call arguments. The caller has already checked the count; any
    /// arguments past the fixed parameters become a list on the rest
    /// parameter, or nil when there are none.
    fn bind_call(&self, mut args: Vec<Value>, wrap: fn(Value) -> Binding) -> Bindings {
        let rest = args.split_off(self.fixed().min(args.len()));
        let mut bindings: Bindings = self
            .params
            .iter()
            .cloned()
            .zip(args.into_iter().map(wrap))
            .collect();
        if let Some(variadic) = &self.variadic {
            let rest = if rest.is_empty() {
                Value::Nil
            } else {
                Value::list(rest)
            };
            bindings.insert(variadic.clone(), wrap(rest));
        }
        bindings
    }

    /// Bind values passed to `recur`. They bind directly: a variadic clause
    /// takes exactly one more value than it has fixed parameters, and that
    /// value is bound to the rest parameter as is.
    fn bind_recur(
        &self,
        values: Vec<Value>,
        origin: &Origin,
        wrap: fn(Value) -> Binding,
    ) -> Result<Bindings> {
        let expected = self.fixed() + usize::from(self.is_variadic());
        if values.len() != expected {
            return Err(EvalError::arity(
                origin.clone(),
                expected.to_string(),
                values.len(),
            ));
        }
        let names = self.params.iter().chain(self.variadic.iter()).cloned();
        Ok(names.zip(values.into_iter().map(wrap)).collect())
    }
}

/// Arity clauses of a function or macro, validated at construction.
#[derive(Debug, Clone)]
pub struct Arities {
    fixed: BTreeMap<usize, SingleFn>,
    variadic: Option<SingleFn>,
}

impl Arities {
    /// Validate and index a set of clauses.
    ///
    /// Checks, in order: at least one clause, at most one variadic clause,
    /// no two fixed clauses of the same count, and no fixed clause with
    /// more parameters than the variadic clause's fixed parameters.
    pub fn build(clauses: Vec<SingleFn>, origin: impl Into<Origin>) -> Result<Self> {
        let origin = origin.into();
        if clauses.is_empty() {
            return Err(EvalError::NoFnArities { origin });
        }
        if clauses.iter().filter(|c| c.is_variadic()).count() > 1 {
            return Err(EvalError::MultipleVariadicArities { origin });
        }

        let mut fixed = BTreeMap::new();
        let mut variadic = None;
        for clause in clauses {
            if clause.is_variadic() {
                variadic = Some(clause);
                continue;
            }
            let arity = clause.fixed();
            if fixed.insert(arity, clause).is_some() {
                return Err(EvalError::MultipleDefinitionsPerArity { origin, arity });
            }
        }

        if let Some(v) = &variadic
            && let Some((&largest, _)) = fixed.last_key_value()
            && largest > v.fixed()
        {
            return Err(EvalError::FixedArityExceedsVariableArity {
                origin,
                fixed: largest,
                variadic: v.fixed(),
            });
        }

        Ok(Arities { fixed, variadic })
    }

    /// The clause handling `count` arguments.
    #[must_use]
    pub fn select(&self, count: usize) -> Option<&SingleFn> {
        self.fixed.get(&count).or_else(|| {
            self.variadic
                .as_ref()
                .filter(|clause| count >= clause.fixed())
        })
    }

    /// Accepted counts, for arity error messages, e.g. `1, 2 or 3+`.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut parts: Vec<String> = self.fixed.keys().map(usize::to_string).collect();
        if let Some(v) = &self.variadic {
            parts.push(format!("{}+", v.fixed()));
        }
        match parts.split_last() {
            Some((last, rest)) if !rest.is_empty() => format!("{} or {}", rest.join(", "), last),
            _ => parts.concat(),
        }
    }

    fn select_or_err(&self, count: usize, origin: &Origin) -> Result<&SingleFn> {
        self.select(count)
            .ok_or_else(|| EvalError::arity(origin.clone(), self.describe(), count))
    }
}

// ============================================================================
// Functions
// ============================================================================

/// A user-defined function closing over its defining context.
pub struct Function {
    name: Option<Symbol>,
    arities: Arities,
    context: Context,
}

impl Function {
    pub fn new(name: Option<Symbol>, arities: Arities, context: Context) -> Self {
        Function {
            name,
            arities,
            context,
        }
    }

    #[must_use]
    pub fn name(&self) -> Option<&Symbol> {
        self.name.as_ref()
    }

    #[must_use]
    pub fn arities(&self) -> &Arities {
        &self.arities
    }

    fn origin(&self) -> Origin {
        match &self.name {
            Some(name) => Origin::Owned(name.to_string()),
            None => Origin::Borrowed("fn"),
        }
    }

    /// Call with already-evaluated arguments.
    ///
    /// A named function sees itself under its name. The body runs on the
    /// trampoline, so `recur` in tail position rebinds the parameters
    /// instead of growing the stack.
    pub fn call(func: &Rc<Function>, args: Vec<Value>) -> EvalResult {
        let origin = func.origin();
        let clause = match func.arities.select_or_err(args.len(), &origin) {
            Ok(clause) => clause,
            Err(err) => return err.into(),
        };

        let base = match &func.name {
            Some(name) => func.context.child_with_mode(
                Bindings::unit(name.clone(), Binding::Literal(Value::Function(func.clone()))),
                ContextMode::Normal,
            ),
            None => func.context.clone(),
        };
        let ctx = base.child_with_mode(
            clause.bind_call(args, Binding::FunctionParam),
            ContextMode::Normal,
        );

        run_body(&clause.body, ctx, |values| {
            let bindings = clause.bind_recur(values, &origin, Binding::FunctionParam)?;
            Ok(base.child_with_mode(bindings, ContextMode::Normal))
        })
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("arities", &self.arities.describe())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Macros
// ============================================================================

/// A user-defined macro. Its parameters bind the raw argument forms.
pub struct Macro {
    name: Symbol,
    arities: Arities,
    context: Context,
}

impl Macro {
    pub fn new(name: Symbol, arities: Arities, context: Context) -> Self {
        Macro {
            name,
            arities,
            context,
        }
    }

    #[must_use]
    pub fn name(&self) -> &Symbol {
        &self.name
    }

    /// Expand a call with unevaluated argument forms. The body runs in
    /// macro mode; the returned form is evaluated by the caller.
    pub fn expand(mac: &Rc<Macro>, args: Vec<Value>) -> Result<Value> {
        let origin = Origin::Owned(mac.name.to_string());
        let clause = mac.arities.select_or_err(args.len(), &origin)?;

        let base = mac.context.child_with_mode(
            Bindings::unit(mac.name.unqualified(), Binding::BoundMacro(mac.clone())),
            ContextMode::Macro,
        );
        let ctx = base.child_with_mode(
            clause.bind_call(args, Binding::MacroParam),
            ContextMode::Macro,
        );

        let expansion = run_body(&clause.body, ctx, |values| {
            let bindings = clause.bind_recur(values, &origin, Binding::MacroParam)?;
            Ok(base.child_with_mode(bindings, ContextMode::Macro))
        })
        .into_value(origin.clone())?;
        debug!(mac = %mac.name, expansion = %expansion, "expanded macro");
        Ok(expansion)
    }
}

impl fmt::Debug for Macro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Macro")
            .field("name", &self.name)
            .field("arities", &self.arities.describe())
            .finish_non_exhaustive()
    }
}

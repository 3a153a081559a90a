// sorrel-core - Reader-macro expansion
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Expansion of reader macros (`'`, `` ` ``, `~`, `~@`) after reading and
//! before evaluation.
//!
//! Syntax-quote turns its form into code that rebuilds the quoted
//! structure at runtime:
//!
//! - symbols are qualified with the current namespace and quoted, except
//!   `name#`, which becomes a gensym shared by every occurrence of the same
//!   name within one syntax-quote;
//! - other atoms and builtin or special-form tokens are quoted as is;
//! - lists become `(.seq (.concat part...))`, where each element
//!   contributes `(.list x)`, or its value directly when spliced with `~@`;
//! - vectors and maps become `(apply .vector skeleton)` and
//!   `(apply .hashmap skeleton)` around the list skeleton of their items.
//!
//! Nested syntax-quotes are expanded innermost first; the outer one then
//! expands the result as data, so `~~x` inside two syntax-quotes is
//! substituted by the outer one.

use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use crate::context::Context;
use crate::error::ReadError;
use crate::runtime::Runtime;
use crate::stack::ensure_sufficient_stack;
use crate::symbol::Symbol;
use crate::value::{BuiltIn, ReaderMacro, Seq, SpecialForm, Value};

type Result<T> = std::result::Result<T, ReadError>;

/// Suffix of symbols produced for `name#` inside a syntax-quote.
const GENSYM_SUFFIX: &str = "__auto__";

/// Expand every reader macro in `form` against the current namespace.
#[tracing::instrument(level = "trace", skip_all)]
pub fn expand(form: &Value, ctx: &Context) -> Result<Value> {
    let expander = Expander {
        runtime: ctx.runtime(),
        namespace: Rc::from(ctx.registry().current().name()),
    };
    expander.reader_expand(form, false)
}

fn quote(value: Value) -> Value {
    Value::list([Value::Special(SpecialForm::Quote), value])
}

fn call(builtin: BuiltIn, args: impl IntoIterator<Item = Value>) -> Value {
    Value::list(std::iter::once(Value::BuiltIn(builtin)).chain(args))
}

struct Expander<'a> {
    runtime: &'a Runtime,
    namespace: Rc<str>,
}

impl Expander<'_> {
    /// Expand reader macros outside of any syntax-quote. Unquotes are only
    /// legal (and kept) when `allow_unquote` is set, i.e. inside an unquote
    /// of an enclosing syntax-quote.
    fn reader_expand(&self, form: &Value, allow_unquote: bool) -> Result<Value> {
        ensure_sufficient_stack(|| self.reader_expand_form(form, allow_unquote))
    }

    fn reader_expand_form(&self, form: &Value, allow_unquote: bool) -> Result<Value> {
        match form {
            Value::ReaderMacro(rm) => match rm.kind {
                ReaderMacro::Quote => Ok(quote(self.expand_quoted(&rm.form)?)),
                ReaderMacro::SyntaxQuote => self.syntax_quote(&rm.form),
                ReaderMacro::Unquote if allow_unquote => Ok(Value::reader_macro(
                    ReaderMacro::Unquote,
                    self.reader_expand(&rm.form, true)?,
                )),
                ReaderMacro::UnquoteSplice if allow_unquote => Ok(Value::reader_macro(
                    ReaderMacro::UnquoteSplice,
                    self.reader_expand(&rm.form, true)?,
                )),
                ReaderMacro::Unquote => Err(ReadError::UnmatchedReaderMacro(
                    ReaderMacro::Unquote.prefix(),
                )),
                ReaderMacro::UnquoteSplice => Err(ReadError::UnquoteSpliceMisuse),
            },
            Value::Seq(Seq::List(items)) => Ok(Value::list(
                items
                    .iter()
                    .map(|item| self.reader_expand(item, allow_unquote))
                    .collect::<Result<Vec<_>>>()?,
            )),
            Value::Vector(items) => Ok(Value::vector(
                items
                    .iter()
                    .map(|item| self.reader_expand(item, allow_unquote))
                    .collect::<Result<Vec<_>>>()?,
            )),
            Value::Map(map) => {
                let mut entries = Vec::with_capacity(map.len());
                for (k, v) in map {
                    entries.push((
                        self.reader_expand(k, allow_unquote)?,
                        self.reader_expand(v, allow_unquote)?,
                    ));
                }
                Ok(Value::map(entries))
            }
            other => Ok(other.clone()),
        }
    }

    /// The content of a `'x` form. Nested quotes become `(quote ...)`;
    /// syntax-quotes expand; an unquote just yields its form.
    fn expand_quoted(&self, form: &Value) -> Result<Value> {
        ensure_sufficient_stack(|| self.expand_quoted_form(form))
    }

    fn expand_quoted_form(&self, form: &Value) -> Result<Value> {
        match form {
            Value::ReaderMacro(rm) => match rm.kind {
                ReaderMacro::Quote => Ok(quote(self.expand_quoted(&rm.form)?)),
                ReaderMacro::SyntaxQuote => self.syntax_quote(&rm.form),
                ReaderMacro::Unquote => self.expand_quoted(&rm.form),
                ReaderMacro::UnquoteSplice => Err(ReadError::UnquoteSpliceMisuse),
            },
            Value::Seq(Seq::List(items)) => Ok(Value::list(
                items
                    .iter()
                    .map(|item| self.expand_quoted(item))
                    .collect::<Result<Vec<_>>>()?,
            )),
            Value::Vector(items) => Ok(Value::vector(
                items
                    .iter()
                    .map(|item| self.expand_quoted(item))
                    .collect::<Result<Vec<_>>>()?,
            )),
            Value::Map(map) => {
                let mut entries = Vec::with_capacity(map.len());
                for (k, v) in map {
                    entries.push((self.expand_quoted(k)?, self.expand_quoted(v)?));
                }
                Ok(Value::map(entries))
            }
            other => Ok(other.clone()),
        }
    }

    /// Expand one syntax-quote with its own gensym table.
    fn syntax_quote(&self, form: &Value) -> Result<Value> {
        let mut quoter = SyntaxQuoter {
            expander: self,
            gensyms: HashMap::new(),
        };
        let expanded = quoter.expand(form)?;
        debug!(form = %form, expansion = %expanded, "expanded syntax-quote");
        Ok(expanded)
    }
}

struct SyntaxQuoter<'e, 'a> {
    expander: &'e Expander<'a>,
    /// `name#` symbols seen so far and the gensym chosen for each.
    gensyms: HashMap<Symbol, Symbol>,
}

impl SyntaxQuoter<'_, '_> {
    fn expand(&mut self, form: &Value) -> Result<Value> {
        let form = self.expand_nested(form)?;
        self.expand_item(&form)
    }

    /// Replace syntax-quotes nested in `form` (outside unquotes) by their
    /// expansions, so they are numbered before this one's gensyms.
    fn expand_nested(&self, form: &Value) -> Result<Value> {
        ensure_sufficient_stack(|| self.expand_nested_form(form))
    }

    fn expand_nested_form(&self, form: &Value) -> Result<Value> {
        match form {
            Value::ReaderMacro(rm) => match rm.kind {
                ReaderMacro::SyntaxQuote => self.expander.syntax_quote(&rm.form),
                ReaderMacro::Quote => Ok(Value::reader_macro(
                    ReaderMacro::Quote,
                    self.expand_nested(&rm.form)?,
                )),
                ReaderMacro::Unquote | ReaderMacro::UnquoteSplice => Ok(form.clone()),
            },
            Value::Seq(Seq::List(items)) => Ok(Value::list(
                items
                    .iter()
                    .map(|item| self.expand_nested(item))
                    .collect::<Result<Vec<_>>>()?,
            )),
            Value::Vector(items) => Ok(Value::vector(
                items
                    .iter()
                    .map(|item| self.expand_nested(item))
                    .collect::<Result<Vec<_>>>()?,
            )),
            Value::Map(map) => {
                let mut entries = Vec::with_capacity(map.len());
                for (k, v) in map {
                    entries.push((self.expand_nested(k)?, self.expand_nested(v)?));
                }
                Ok(Value::map(entries))
            }
            other => Ok(other.clone()),
        }
    }

    fn expand_item(&mut self, form: &Value) -> Result<Value> {
        ensure_sufficient_stack(|| self.expand_item_form(form))
    }

    fn expand_item_form(&mut self, form: &Value) -> Result<Value> {
        match form {
            Value::Symbol(sym) => Ok(quote(Value::Symbol(self.expand_symbol(sym)))),
            Value::ReaderMacro(rm) => match rm.kind {
                ReaderMacro::Unquote => self.expander.reader_expand(&rm.form, true),
                ReaderMacro::UnquoteSplice => Err(ReadError::UnquoteSpliceMisuse),
                ReaderMacro::Quote => {
                    let quoted = quote(self.expander.expand_quoted(&rm.form)?);
                    self.expand_item(&quoted)
                }
                ReaderMacro::SyntaxQuote => {
                    let inner = self.expander.syntax_quote(&rm.form)?;
                    self.expand_item(&inner)
                }
            },
            Value::Seq(Seq::List(items)) => self.expand_sequence(items.iter()),
            Value::Vector(items) => Ok(Value::list([
                Value::Special(SpecialForm::Apply),
                Value::BuiltIn(BuiltIn::Vector),
                self.expand_sequence(items.iter())?,
            ])),
            Value::Map(map) => {
                let flattened: Vec<Value> = map
                    .iter()
                    .flat_map(|(k, v)| [k.clone(), v.clone()])
                    .collect();
                Ok(Value::list([
                    Value::Special(SpecialForm::Apply),
                    Value::BuiltIn(BuiltIn::Hashmap),
                    self.expand_sequence(flattened.iter())?,
                ]))
            }
            // Remaining atoms, including builtin and special-form tokens.
            other => Ok(quote(other.clone())),
        }
    }

    /// The `(.seq (.concat ...))` skeleton rebuilding a list of items.
    fn expand_sequence<'v>(&mut self, items: impl ExactSizeIterator<Item = &'v Value>) -> Result<Value> {
        if items.len() == 0 {
            return Ok(call(BuiltIn::List, []));
        }
        let mut parts = Vec::with_capacity(items.len());
        for item in items {
            let part = match item {
                Value::ReaderMacro(rm) if rm.kind == ReaderMacro::Unquote => {
                    call(BuiltIn::List, [self.expander.reader_expand(&rm.form, true)?])
                }
                Value::ReaderMacro(rm) if rm.kind == ReaderMacro::UnquoteSplice => {
                    self.expander.reader_expand(&rm.form, true)?
                }
                other => call(BuiltIn::List, [self.expand_item(other)?]),
            };
            parts.push(part);
        }
        Ok(call(BuiltIn::Seq, [call(BuiltIn::Concat, parts)]))
    }

    /// Qualify a symbol, or substitute the gensym for `name#`.
    fn expand_symbol(&mut self, sym: &Symbol) -> Symbol {
        if sym.is_gensym_request() {
            if let Some(existing) = self.gensyms.get(sym) {
                return existing.clone();
            }
            let prefix = &sym.name()[..sym.name().len() - 1];
            let id = self.expander.runtime.next_gensym_id();
            let generated = Symbol::new(&format!("{}__{}{}", prefix, id, GENSYM_SUFFIX));
            self.gensyms.insert(sym.clone(), generated.clone());
            return generated;
        }
        // The rest-parameter marker stays bare so quoted parameter vectors
        // still work.
        if sym.is_qualified() || sym.name() == "&" {
            return sym.clone();
        }
        Symbol::qualified(&self.expander.namespace, sym.name())
    }
}

// sorrel-core - Printing values
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Printed representations of [`Value`].
//!
//! `Display` produces the readable form (`"a"`, `\newline`). The `str` and
//! `print` builtins use [`PrintStyle::Raw`], where strings and characters
//! print their contents.

use std::fmt;

use super::{Seq, Value};

/// How strings and characters are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintStyle {
    Readable,
    Raw,
}

impl Value {
    /// Render with the given style.
    #[must_use]
    pub fn render(&self, style: PrintStyle) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = write_value(&mut out, self, style);
        out
    }
}

fn write_float(out: &mut impl fmt::Write, n: f64) -> fmt::Result {
    if n.is_nan() {
        out.write_str("##NaN")
    } else if n.is_infinite() {
        out.write_str(if n > 0.0 { "##Inf" } else { "##-Inf" })
    } else {
        // Debug formatting keeps the trailing `.0` and switches to exponent
        // notation for very large or small magnitudes.
        write!(out, "{:?}", n)
    }
}

fn char_name(c: char) -> Option<&'static str> {
    match c {
        '\n' => Some("newline"),
        ' ' => Some("space"),
        '\t' => Some("tab"),
        '\r' => Some("return"),
        '\x08' => Some("backspace"),
        '\x0C' => Some("formfeed"),
        _ => None,
    }
}

fn write_escaped(out: &mut impl fmt::Write, s: &str) -> fmt::Result {
    out.write_char('"')?;
    for c in s.chars() {
        match c {
            '\n' => out.write_str("\\n")?,
            '\t' => out.write_str("\\t")?,
            '\r' => out.write_str("\\r")?,
            '\\' => out.write_str("\\\\")?,
            '"' => out.write_str("\\\"")?,
            _ => out.write_char(c)?,
        }
    }
    out.write_char('"')
}

fn write_items<'a>(
    out: &mut impl fmt::Write,
    items: impl Iterator<Item = &'a Value>,
    style: PrintStyle,
) -> fmt::Result {
    for (i, item) in items.enumerate() {
        if i > 0 {
            out.write_char(' ')?;
        }
        write_value(out, item, style)?;
    }
    Ok(())
}

/// Print a sequence, showing realized elements and `...` for a pending tail.
fn write_seq(out: &mut impl fmt::Write, seq: &Seq, style: PrintStyle) -> fmt::Result {
    out.write_char('(')?;
    let mut first = true;
    let mut current = seq.clone();
    loop {
        match current {
            Seq::List(items) => {
                if !items.is_empty() && !first {
                    out.write_char(' ')?;
                }
                write_items(out, items.iter(), style)?;
                break;
            }
            Seq::Cons(cell) => {
                if !first {
                    out.write_char(' ')?;
                }
                write_value(out, &cell.first, style)?;
                first = false;
                current = cell.rest.clone();
            }
            Seq::Lazy(lazy) => match lazy.cached() {
                Some(next) => current = next,
                None => {
                    if !first {
                        out.write_char(' ')?;
                    }
                    out.write_str("...")?;
                    break;
                }
            },
        }
    }
    out.write_char(')')
}

pub(crate) fn write_value(out: &mut impl fmt::Write, value: &Value, style: PrintStyle) -> fmt::Result {
    match value {
        Value::Nil => out.write_str("nil"),
        Value::Bool(b) => write!(out, "{}", b),
        Value::Int(n) => write!(out, "{}", n),
        Value::Float(n) => write_float(out, *n),
        Value::Char(c) => match style {
            PrintStyle::Raw => out.write_char(*c),
            PrintStyle::Readable => match char_name(*c) {
                Some(name) => write!(out, "\\{}", name),
                None => write!(out, "\\{}", c),
            },
        },
        Value::String(s) => match style {
            PrintStyle::Raw => out.write_str(s),
            PrintStyle::Readable => write_escaped(out, s),
        },
        Value::Symbol(sym) => write!(out, "{}", sym),
        Value::Keyword(kw) => write!(out, "{}", kw),
        Value::Namespace(ns) => write!(out, "#<Namespace {}>", ns.name()),
        Value::Var(var) => write!(out, "{}", var),
        Value::Auxiliary(aux) => out.write_str(&aux.describe()),
        Value::Seq(seq) => write_seq(out, seq, style),
        Value::Vector(items) => {
            out.write_char('[')?;
            write_items(out, items.iter(), style)?;
            out.write_char(']')
        }
        Value::Map(map) => {
            out.write_char('{')?;
            for (i, (k, v)) in map.iter().enumerate() {
                if i > 0 {
                    out.write_str(", ")?;
                }
                write_value(out, k, style)?;
                out.write_char(' ')?;
                write_value(out, v, style)?;
            }
            out.write_char('}')
        }
        Value::Macro(m) => write!(out, "#<macro {}>", m.name()),
        Value::Function(func) => match func.name() {
            Some(name) => write!(out, "#<fn {}>", name),
            None => out.write_str("#<fn>"),
        },
        Value::BuiltIn(b) => write!(out, "{}", b),
        Value::Special(sf) => write!(out, "{}", sf),
        Value::ReaderMacro(rm) => {
            out.write_str(rm.kind.prefix())?;
            write_value(out, &rm.form, style)
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self, PrintStyle::Readable)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

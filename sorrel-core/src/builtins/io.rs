// sorrel-core - Host I/O built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! print, println, read, read-string
//!
//! Output and line input go through the runtime's [`crate::Host`]; parsing
//! goes through its installed [`crate::SourceReader`].

use crate::context::Context;
use crate::error::{EvalError, Result};
use crate::expand::expand;
use crate::value::{PrintStyle, Value};

use super::{exact, expect_str};

fn joined(args: &[Value]) -> String {
    args.iter()
        .map(|arg| arg.render(PrintStyle::Raw))
        .collect::<Vec<_>>()
        .join(" ")
}

fn host_print(origin: &'static str, text: &str, ctx: &Context) -> Result<Value> {
    ctx.runtime()
        .host()
        .print(text)
        .map_err(|err| EvalError::runtime(format!("{}: {}", origin, err)))?;
    Ok(Value::Nil)
}

/// `(print x ...)`: arguments separated by spaces, no newline.
pub(crate) fn builtin_print(args: &[Value], ctx: &Context) -> Result<Value> {
    host_print("print", &joined(args), ctx)
}

pub(crate) fn builtin_println(args: &[Value], ctx: &Context) -> Result<Value> {
    let mut text = joined(args);
    text.push('\n');
    host_print("println", &text, ctx)
}

/// Read the first form of `text` and expand its reader macros, so the
/// result is plain data. Empty input reads as nil.
fn read_first(origin: &'static str, text: &str, ctx: &Context) -> Result<Value> {
    let reader = ctx
        .runtime()
        .reader()
        .ok_or_else(|| EvalError::runtime(format!("{}: no source reader is installed", origin)))?;
    let forms = reader.read(text)?;
    match forms.first() {
        Some(form) => Ok(expand(form, ctx)?),
        None => Ok(Value::Nil),
    }
}

/// `(read)` reads one line from the host and returns its first form, or
/// nil at end of input.
pub(crate) fn builtin_read(args: &[Value], ctx: &Context) -> Result<Value> {
    exact::<0>("read", args)?;
    let line = ctx
        .runtime()
        .host()
        .read_line()
        .map_err(|err| EvalError::runtime(format!("read: {}", err)))?;
    match line {
        Some(line) => read_first("read", &line, ctx),
        None => Ok(Value::Nil),
    }
}

/// `(read-string s)`
pub(crate) fn builtin_read_string(args: &[Value], ctx: &Context) -> Result<Value> {
    let [text] = exact::<1>("read-string", args)?;
    read_first("read-string", expect_str("read-string", text)?, ctx)
}

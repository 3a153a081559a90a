// sorrel-core - Tail-call trampoline
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Body evaluation for functions, macros and `loop`.
//!
//! A body ending in `recur` does not grow the native stack: the recur-signal
//! comes back to [`run_body`], which rebuilds the bindings in a fresh
//! context and evaluates the body again.

use tracing::trace;

use super::eval;
use crate::context::Context;
use crate::error::{EvalError, EvalResult, Result, try_eval};
use crate::value::Value;

/// Evaluate forms in order and return the last result (an implicit `do`).
///
/// A recur-signal from any form but the last is misuse. An empty body
/// evaluates to nil.
pub(crate) fn eval_body(body: &[Value], ctx: &Context) -> EvalResult {
    let Some((last, init)) = body.split_last() else {
        return EvalResult::Success(Value::Nil);
    };
    for form in init {
        match eval(form, ctx) {
            EvalResult::Success(_) => {}
            EvalResult::Recur(_) => {
                return EvalResult::Failure(EvalError::recur_misuse(
                    "do",
                    "recur can only appear as the last form of a body",
                ));
            }
            failure @ EvalResult::Failure(_) => return failure,
        }
    }
    eval(last, ctx)
}

/// Run `body` until it produces something other than a recur-signal.
///
/// `rebind` turns the values carried by a recur-signal into the context for
/// the next iteration.
pub(crate) fn run_body(
    body: &[Value],
    ctx: Context,
    mut rebind: impl FnMut(Vec<Value>) -> Result<Context>,
) -> EvalResult {
    let mut ctx = ctx;
    let mut iteration: u64 = 0;
    loop {
        match eval_body(body, &ctx) {
            EvalResult::Recur(values) => {
                iteration += 1;
                trace!(iteration, args = values.len(), "recur");
                ctx = try_eval!(rebind(values));
            }
            other => return other,
        }
    }
}

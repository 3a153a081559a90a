// sorrel-core - Stack growth for deep evaluation
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Native stack headroom for recursive evaluation and expansion.
//!
//! Non-tail recursion in user code maps onto native recursion in the
//! evaluator. Growing the stack on demand keeps that recursion alive until
//! the logical `max_eval_depth` limit turns it into `MaxDepthExceeded`,
//! whatever stack size the embedding thread was started with.

/// Headroom that must remain before `f` runs.
const RED_ZONE: usize = 256 * 1024;

/// Size of each newly allocated stack segment.
const STACK_PER_RECURSION: usize = 2 * 1024 * 1024;

/// Run `f`, first moving to a fresh stack segment if fewer than
/// [`RED_ZONE`] bytes are left.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

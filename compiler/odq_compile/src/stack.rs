//! Stack growth for deeply nested queries.
//!
//! Query trees nest as deep as their producer allows (`a or (b or (c ...))`),
//! and both the compiler and the renderer recurse once per level. Recursive
//! entry points run through [`ensure_sufficient_stack`], which grows the
//! stack on native targets and is a passthrough on wasm.

/// Grow when less than this much stack remains.
const RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if it is nearly exhausted.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// Run `f`. Wasm manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

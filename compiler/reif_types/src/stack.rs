//! Stack growth for the recursive type walks.
//!
//! Evaluation, subtyping and signature rewriting recurse once per nesting
//! level of a type expression. Each level runs through
//! [`ensure_sufficient_stack`], which switches to a fresh heap-allocated
//! segment when the current one is nearly exhausted. On `wasm32` the closure
//! runs directly.

/// Bytes that must remain on the current stack before recursing further.
#[cfg(not(target_arch = "wasm32"))]
const MIN_REMAINING: usize = 128 * 1024;

/// Size of each segment `stacker` allocates.
#[cfg(not(target_arch = "wasm32"))]
const SEGMENT: usize = 2 * 1024 * 1024;

/// Run one level of a recursive walk, growing the stack first if needed.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    #[cfg(not(target_arch = "wasm32"))]
    {
        stacker::maybe_grow(MIN_REMAINING, SEGMENT, f)
    }
    #[cfg(target_arch = "wasm32")]
    {
        f()
    }
}

//! Stack safety for deep recursion.
//!
//! Deeply nested expressions and documentation types recurse once per
//! nesting level; pathological inputs (thousands of parentheses) would
//! overflow the thread stack. Recursive entry points wrap themselves in
//! [`ensure_sufficient_stack`], which grows the stack on demand on native
//! targets and is a passthrough on WASM (which manages its own stack).

/// Remaining-stack threshold below which we grow (64KB).
#[cfg(not(target_arch = "wasm32"))]
const RED_ZONE: usize = 64 * 1024;

/// Stack space added per growth (1MB).
#[cfg(not(target_arch = "wasm32"))]
const STACK_PER_GROWTH: usize = 1024 * 1024;

/// Run `f`, growing the stack first if the red zone is reached.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_GROWTH, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

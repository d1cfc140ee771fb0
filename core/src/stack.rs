//! Stack growth for the recursive parser and evaluator.
//!
//! Depth limits bound how far either walker recurses, but the frame size
//! per level depends on the build profile. Growing the stack on demand keeps
//! the configured limits, rather than the thread's stack, the thing that
//! stops deep input.

/// Grow the stack when less than this many bytes remain.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment.
const SEGMENT_SIZE: usize = 1024 * 1024;

/// Run `f`, first moving to a fresh stack segment if the current one is
/// nearly exhausted.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

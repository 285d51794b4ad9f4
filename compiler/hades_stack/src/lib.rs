//! Stack growth for deep recursion.
//!
//! The checker infers nested expressions recursively and the type folders
//! walk nested types recursively, so a pathologically nested input can
//! exhaust the thread's stack. Recursive entry points wrap their body in
//! [`ensure_sufficient_stack`], which switches to a freshly allocated
//! segment when the remaining stack drops below a threshold.
//!
//! On `wasm32` the closure is called directly.

/// Grow when less than this much stack remains (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment (2MB).
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if it is nearly exhausted.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

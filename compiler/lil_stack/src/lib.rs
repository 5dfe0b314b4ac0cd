//! Stack growth for deeply nested programs.
//!
//! The parser, the code generator and the SSA evaluator all recurse over
//! the tree (or the call graph). A long `else if` chain or a deeply
//! recursive user function would otherwise blow the native stack, so each
//! recursive entry point runs through [`ensure_sufficient_stack`].
//!
//! On native targets the stack is grown on demand with `stacker`; on
//! `wasm32` the closure is called directly.

/// Remaining stack below which a new segment is allocated (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment (2MB).
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone is left.
///
/// ```text
/// fn lower(&mut self, id: ExprId) -> Result<Lowered, CodegenError> {
///     ensure_sufficient_stack(|| self.lower_inner(id))
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested_sum(depth: u64) -> u64 {
        ensure_sufficient_stack(|| if depth == 0 { 0 } else { depth + nested_sum(depth - 1) })
    }

    #[test]
    fn passes_through_the_closure_result() {
        assert_eq!(ensure_sufficient_stack(|| "value"), "value");
        let result: Result<u8, String> = ensure_sufficient_stack(|| Ok(7));
        assert_eq!(result, Ok(7));
    }

    #[test]
    fn shallow_recursion() {
        assert_eq!(nested_sum(10), 55);
    }

    #[test]
    fn recursion_deeper_than_the_main_thread_stack() {
        assert_eq!(nested_sum(200_000), 200_000 * 200_001 / 2);
    }
}

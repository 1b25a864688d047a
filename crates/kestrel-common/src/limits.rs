//! Centralized limits and thresholds for the class completer.
//!
//! Completion is re-entrant: completing a class completes its supertypes,
//! which complete theirs, and so on. Stack use is proportional to the depth
//! of that chain, so the re-entrant path grows the stack on demand instead of
//! imposing a hard depth cap.

// =============================================================================
// Stack Growth
// =============================================================================

/// Remaining stack below which a nested completion switches to a fresh segment.
///
/// Passed as the red zone to `stacker::maybe_grow`.
pub const COMPLETION_STACK_RED_ZONE: usize = 64 * 1024;

/// Size of each freshly allocated stack segment for nested completion.
pub const COMPLETION_STACK_GROW_SIZE: usize = 1024 * 1024;

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum nesting of `complete` calls tracked by the depth guard.
///
/// Inheritance chains this deep only occur in generated code. Past this depth
/// the guard still lets completion proceed but logs a warning once.
pub const MAX_COMPLETION_DEPTH: u32 = 10_000;

/// Maximum number of edges walked while checking a hierarchy for cycles.
///
/// Bounds the walk even if the model was left inconsistent by an earlier
/// failure.
pub const MAX_HIERARCHY_WALK: usize = 100_000;

// =============================================================================
// Capacity Limits
// =============================================================================

/// Initial capacity of the symbol arena.
pub const SYMBOL_ARENA_CAPACITY: usize = 256;

/// Initial capacity of the scope arena.
pub const SCOPE_ARENA_CAPACITY: usize = 128;

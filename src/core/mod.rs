//! In-memory authoritative parking state.

/// Helper index aliases.
pub mod indices;
/// Authoritative parking store: slots, queue, history, and undo engine.
pub mod store;

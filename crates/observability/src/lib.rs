//! `rxstock-observability` — tracing/logging shared setup.
//!
//! The engine crates only emit `tracing` events; installing a subscriber is
//! the embedding application's choice, made here.

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Tracing configuration (filters, layers).
pub mod tracing;

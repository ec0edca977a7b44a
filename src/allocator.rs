//! Global memory allocator configuration.
//!
//! This module configures the global memory allocator for the application.
//! We use `mimalloc` (Microsoft's high-performance allocator) instead of the
//! system allocator, since each invocation spins up its own Tokio runtime
//! and loads a fresh dynamic library, both of which churn through many
//! short-lived allocations on the way to a single JSON/byte-buffer result.
//!
//! `mimalloc` minimizes lock contention and fragmentation across the
//! allocator churn an invocation's runtime and loader threads generate.

use mimalloc::MiMalloc;

/// The global allocator instance.
///
/// We use the default `MiMalloc` configuration. This static instance is
/// registered as the `#[global_allocator]`, replacing the standard library's
/// default system allocator.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

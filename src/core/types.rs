/*!
 * Core Types
 * Common types used across the ledger
 */

/// Opaque handle to a tracked allocation
pub type Address = usize;

/// Size type for memory operations
pub type Size = usize;

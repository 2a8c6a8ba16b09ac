/*!
 * Core Module
 * Shared type aliases and ledger-wide constants
 */

pub mod limits;
pub mod types;

// Re-export for convenience
pub use types::*;

/*!
 * Memory Ledger Library
 * Instrumented allocation accounting and raw-memory inspection tools
 */

pub mod core;
pub mod inspect;
pub mod memory;

// Re-exports
pub use inspect::{BitField, BitLayout, DumpFormat, InspectError, InspectResult};
pub use memory::{
    LedgerConfig, MemStats, MemoryError, MemoryLedger, MemoryResult, QuotaHeap, RawHeap,
    SystemHeap, HEADER_COST,
};

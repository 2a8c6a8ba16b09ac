/*!
 * Memory Module
 *
 * Accounting allocation layer. Every allocation is tracked in a side table
 * recording the requested and actually-produced byte counts, enabling
 * usage statistics, leak accounting, and post-free poisoning.
 *
 * ## Features
 *
 * - **Allocation accounting**: request/produce/release byte totals and
 *   new/resize/delete call counts, aggregated per `MemStats` record
 * - **Slack poisoning**: usable bytes beyond the request are filled with a
 *   known pattern so stale reads are distinguishable from zeroed data
 * - **Use-after-free poisoning**: freed buffers are overwritten with a
 *   second pattern before they go back to the heap
 * - **Zeroing**: live allocations can be wiped to exactly their requested size
 * - **Pluggable backends**: the process heap, or a capacity-budgeted heap
 *   for deterministic out-of-memory behavior
 */

pub mod backend;
pub mod ledger;
pub mod poison;
pub mod stats;
pub mod traits;
pub mod types;

// Re-export for convenience
pub use backend::{QuotaHeap, SystemHeap};
pub use ledger::{LedgerConfig, MemoryLedger};
pub use stats::MemStats;
pub use traits::RawHeap;
pub use types::{BlockHeader, MemoryError, MemoryResult, HEADER_COST};

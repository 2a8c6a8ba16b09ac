/*!
 * Limits and Constants
 *
 * Centralized location for ledger-wide limits, defaults, and magic numbers.
 * All values include rationale comments explaining WHY they exist.
 */

/// Total capacity of the default quota backend (1GB)
/// Used as default budget for `QuotaHeap`
pub const DEFAULT_MEMORY_POOL: usize = 1024 * 1024 * 1024;

/// Granule heap backends round reservations up to (16 bytes)
/// Stands in for a platform usable-size query: reservations are rounded up,
/// so the usable size of a buffer can exceed what was asked for
pub const HEAP_GRANULE: usize = 16;

/// First handle value a ledger issues
/// Handles are advanced monotonically from here and never reused
pub const LEDGER_BASE_ADDRESS: usize = 0x1000;

/// Default byte-grouping for hex dumps (single bytes)
pub const DEFAULT_GROUP_BYTES: usize = 1;

/// Default group count per hex dump row
pub const DEFAULT_COLUMNS: usize = 16;

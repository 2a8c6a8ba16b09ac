/*!
 * Memory Types
 * Common types for the accounting layer
 */

use crate::core::types::{Address, Size};
use crate::inspect::InspectError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Memory operation result
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Memory errors
#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("Out of memory: requested {requested} bytes, available {available} bytes ({used} used / {total} total)")]
    OutOfMemory {
        requested: usize,
        available: usize,
        used: usize,
        total: usize,
    },

    #[error("Zero-sized request")]
    ZeroSized,

    #[error("Request overflows the size type: {count} elements of {elem_size} bytes")]
    RequestOverflow { count: usize, elem_size: usize },

    #[error("Invalid or untracked address: 0x{0:x}")]
    InvalidAddress(Address),

    #[error("Access out of range: offset {offset} + {len} bytes exceeds requested size {requested}")]
    OutOfRange {
        offset: Size,
        len: Size,
        requested: Size,
    },

    #[error(transparent)]
    Inspect(#[from] InspectError),
}

/// Bookkeeping cost charged to every allocation's produced size.
///
/// The accounting record lives in the ledger's side table rather than in a
/// header in front of the user bytes, but its size is still billed so
/// `produced` reflects what tracking an allocation actually costs.
pub const HEADER_COST: Size = std::mem::size_of::<BlockHeader>();

/// Per-allocation accounting record
///
/// Invariant: `produced >= requested + HEADER_COST`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Bytes the caller asked for
    pub requested: Size,
    /// Bytes reserved on the caller's behalf, bookkeeping included
    pub produced: Size,
}

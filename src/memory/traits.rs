/*!
 * Memory Traits
 * Backend abstraction for real memory acquisition
 */

use super::types::MemoryResult;
use crate::core::types::Size;

/// Underlying heap interface.
///
/// The ledger only adds bookkeeping; actual memory comes from a `RawHeap`.
/// A returned buffer's length is its usable size and may exceed the request,
/// mirroring allocators whose usable-size query reports more than was asked
/// for.
pub trait RawHeap {
    /// Reserve at least `size` bytes. `buf.len()` is the usable size.
    fn reserve(&mut self, size: Size) -> MemoryResult<Vec<u8>>;

    /// Grow or shrink `buf` to hold at least `size` bytes.
    ///
    /// On error the buffer is byte-for-byte untouched and remains owned by
    /// the caller.
    fn resize(&mut self, buf: &mut Vec<u8>, size: Size) -> MemoryResult<()>;

    /// Return a buffer to the heap.
    fn release(&mut self, buf: Vec<u8>);
}

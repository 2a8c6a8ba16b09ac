/*!
 * Heap Backends
 * RawHeap implementations: the process heap and a capacity-budgeted heap
 */

use super::traits::RawHeap;
use super::types::{MemoryError, MemoryResult};
use crate::core::limits::{DEFAULT_MEMORY_POOL, HEAP_GRANULE};
use crate::core::types::Size;
use log::error;

/// Round a request up to the backend granule.
fn usable_for(size: Size) -> Size {
    size.div_ceil(HEAP_GRANULE) * HEAP_GRANULE
}

/// Process-heap backend with no budget of its own.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHeap;

impl RawHeap for SystemHeap {
    fn reserve(&mut self, size: Size) -> MemoryResult<Vec<u8>> {
        Ok(vec![0u8; usable_for(size)])
    }

    fn resize(&mut self, buf: &mut Vec<u8>, size: Size) -> MemoryResult<()> {
        buf.resize(usable_for(size), 0u8);
        Ok(())
    }

    fn release(&mut self, _buf: Vec<u8>) {}
}

/// Capacity-budgeted heap.
///
/// Counts usable bytes against a fixed budget and refuses reservations that
/// would exceed it. Gives tests and constrained callers deterministic
/// out-of-memory behavior.
#[derive(Debug, Clone, Copy)]
pub struct QuotaHeap {
    total: Size,
    used: Size,
}

impl QuotaHeap {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MEMORY_POOL)
    }

    /// Create a heap with a custom budget (useful for testing)
    pub fn with_capacity(total: Size) -> Self {
        Self { total, used: 0 }
    }

    pub fn used(&self) -> Size {
        self.used
    }

    pub fn available(&self) -> Size {
        self.total - self.used
    }

    fn charge(&mut self, bytes: Size) -> MemoryResult<()> {
        if self.used + bytes > self.total {
            error!(
                "OOM: requested {} bytes, only {} bytes available ({} used / {} total)",
                bytes,
                self.available(),
                self.used,
                self.total
            );
            return Err(MemoryError::OutOfMemory {
                requested: bytes,
                available: self.available(),
                used: self.used,
                total: self.total,
            });
        }
        self.used += bytes;
        Ok(())
    }
}

impl Default for QuotaHeap {
    fn default() -> Self {
        Self::new()
    }
}

impl RawHeap for QuotaHeap {
    fn reserve(&mut self, size: Size) -> MemoryResult<Vec<u8>> {
        let usable = usable_for(size);
        self.charge(usable)?;
        Ok(vec![0u8; usable])
    }

    fn resize(&mut self, buf: &mut Vec<u8>, size: Size) -> MemoryResult<()> {
        let usable = usable_for(size);
        let old = buf.len();
        if usable > old {
            self.charge(usable - old)?;
        } else {
            self.used -= old - usable;
        }
        buf.resize(usable, 0u8);
        Ok(())
    }

    fn release(&mut self, buf: Vec<u8>) {
        self.used = self.used.saturating_sub(buf.len());
    }
}

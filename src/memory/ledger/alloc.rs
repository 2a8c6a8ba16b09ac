/*!
 * Ledger Allocation Operations
 * Allocation, reallocation, free, and zeroing logic
 */

use super::{Block, MemoryLedger};
use crate::core::types::{Address, Size};
use crate::memory::poison::{self, FREED_PATTERN, SLACK_PATTERN};
use crate::memory::stats::MemStats;
use crate::memory::traits::RawHeap;
use crate::memory::types::{BlockHeader, MemoryError, MemoryResult, HEADER_COST};
use log::{info, warn};

/// Validate an element-count request up front; nothing is mutated on failure.
fn checked_request(count: Size, elem_size: Size) -> MemoryResult<Size> {
    let requested = count
        .checked_mul(elem_size)
        .ok_or(MemoryError::RequestOverflow { count, elem_size })?;
    if requested == 0 {
        return Err(MemoryError::ZeroSized);
    }
    Ok(requested)
}

impl<H: RawHeap> MemoryLedger<H> {
    /// Allocate `count * elem_size` bytes, zeroed, and start tracking them.
    ///
    /// The requested region comes back zeroed; slack past it is filled with
    /// `SLACK_PATTERN` so reads of uninitialized slack are distinguishable
    /// from zeroed user data.
    pub fn allocate(
        &mut self,
        stats: Option<&mut MemStats>,
        count: Size,
        elem_size: Size,
    ) -> MemoryResult<Address> {
        let requested = checked_request(count, elem_size)?;

        let mut data = self.heap.reserve(requested)?;
        let usable = data.len();
        debug_assert!(usable >= requested);

        data[..requested].fill(0);
        poison::fill(&mut data[requested..], SLACK_PATTERN);

        let header = BlockHeader {
            requested,
            produced: usable + HEADER_COST,
        };

        let address = self.next_address;
        self.next_address += usable;
        self.blocks.insert(address, Block { header, data });

        if let Some(stats) = stats {
            stats.record_new(requested, header.produced);
        }

        info!(
            "Allocated {} bytes at 0x{:x} ({} usable)",
            requested, address, usable
        );
        Ok(address)
    }

    /// Resize a tracked block, keeping its address.
    ///
    /// Growth zeroes from the old requested size through the new usable
    /// boundary; shrinking zeroes from the new requested size through the
    /// usable boundary. Shrinking zeroes rather than poisons. On error the
    /// block is untouched and still owned by the caller.
    pub fn reallocate(
        &mut self,
        stats: Option<&mut MemStats>,
        address: Address,
        count: Size,
        elem_size: Size,
    ) -> MemoryResult<Address> {
        let requested = checked_request(count, elem_size)?;

        let block = self
            .blocks
            .get_mut(&address)
            .ok_or(MemoryError::InvalidAddress(address))?;

        let old_requested = block.header.requested;
        let old_produced = block.header.produced;

        self.heap.resize(&mut block.data, requested)?;
        let usable = block.data.len();
        debug_assert!(usable >= requested);

        if requested > old_requested {
            block.data[old_requested..].fill(0);
        } else if requested < old_requested {
            block.data[requested..].fill(0);
        }

        block.header.requested = requested;
        block.header.produced = usable + HEADER_COST;

        if let Some(stats) = stats {
            stats.record_resize(
                requested as i64 - old_requested as i64,
                block.header.produced as i64 - old_produced as i64,
            );
        }

        info!(
            "Resized block at 0x{:x}: {} -> {} bytes ({} usable)",
            address, old_requested, requested, usable
        );
        Ok(address)
    }

    /// Release a tracked block.
    ///
    /// Freeing an unknown or already-freed address fails with no side
    /// effects. With `poison_on_free` set, the whole buffer is overwritten
    /// with `FREED_PATTERN` before it goes back to the heap.
    pub fn free(&mut self, stats: Option<&mut MemStats>, address: Address) -> MemoryResult<()> {
        let Some(mut block) = self.blocks.remove(&address) else {
            warn!(
                "Attempted to free invalid or already freed address: 0x{:x}",
                address
            );
            return Err(MemoryError::InvalidAddress(address));
        };

        if let Some(stats) = stats {
            stats.record_free(block.header.produced);
        }

        if self.config.poison_on_free {
            poison::fill(&mut block.data, FREED_PATTERN);
        }

        info!("Freed {} bytes at 0x{:x}", block.header.requested, address);
        self.heap.release(block.data);
        Ok(())
    }

    /// Overwrite exactly the requested region with zero. Slack is untouched.
    pub fn zero(&mut self, address: Address) -> MemoryResult<()> {
        let block = self
            .blocks
            .get_mut(&address)
            .ok_or(MemoryError::InvalidAddress(address))?;
        let requested = block.header.requested;
        block.data[..requested].fill(0);
        Ok(())
    }
}

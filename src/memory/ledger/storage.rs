/*!
 * Ledger Storage Operations
 * Byte-level access to tracked blocks and inspection entry points
 */

use super::MemoryLedger;
use crate::core::types::{Address, Size};
use crate::inspect::{bitfield, hexdump, BitLayout, DumpFormat};
use crate::memory::traits::RawHeap;
use crate::memory::types::{MemoryError, MemoryResult};
use std::io::Write;

impl<H: RawHeap> MemoryLedger<H> {
    /// Write into a block's requested region at `offset`.
    pub fn write_bytes(
        &mut self,
        address: Address,
        offset: Size,
        bytes: &[u8],
    ) -> MemoryResult<()> {
        let block = self
            .blocks
            .get_mut(&address)
            .ok_or(MemoryError::InvalidAddress(address))?;
        let requested = block.header.requested;
        let end = offset
            .checked_add(bytes.len())
            .filter(|&end| end <= requested)
            .ok_or(MemoryError::OutOfRange {
                offset,
                len: bytes.len(),
                requested,
            })?;
        block.data[offset..end].copy_from_slice(bytes);
        Ok(())
    }

    /// Read `len` bytes from a block's requested region at `offset`.
    pub fn read_bytes(&self, address: Address, offset: Size, len: Size) -> MemoryResult<Vec<u8>> {
        let block = self
            .blocks
            .get(&address)
            .ok_or(MemoryError::InvalidAddress(address))?;
        let requested = block.header.requested;
        let end = offset
            .checked_add(len)
            .filter(|&end| end <= requested)
            .ok_or(MemoryError::OutOfRange {
                offset,
                len,
                requested,
            })?;
        Ok(block.data[offset..end].to_vec())
    }

    /// Borrow a block's full requested region.
    pub fn bytes(&self, address: Address) -> MemoryResult<&[u8]> {
        let block = self
            .blocks
            .get(&address)
            .ok_or(MemoryError::InvalidAddress(address))?;
        Ok(&block.data[..block.header.requested])
    }

    /// Borrow a block's full usable region, slack included.
    pub fn raw_bytes(&self, address: Address) -> MemoryResult<&[u8]> {
        let block = self
            .blocks
            .get(&address)
            .ok_or(MemoryError::InvalidAddress(address))?;
        Ok(&block.data)
    }

    /// Hex-dump a tracked block's requested region.
    pub fn dump<W: Write>(
        &self,
        w: &mut W,
        address: Address,
        format: DumpFormat,
    ) -> MemoryResult<()> {
        let bytes = self.bytes(address)?;
        hexdump::dump_to(w, bytes, address, format)?;
        Ok(())
    }

    /// Decode a tracked block's requested region as packed bit-field records.
    pub fn inspect<W: Write>(
        &self,
        w: &mut W,
        address: Address,
        record_size: Size,
        layout: &BitLayout,
    ) -> MemoryResult<()> {
        let bytes = self.bytes(address)?;
        bitfield::render_table(w, bytes, record_size, layout)?;
        Ok(())
    }
}

/*!
 * Memory Ledger
 *
 * Accounting allocator. A side table maps opaque addresses to block records
 * holding the requested/produced byte counts and the bytes themselves; real
 * memory comes from a pluggable `RawHeap` backend, and the ledger adds
 * bookkeeping, zeroing, and poisoning around it. There is no pointer
 * arithmetic anywhere: the handle is the key, the record is the metadata.
 */

mod alloc;
mod storage;

use super::backend::SystemHeap;
use super::traits::RawHeap;
use super::types::BlockHeader;
use crate::core::limits::LEDGER_BASE_ADDRESS;
use crate::core::types::{Address, Size};
use ahash::RandomState;
use log::info;
use std::collections::HashMap;

/// Tracked block: accounting record plus the owned bytes.
///
/// `data.len()` is the usable size (`produced` minus the bookkeeping cost);
/// `[requested, data.len())` is the slack region.
#[derive(Debug)]
pub(super) struct Block {
    pub header: BlockHeader,
    pub data: Vec<u8>,
}

/// Ledger policy knobs.
#[derive(Debug, Clone, Copy)]
pub struct LedgerConfig {
    /// Overwrite a freed buffer with `FREED_PATTERN` before releasing it.
    pub poison_on_free: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            poison_on_free: true,
        }
    }
}

/// Accounting allocator over a raw heap backend.
///
/// Operations take `&mut self`; the ledger carries no lock of its own.
/// Share one across threads behind external synchronization if you must.
pub struct MemoryLedger<H: RawHeap = SystemHeap> {
    pub(super) blocks: HashMap<Address, Block, RandomState>,
    pub(super) next_address: Address,
    pub(super) heap: H,
    pub(super) config: LedgerConfig,
}

impl MemoryLedger<SystemHeap> {
    pub fn new() -> Self {
        Self::with_heap(SystemHeap)
    }
}

impl Default for MemoryLedger<SystemHeap> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: RawHeap> MemoryLedger<H> {
    /// Create a ledger over a specific backend (useful for budgeted tests).
    pub fn with_heap(heap: H) -> Self {
        info!("Memory ledger initialized");
        Self {
            blocks: HashMap::with_hasher(RandomState::new()),
            next_address: LEDGER_BASE_ADDRESS,
            heap,
            config: LedgerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: LedgerConfig) -> Self {
        self.config = config;
        self
    }

    /// Requested size of a tracked block; 0 for an unknown address.
    pub fn size(&self, address: Address) -> Size {
        self.blocks.get(&address).map_or(0, |b| b.header.requested)
    }

    /// Usable bytes backing a tracked block; 0 for an unknown address.
    pub fn usable_size(&self, address: Address) -> Size {
        self.blocks.get(&address).map_or(0, |b| b.data.len())
    }

    /// Accounting record of a tracked block.
    pub fn header(&self, address: Address) -> Option<BlockHeader> {
        self.blocks.get(&address).map(|b| b.header)
    }

    pub fn is_tracked(&self, address: Address) -> bool {
        self.blocks.contains_key(&address)
    }

    /// Number of live blocks.
    pub fn live_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Sum of `produced` over live blocks.
    pub fn live_produced(&self) -> Size {
        self.blocks.values().map(|b| b.header.produced).sum()
    }

    /// The underlying heap backend.
    pub fn heap(&self) -> &H {
        &self.heap
    }
}

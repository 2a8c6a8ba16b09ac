/*!
 * Allocation Statistics
 * Aggregate counters across all allocations routed through one record
 */

use crate::core::types::Size;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// Aggregate allocation counters.
///
/// A record accumulates every ledger call handed a `&mut` reference to it;
/// passing `None` instead skips accounting for that call without error.
/// Exclusive references make concurrent accounting against one record a
/// compile error rather than a data race the caller must remember to avoid.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemStats {
    /// Bytes callers asked for
    pub request_total: u64,
    /// Bytes actually reserved, bookkeeping included
    pub produce_total: u64,
    /// Bytes released back to the heap
    pub release_total: u64,
    /// Fresh allocations
    pub call_new: u64,
    /// Reallocations
    pub call_resize: u64,
    /// Frees
    pub call_delete: u64,
}

impl MemStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce minus release: bytes currently live, bookkeeping included.
    pub fn current_usage(&self) -> u64 {
        self.produce_total.saturating_sub(self.release_total)
    }

    /// Produce minus request: bookkeeping plus granule slack.
    pub fn overhead(&self) -> u64 {
        self.produce_total.saturating_sub(self.request_total)
    }

    pub(crate) fn record_new(&mut self, requested: Size, produced: Size) {
        self.call_new += 1;
        self.request_total += requested as u64;
        self.produce_total += produced as u64;
    }

    pub(crate) fn record_resize(&mut self, requested_delta: i64, produced_delta: i64) {
        self.call_resize += 1;
        self.request_total = apply_delta(self.request_total, requested_delta);
        self.produce_total = apply_delta(self.produce_total, produced_delta);
    }

    pub(crate) fn record_free(&mut self, produced: Size) {
        self.call_delete += 1;
        self.release_total += produced as u64;
    }

    /// Format all six counters and the derived usage/overhead quantities.
    pub fn write_report<W: Write>(&self, w: &mut W) -> io::Result<()> {
        write!(w, "REQUEST:{:>10}; ", self.request_total)?;
        write!(w, "PRODUCE:{:>10}; ", self.produce_total)?;
        write!(w, "OVERHEAD:{:>10}; ", self.overhead())?;
        writeln!(w, "RELEASE:{:>10};", self.release_total)?;
        write!(w, "USAGE:{:>10}; ", self.current_usage())?;
        write!(w, "NEW:{:>10}; ", self.call_new)?;
        write!(w, "RES:{:>10}; ", self.call_resize)?;
        writeln!(w, "DEL:{:>10};", self.call_delete)
    }

    /// Print the report to stdout. A failed flush is the operation's failure.
    pub fn print(&self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.write_report(&mut out)?;
        out.flush()
    }
}

/// Shrinking reallocations carry negative deltas; totals never wrap below zero.
fn apply_delta(total: u64, delta: i64) -> u64 {
    if delta >= 0 {
        total.saturating_add(delta as u64)
    } else {
        total.saturating_sub(delta.unsigned_abs())
    }
}

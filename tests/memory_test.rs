/*!
 * Memory Ledger Tests
 * Allocation accounting, reallocation semantics, poisoning, and statistics
 */

use memledger::core::limits::HEAP_GRANULE;
use memledger::memory::poison::{self, FREED_PATTERN, SLACK_PATTERN};
use memledger::{MemStats, MemoryError, MemoryLedger, MemoryResult, QuotaHeap, RawHeap, HEADER_COST};
use pretty_assertions::assert_eq;
use rand::{Rng, SeedableRng};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_allocate_reports_requested_size() {
    init_logging();
    let mut ledger = MemoryLedger::new();

    let addr = ledger.allocate(None, 5, 7).unwrap();
    assert_eq!(ledger.size(addr), 35);
    assert!(ledger.usable_size(addr) >= 35);

    let header = ledger.header(addr).unwrap();
    assert_eq!(header.requested, 35);
    assert!(header.produced >= header.requested + HEADER_COST);
}

#[test]
fn test_fresh_allocation_zeroes_data_and_poisons_slack() {
    let mut ledger = MemoryLedger::new();

    // 10 bytes rounds up to one granule, leaving slack
    let addr = ledger.allocate(None, 10, 1).unwrap();
    assert_eq!(ledger.usable_size(addr), HEAP_GRANULE);

    let raw = ledger.raw_bytes(addr).unwrap();
    assert!(raw[..10].iter().all(|&b| b == 0));
    assert!(poison::is_poisoned(&raw[10..], SLACK_PATTERN));
}

#[test]
fn test_same_size_reallocation_preserves_bytes() {
    let mut ledger = MemoryLedger::new();
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    let pattern: Vec<u8> = (0..32).map(|_| rng.gen()).collect();

    let addr = ledger.allocate(None, 32, 1).unwrap();
    ledger.write_bytes(addr, 0, &pattern).unwrap();

    let addr = ledger.reallocate(None, addr, 32, 1).unwrap();
    assert_eq!(ledger.read_bytes(addr, 0, 32).unwrap(), pattern);
}

#[test]
fn test_growing_reallocation_zeroes_new_tail() {
    let mut ledger = MemoryLedger::new();

    let addr = ledger.allocate(None, 8, 1).unwrap();
    ledger.write_bytes(addr, 0, &[0xFF; 8]).unwrap();

    let addr = ledger.reallocate(None, addr, 24, 1).unwrap();
    assert_eq!(ledger.size(addr), 24);

    let raw = ledger.raw_bytes(addr).unwrap();
    assert!(raw[..8].iter().all(|&b| b == 0xFF));
    // zeroed through the usable boundary, slack included
    assert!(raw[8..].iter().all(|&b| b == 0));
}

#[test]
fn test_shrinking_reallocation_zeroes_abandoned_tail() {
    let mut ledger = MemoryLedger::new();

    let addr = ledger.allocate(None, 32, 1).unwrap();
    ledger.write_bytes(addr, 0, &[0xFF; 32]).unwrap();

    let addr = ledger.reallocate(None, addr, 8, 1).unwrap();
    assert_eq!(ledger.size(addr), 8);

    let raw = ledger.raw_bytes(addr).unwrap();
    assert!(raw[..8].iter().all(|&b| b == 0xFF));
    assert!(raw[8..].iter().all(|&b| b == 0));
}

#[test]
fn test_statistics_track_every_call() {
    let mut ledger = MemoryLedger::new();
    let mut stats = MemStats::new();

    let a = ledger.allocate(Some(&mut stats), 64, 1).unwrap();
    let b = ledger.allocate(Some(&mut stats), 128, 1).unwrap();
    let c = ledger.allocate(Some(&mut stats), 256, 1).unwrap();

    ledger.reallocate(Some(&mut stats), a, 96, 1).unwrap();
    ledger.reallocate(Some(&mut stats), b, 32, 1).unwrap();

    ledger.free(Some(&mut stats), c).unwrap();

    assert_eq!(stats.call_new, 3);
    assert_eq!(stats.call_resize, 2);
    assert_eq!(stats.call_delete, 1);
    assert_eq!(stats.request_total, 96 + 32 + 256);
    assert_eq!(stats.current_usage(), ledger.live_produced() as u64);
    assert!(stats.overhead() >= 2 * HEADER_COST as u64);
}

#[test]
fn test_accounting_skipped_without_a_record() {
    let mut ledger = MemoryLedger::new();
    let mut stats = MemStats::new();

    let addr = ledger.allocate(None, 16, 1).unwrap();
    ledger.free(None, addr).unwrap();

    let addr = ledger.allocate(Some(&mut stats), 16, 1).unwrap();
    ledger.free(Some(&mut stats), addr).unwrap();

    assert_eq!(stats.call_new, 1);
    assert_eq!(stats.call_delete, 1);
}

/// Heap that keeps released buffers so post-free contents are observable.
#[derive(Default)]
struct RecordingHeap {
    released: Vec<Vec<u8>>,
}

impl RawHeap for RecordingHeap {
    fn reserve(&mut self, size: usize) -> MemoryResult<Vec<u8>> {
        Ok(vec![0u8; size])
    }

    fn resize(&mut self, buf: &mut Vec<u8>, size: usize) -> MemoryResult<()> {
        buf.resize(size, 0u8);
        Ok(())
    }

    fn release(&mut self, buf: Vec<u8>) {
        self.released.push(buf);
    }
}

#[test]
fn test_free_poisons_whole_buffer_before_release() {
    let mut ledger = MemoryLedger::with_heap(RecordingHeap::default());

    let addr = ledger.allocate(None, 24, 1).unwrap();
    ledger.write_bytes(addr, 0, &[0x11; 24]).unwrap();
    ledger.free(None, addr).unwrap();

    let released = &ledger.heap().released;
    assert_eq!(released.len(), 1);
    assert!(poison::is_poisoned(&released[0], FREED_PATTERN));
}

#[test]
fn test_poison_on_free_can_be_disabled() {
    let config = memledger::LedgerConfig {
        poison_on_free: false,
    };
    let mut ledger = MemoryLedger::with_heap(RecordingHeap::default()).with_config(config);

    let addr = ledger.allocate(None, 8, 1).unwrap();
    ledger.write_bytes(addr, 0, &[0x11; 8]).unwrap();
    ledger.free(None, addr).unwrap();

    assert_eq!(&ledger.heap().released[0][..8], &[0x11; 8]);
}

#[test]
fn test_double_free_fails_without_side_effects() {
    let mut ledger = MemoryLedger::new();
    let mut stats = MemStats::new();

    let addr = ledger.allocate(Some(&mut stats), 16, 1).unwrap();
    ledger.free(Some(&mut stats), addr).unwrap();
    let snapshot = stats.clone();

    let result = ledger.free(Some(&mut stats), addr);
    assert!(matches!(result, Err(MemoryError::InvalidAddress(a)) if a == addr));
    assert_eq!(stats, snapshot);
}

#[test]
fn test_zero_wipes_requested_region_only() {
    let mut ledger = MemoryLedger::new();

    let addr = ledger.allocate(None, 10, 1).unwrap();
    ledger.write_bytes(addr, 0, &[0x77; 10]).unwrap();
    ledger.zero(addr).unwrap();

    let raw = ledger.raw_bytes(addr).unwrap();
    assert!(raw[..10].iter().all(|&b| b == 0));
    assert!(poison::is_poisoned(&raw[10..], SLACK_PATTERN));

    assert!(matches!(
        ledger.zero(0xBAD),
        Err(MemoryError::InvalidAddress(0xBAD))
    ));
}

#[test]
fn test_invalid_requests_are_rejected() {
    let mut ledger = MemoryLedger::new();

    assert!(matches!(
        ledger.allocate(None, 0, 8),
        Err(MemoryError::ZeroSized)
    ));
    assert!(matches!(
        ledger.allocate(None, usize::MAX, 2),
        Err(MemoryError::RequestOverflow { .. })
    ));

    let addr = ledger.allocate(None, 8, 1).unwrap();
    assert!(matches!(
        ledger.reallocate(None, addr, 0, 8),
        Err(MemoryError::ZeroSized)
    ));
    // the failed resize left the block fully usable
    assert_eq!(ledger.size(addr), 8);
}

#[test]
fn test_quota_heap_out_of_memory() {
    init_logging();
    let mut ledger = MemoryLedger::with_heap(QuotaHeap::with_capacity(1024));

    let result = ledger.allocate(None, 1, 2048);
    match result {
        Err(MemoryError::OutOfMemory {
            requested,
            available,
            used,
            total,
        }) => {
            assert_eq!(requested, 2048);
            assert_eq!(available, 1024);
            assert_eq!(used, 0);
            assert_eq!(total, 1024);
        }
        other => panic!("Expected OutOfMemory, got {other:?}"),
    }
    assert_eq!(ledger.live_blocks(), 0);
}

#[test]
fn test_failed_resize_leaves_block_owned_and_unchanged() {
    let mut ledger = MemoryLedger::with_heap(QuotaHeap::with_capacity(64));

    let addr = ledger.allocate(None, 32, 1).unwrap();
    ledger.write_bytes(addr, 0, &[0x42; 32]).unwrap();

    assert!(matches!(
        ledger.reallocate(None, addr, 1024, 1),
        Err(MemoryError::OutOfMemory { .. })
    ));

    assert_eq!(ledger.size(addr), 32);
    assert_eq!(ledger.read_bytes(addr, 0, 32).unwrap(), vec![0x42; 32]);
    ledger.free(None, addr).unwrap();
}

#[test]
fn test_storage_access_is_bounds_checked() {
    let mut ledger = MemoryLedger::new();

    let addr = ledger.allocate(None, 16, 1).unwrap();
    assert!(matches!(
        ledger.write_bytes(addr, 12, &[0u8; 8]),
        Err(MemoryError::OutOfRange { .. })
    ));
    assert!(matches!(
        ledger.read_bytes(addr, 16, 1),
        Err(MemoryError::OutOfRange { .. })
    ));
    // offsets that overflow must not wrap into range
    assert!(matches!(
        ledger.read_bytes(addr, usize::MAX, 2),
        Err(MemoryError::OutOfRange { .. })
    ));
}

#[test]
fn test_handles_are_never_reused() {
    let mut ledger = MemoryLedger::new();

    let first = ledger.allocate(None, 16, 1).unwrap();
    ledger.free(None, first).unwrap();
    let second = ledger.allocate(None, 16, 1).unwrap();

    assert_ne!(first, second);
    assert!(!ledger.is_tracked(first));
    assert!(ledger.is_tracked(second));
}

#[test]
fn test_stats_report_lists_all_counters() {
    let mut ledger = MemoryLedger::new();
    let mut stats = MemStats::new();

    let addr = ledger.allocate(Some(&mut stats), 100, 1).unwrap();
    ledger.free(Some(&mut stats), addr).unwrap();

    let mut out = Vec::new();
    stats.write_report(&mut out).unwrap();
    let report = String::from_utf8(out).unwrap();

    for field in ["REQUEST:", "PRODUCE:", "OVERHEAD:", "RELEASE:", "USAGE:", "NEW:", "RES:", "DEL:"] {
        assert!(report.contains(field), "report missing {field}: {report}");
    }
}

#[test]
fn test_stats_serialize_round_trip() {
    let mut ledger = MemoryLedger::new();
    let mut stats = MemStats::new();

    let addr = ledger.allocate(Some(&mut stats), 48, 1).unwrap();
    ledger.reallocate(Some(&mut stats), addr, 12, 1).unwrap();

    let json = serde_json::to_string(&stats).unwrap();
    let decoded: MemStats = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, stats);
}

/*!
 * Memory Poisoning
 * Known fill patterns that make stale or uninitialized reads detectable
 */

/// Pattern written over freed buffers before release.
pub const FREED_PATTERN: u8 = 0xCD;

/// Pattern written into slack bytes past the requested size.
pub const SLACK_PATTERN: u8 = 0xAB;

/// Fill a region with a poison pattern.
pub fn fill(region: &mut [u8], pattern: u8) {
    region.fill(pattern);
}

/// Check whether a region is entirely filled with `pattern`.
pub fn is_poisoned(region: &[u8], pattern: u8) -> bool {
    region.iter().all(|&b| b == pattern)
}

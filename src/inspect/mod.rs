/*!
 * Inspection Module
 *
 * Bit-level tools over raw memory: a packed bit-field decoder that
 * tabulates records field by field, and an aligned, bordered hex dump.
 */

pub mod bitfield;
pub mod hexdump;
pub mod types;

// Re-export for convenience
pub use bitfield::{BitField, BitLayout};
pub use hexdump::DumpFormat;
pub use types::{InspectError, InspectResult};

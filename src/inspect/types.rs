/*!
 * Inspection Types
 * Common types for the raw-memory inspectors
 */

use thiserror::Error;

/// Inspection operation result
pub type InspectResult<T> = Result<T, InspectError>;

/// Inspection errors
#[derive(Error, Debug)]
pub enum InspectError {
    #[error("{what} must be a power of two, got {value}")]
    NotPowerOfTwo { what: &'static str, value: usize },

    #[error("Field width {0} out of range, widths must be 1-64 bits")]
    FieldWidth(i64),

    #[error("Layout describes no decodable fields")]
    EmptyLayout,

    #[error("Layout mismatch: {described} bits described, record holds {expected} bits")]
    LayoutMismatch { described: u64, expected: u64 },

    #[error("Record size {record_size} does not divide buffer of {len} bytes")]
    RecordTruncated { record_size: usize, len: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

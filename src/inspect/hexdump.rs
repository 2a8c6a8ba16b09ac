/*!
 * Hex Dump Visualizer
 * Aligned, bordered hex tables with address-column framing
 */

use super::types::{InspectError, InspectResult};
use crate::core::limits::{DEFAULT_COLUMNS, DEFAULT_GROUP_BYTES};
use crate::core::types::Size;
use std::io::{self, Write};

/// Hex dump shape: `group` bytes per group, `columns` groups per row.
///
/// Both counts must be powers of two; anything else is rejected before a
/// single byte is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpFormat {
    pub group: Size,
    pub columns: Size,
    /// Append an ASCII sidebar: printable bytes as-is, `.` otherwise
    pub ascii: bool,
}

impl Default for DumpFormat {
    fn default() -> Self {
        Self {
            group: DEFAULT_GROUP_BYTES,
            columns: DEFAULT_COLUMNS,
            ascii: false,
        }
    }
}

impl DumpFormat {
    pub fn new(group: Size, columns: Size) -> Self {
        Self {
            group,
            columns,
            ascii: false,
        }
    }

    pub fn with_ascii(mut self) -> Self {
        self.ascii = true;
        self
    }

    fn validate(&self) -> InspectResult<()> {
        if !self.group.is_power_of_two() {
            return Err(InspectError::NotPowerOfTwo {
                what: "group",
                value: self.group,
            });
        }
        if !self.columns.is_power_of_two() {
            return Err(InspectError::NotPowerOfTwo {
                what: "columns",
                value: self.columns,
            });
        }
        Ok(())
    }

    fn row_bytes(&self) -> Size {
        self.group * self.columns
    }
}

/// Byte at `pos` in the padded row stream, or `None` for a placeholder slot.
///
/// `lead` is how many slots the aligned first row starts before the data.
fn slot(bytes: &[u8], lead: usize, pos: usize) -> Option<u8> {
    pos.checked_sub(lead).and_then(|i| bytes.get(i)).copied()
}

/// Dump `bytes` as a bordered hex table.
///
/// `base` is the address shown in the framing column. The first row starts
/// at the largest multiple of the group size at or below `base`; slots
/// outside the dumped range print as `..` placeholders. Output is flushed
/// before returning.
pub fn dump_to<W: Write>(
    w: &mut W,
    bytes: &[u8],
    base: usize,
    format: DumpFormat,
) -> InspectResult<()> {
    format.validate()?;

    let row_bytes = format.row_bytes();
    let aligned = base & !(format.group - 1);
    let lead = base - aligned;
    let total = lead + bytes.len();
    let rows = total.div_ceil(row_bytes).max(1);

    write_rule(w, '┌', '┬', '┐', format)?;
    for row in 0..rows {
        let row_addr = aligned + row * row_bytes;
        write!(w, "│ {row_addr:#018x} │")?;
        for col in 0..format.columns {
            write!(w, " ")?;
            for g in 0..format.group {
                let pos = row * row_bytes + col * format.group + g;
                match slot(bytes, lead, pos) {
                    Some(byte) => write!(w, "{byte:02x}")?,
                    None => write!(w, "..")?,
                }
            }
        }
        write!(w, " │")?;
        if format.ascii {
            write!(w, " ")?;
            for pos in row * row_bytes..(row + 1) * row_bytes {
                let ch = match slot(bytes, lead, pos) {
                    Some(byte) if (0x20..0x7f).contains(&byte) => byte as char,
                    Some(_) => '.',
                    None => ' ',
                };
                write!(w, "{ch}")?;
            }
            write!(w, " │")?;
        }
        writeln!(w)?;
    }
    write_rule(w, '└', '┴', '┘', format)?;
    w.flush()?;
    Ok(())
}

/// Dump to stdout, flushing before returning.
pub fn dump(bytes: &[u8], base: usize, format: DumpFormat) -> InspectResult<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    dump_to(&mut out, bytes, base, format)
}

fn write_rule<W: Write>(
    w: &mut W,
    left: char,
    mid: char,
    right: char,
    format: DumpFormat,
) -> io::Result<()> {
    // address cell: two spaces around an 18-char address
    write!(w, "{left}{}", "─".repeat(20))?;
    let hex_width = format.columns * (1 + 2 * format.group) + 1;
    write!(w, "{mid}{}", "─".repeat(hex_width))?;
    if format.ascii {
        write!(w, "{mid}{}", "─".repeat(format.row_bytes() + 2))?;
    }
    writeln!(w, "{right}")
}

/*!
 * Packed Bit-Field Decoder
 *
 * Decodes arrays of packed records described by a field/padding bit layout
 * and renders one table row per record, one hex column per field.
 *
 * Bit order is little-endian within each byte: bit 0 of byte N is that
 * byte's least-significant bit.
 */

use super::types::{InspectError, InspectResult};
use crate::core::types::Size;
use std::io::{self, Write};

/// Widest decodable field in bits.
pub const MAX_FIELD_BITS: u32 = 64;

/// One entry of a packed-record layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitField {
    /// Decodable field of the given bit width (1-64)
    Field(u32),
    /// Skipped padding of the given bit width
    Pad(u32),
}

impl BitField {
    pub const fn width(self) -> u32 {
        match self {
            BitField::Field(w) | BitField::Pad(w) => w,
        }
    }
}

/// Ordered bit layout of one packed record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitLayout {
    entries: Vec<BitField>,
}

impl BitLayout {
    /// Build a layout from typed entries.
    pub fn new(entries: Vec<BitField>) -> InspectResult<Self> {
        if !entries.iter().any(|e| matches!(e, BitField::Field(_))) {
            return Err(InspectError::EmptyLayout);
        }
        for entry in &entries {
            let width = entry.width();
            if width == 0 || width > MAX_FIELD_BITS {
                return Err(InspectError::FieldWidth(width as i64));
            }
        }
        Ok(Self { entries })
    }

    /// Build a layout from a signed width list: positive entries are
    /// decodable fields, negative entries are padding, a zero terminates
    /// the list early.
    pub fn from_signed(widths: &[i64]) -> InspectResult<Self> {
        let mut entries = Vec::with_capacity(widths.len());
        for &signed in widths {
            if signed == 0 {
                break;
            }
            if signed.unsigned_abs() > MAX_FIELD_BITS as u64 {
                return Err(InspectError::FieldWidth(signed));
            }
            entries.push(if signed > 0 {
                BitField::Field(signed as u32)
            } else {
                BitField::Pad(signed.unsigned_abs() as u32)
            });
        }
        Self::new(entries)
    }

    pub fn entries(&self) -> &[BitField] {
        &self.entries
    }

    /// Field plus padding bits described by the layout.
    pub fn described_bits(&self) -> u64 {
        self.entries.iter().map(|e| e.width() as u64).sum()
    }

    /// Widths of the decodable fields only, in order.
    pub fn field_widths(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.iter().filter_map(|e| match e {
            BitField::Field(w) => Some(*w),
            BitField::Pad(_) => None,
        })
    }

    /// Hard consistency check: described bits must equal the record's bit
    /// size exactly.
    pub fn validate(&self, record_size: Size) -> InspectResult<()> {
        let expected = record_size as u64 * 8;
        let described = self.described_bits();
        if described != expected {
            return Err(InspectError::LayoutMismatch {
                described,
                expected,
            });
        }
        Ok(())
    }
}

/// Extract `width` bits starting `bit_offset` bits into `bytes`,
/// accumulated directly into 64 bits.
///
/// `bit_offset + width` must not run past the end of `bytes`.
pub fn extract_bits(bytes: &[u8], bit_offset: u64, width: u32) -> u64 {
    debug_assert!(width >= 1 && width <= MAX_FIELD_BITS);
    let mut value: u64 = 0;
    let mut got: u32 = 0;
    let mut index = (bit_offset / 8) as usize;
    let mut bit = (bit_offset % 8) as u32;
    while got < width {
        let take = (8 - bit).min(width - got);
        let mask = ((1u16 << take) - 1) as u8;
        let chunk = (bytes[index] >> bit) & mask;
        value |= (chunk as u64) << got;
        got += take;
        index += 1;
        bit = 0;
    }
    value
}

/// Decode every record in `records`, returning field values row by row.
///
/// Validates the layout against `record_size` before touching any bits;
/// a mismatched layout is an error the caller must handle, not a warning.
pub fn decode(
    records: &[u8],
    record_size: Size,
    layout: &BitLayout,
) -> InspectResult<Vec<Vec<u64>>> {
    layout.validate(record_size)?;
    if records.len() % record_size != 0 {
        return Err(InspectError::RecordTruncated {
            record_size,
            len: records.len(),
        });
    }

    let record_bits = record_size as u64 * 8;
    let count = records.len() / record_size;
    Ok((0..count)
        .map(|index| decode_record(records, record_bits * index as u64, layout))
        .collect())
}

fn decode_record(bytes: &[u8], start_bit: u64, layout: &BitLayout) -> Vec<u64> {
    let mut offset = start_bit;
    let mut values = Vec::new();
    for entry in layout.entries() {
        match *entry {
            BitField::Field(width) => {
                values.push(extract_bits(bytes, offset, width));
                offset += width as u64;
            }
            BitField::Pad(width) => offset += width as u64,
        }
    }
    values
}

/// Hex digits needed for a field of `width` bits.
fn nibbles(width: u32) -> usize {
    width.div_ceil(4) as usize
}

/// Render one table row per record, one zero-padded hex column per field.
///
/// The header row shows each field's bit width and the layout's
/// described/record bit fraction. Output is flushed before returning.
pub fn render_table<W: Write>(
    w: &mut W,
    records: &[u8],
    record_size: Size,
    layout: &BitLayout,
) -> InspectResult<()> {
    let rows = decode(records, record_size, layout)?;
    let widths: Vec<u32> = layout.field_widths().collect();

    let fraction = format!("{}/{} bit", layout.described_bits(), record_size * 8);
    let last_label = format!("record {}", rows.len().saturating_sub(1));
    let index_width = fraction.len().max(last_label.len());
    let col_widths: Vec<usize> = widths
        .iter()
        .map(|&fw| nibbles(fw).max(fw.to_string().len()))
        .collect();

    write_rule(w, '┌', '┬', '┐', index_width, &col_widths)?;
    write!(w, "│ {fraction:>index_width$} ")?;
    for (i, &fw) in widths.iter().enumerate() {
        write!(w, "│ {:>1$} ", fw, col_widths[i])?;
    }
    writeln!(w, "│")?;
    write_rule(w, '├', '┼', '┤', index_width, &col_widths)?;

    for (r, row) in rows.iter().enumerate() {
        let label = format!("record {r}");
        write!(w, "│ {label:>index_width$} ")?;
        for (i, &value) in row.iter().enumerate() {
            let cell = format!("{value:0width$X}", width = nibbles(widths[i]));
            write!(w, "│ {:>1$} ", cell, col_widths[i])?;
        }
        writeln!(w, "│")?;
    }

    write_rule(w, '└', '┴', '┘', index_width, &col_widths)?;
    w.flush()?;
    Ok(())
}

/// Render to stdout, flushing before returning.
pub fn print_table(records: &[u8], record_size: Size, layout: &BitLayout) -> InspectResult<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_table(&mut out, records, record_size, layout)
}

fn write_rule<W: Write>(
    w: &mut W,
    left: char,
    mid: char,
    right: char,
    index_width: usize,
    col_widths: &[usize],
) -> io::Result<()> {
    write!(w, "{left}{}", "─".repeat(index_width + 2))?;
    for &cw in col_widths {
        write!(w, "{mid}{}", "─".repeat(cw + 2))?;
    }
    writeln!(w, "{right}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_within_a_single_byte() {
        let bytes = [0b1011_0101u8];
        assert_eq!(extract_bits(&bytes, 0, 4), 0b0101);
        assert_eq!(extract_bits(&bytes, 4, 4), 0b1011);
        assert_eq!(extract_bits(&bytes, 2, 3), 0b101);
    }

    #[test]
    fn extracts_across_byte_boundaries() {
        let bytes = [0b1100_1101u8, 0b1010_0001u8];
        // bits 6..10: 1, 1 from byte 0, then 1, 0 from byte 1
        assert_eq!(extract_bits(&bytes, 6, 4), 0b0111);
    }

    #[test]
    fn extracts_full_width_values() {
        let bytes = 0x0123_4567_89AB_CDEFu64.to_le_bytes();
        assert_eq!(extract_bits(&bytes, 0, 64), 0x0123_4567_89AB_CDEF);
        assert_eq!(extract_bits(&bytes, 8, 48), 0x2345_6789_ABCD);
    }

    #[test]
    fn nibble_counts_round_up() {
        assert_eq!(nibbles(1), 1);
        assert_eq!(nibbles(4), 1);
        assert_eq!(nibbles(5), 2);
        assert_eq!(nibbles(64), 16);
    }
}

//! Little endian integers with a magnitude dependent width
//!
//! Every numeric field of a string table goes through this module. Structural fields (row counts,
//! row numbers and character counts) always request an explicit width of [`FIELD_WIDTH`] bytes,
//! while character ordinals use the width selected by [`encoded_width`]:
//!
//! | Value                                | Bytes |
//! |--------------------------------------|-------|
//! | `0..=0xFF`                           | 1     |
//! | `0x100..=0xFFFF`                     | 2     |
//! | `0x1_0000..=0xFF_FFFF`               | 3     |
//! | `0x100_0000..=0x13FF_FFFF`           | 4     |
//! | anything larger                      | 8     |
//!
//! The 4 byte range ends at `0x13FF_FFFF` (335,544,319) rather than `u32::MAX`; values between
//! the two are still written with 8 bytes.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

use crate::error::{Error, Result};

/// Width of every structural integer in the format
pub const FIELD_WIDTH: usize = 4;

const MAX_WIDTH: usize = 8;

/// Number of bytes `value` occupies when no explicit width is requested
pub const fn encoded_width(value: u64) -> usize {
    match value {
        0..=0xFF => 1,
        0x100..=0xFFFF => 2,
        0x1_0000..=0xFF_FFFF => 3,
        0x100_0000..=0x13FF_FFFF => 4,
        _ => 8,
    }
}

/// Whether `value` can be written in `width` little endian bytes without losing bits
const fn fits(value: u64, width: usize) -> bool {
    width >= MAX_WIDTH || value >> (width * 8) == 0
}

/// Write `value` to `writer` as little endian bytes, returning the number of bytes written.
///
/// With `width` set to [`None`] the width comes from [`encoded_width`], otherwise exactly `width`
/// bytes are written. Values that do not fit the requested width are rejected instead of
/// truncated.
pub fn write_uint<W: Write>(writer: &mut W, value: u64, width: Option<usize>) -> Result<usize> {
    let width = match width {
        Some(width) if width == 0 || width > MAX_WIDTH => return Err(Error::InvalidWidth(width)),
        Some(width) => width,
        None => encoded_width(value),
    };

    if !fits(value, width) {
        return Err(Error::IntegerTooWide { value, width });
    }

    writer.write_uint::<LittleEndian>(value, width)?;
    Ok(width)
}

/// Write a 4 byte structural field
pub fn write_field<W: Write>(writer: &mut W, value: u32) -> Result<()> {
    write_uint(writer, value.into(), Some(FIELD_WIDTH)).map(|_| ())
}

/// Read a little endian integer of exactly `width` bytes
pub fn read_uint<R: Read>(reader: &mut R, width: usize) -> Result<u64> {
    if width == 0 || width > MAX_WIDTH {
        return Err(Error::InvalidWidth(width));
    }

    Ok(reader.read_uint::<LittleEndian>(width)?)
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    use super::{encoded_width, read_uint, write_uint};
    use crate::error::{Error, Result};

    fn encode(value: u64, width: Option<usize>) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let written = write_uint(&mut out, value, width)?;
        assert_eq!(written, out.len());
        Ok(out)
    }

    #[test]
    fn width_boundaries() -> Result<()> {
        let cases = [
            (0, 1),
            (255, 1),
            (256, 2),
            (65_535, 2),
            (65_536, 3),
            (16_777_215, 3),
            (16_777_216, 4),
            (335_544_319, 4),
            (335_544_320, 8),
        ];

        for (value, width) in cases {
            assert_eq!(encoded_width(value), width, "width of {value}");
            assert_eq!(encode(value, None)?.len(), width, "bytes for {value}");
        }

        Ok(())
    }

    #[test]
    fn little_endian_layout() -> Result<()> {
        assert_eq!(encode(0x48, None)?, vec![0x48]);
        assert_eq!(encode(0x1234, None)?, vec![0x34, 0x12]);
        assert_eq!(encode(0x12_3456, None)?, vec![0x56, 0x34, 0x12]);
        assert_eq!(
            encode(0x1400_0000, None)?,
            vec![0x00, 0x00, 0x00, 0x14, 0x00, 0x00, 0x00, 0x00]
        );
        assert_eq!(encode(u64::MAX, None)?, vec![0xFF; 8]);

        Ok(())
    }

    #[test]
    fn explicit_width_ignores_magnitude() -> Result<()> {
        assert_eq!(encode(1, Some(4))?, vec![0x01, 0x00, 0x00, 0x00]);
        assert_eq!(encode(0, Some(4))?, vec![0x00; 4]);
        assert_eq!(encode(0xFFFF_FFFF, Some(4))?, vec![0xFF; 4]);

        Ok(())
    }

    #[test]
    fn rejects_values_wider_than_requested() {
        assert!(matches!(
            encode(0x1_0000_0000, Some(4)),
            Err(Error::IntegerTooWide {
                value: 0x1_0000_0000,
                width: 4
            })
        ));
        assert!(matches!(
            encode(256, Some(1)),
            Err(Error::IntegerTooWide { width: 1, .. })
        ));
    }

    #[test]
    fn rejects_invalid_widths() {
        assert!(matches!(encode(1, Some(0)), Err(Error::InvalidWidth(0))));
        assert!(matches!(encode(1, Some(9)), Err(Error::InvalidWidth(9))));
        assert!(matches!(
            read_uint(&mut Cursor::new([0u8; 16]), 9),
            Err(Error::InvalidWidth(9))
        ));
    }

    #[test]
    fn reads_fixed_widths() -> Result<()> {
        let mut input = Cursor::new(vec![0x01, 0x00, 0x00, 0x00, 0x48, 0x00]);

        assert_eq!(read_uint(&mut input, 4)?, 1);
        assert_eq!(read_uint(&mut input, 2)?, 0x48);
        assert!(matches!(read_uint(&mut input, 1), Err(Error::IOError(_))));

        Ok(())
    }
}

//! Types for writing string table files
//!

use bon::Builder;
use byteorder::WriteBytesExt;
use std::io::Write;
use tracing::{debug, instrument, trace, warn};

use crate::error::{Error, Result};
use crate::types::{Row, Section, HEADER, VALUE_FILLER};
use crate::varint::{write_field, write_uint, FIELD_WIDTH};

/// How characters that do not fit in a single byte are handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CharacterPolicy {
    /// Fail the row with [`Error::CharacterOutOfRange`]
    #[default]
    Reject,

    /// Write the given byte in place of the character
    Replace(u8),

    /// Write the ordinal with the variable width rule of [`crate::varint::encoded_width`].
    ///
    /// This matches files produced by older exporters byte for byte, but readers assume one byte
    /// per character and will desynchronize on such files.
    Unchecked,
}

/// Options for how the STF file should be written
#[derive(Debug, Clone, Copy, Default, Builder)]
pub struct WriterOptions {
    /// What to do with characters outside of `0..=0xFF`
    #[builder(default)]
    pub character_policy: CharacterPolicy,
}

/// Write a single value character: its ordinal followed by a zero spacer byte
pub fn write_value_char<W: Write>(writer: &mut W, ordinal: u64) -> Result<usize> {
    let written = write_uint(writer, ordinal, None)?;
    writer.write_u8(0)?;
    Ok(written + 1)
}

/// Write a single key character: its ordinal with no spacer
pub fn write_key_char<W: Write>(writer: &mut W, ordinal: u64) -> Result<usize> {
    write_uint(writer, ordinal, None)
}

/// STF file generator
///
/// Rows are numbered in the order they are added. Both sections are buffered in memory until
/// [`StringTableWriter::finish`] writes the complete file to the inner writer.
///
/// ```
/// # fn doit() -> convo_stf::error::Result<()>
/// # {
/// use convo_stf::write::{StringTableWriter, WriterOptions};
///
/// let mut stf = StringTableWriter::new(Vec::new(), WriterOptions::default());
/// stf.add_row("s_greeting", "Hello there")?;
/// stf.add_row("s_farewell", "Goodbye")?;
///
/// let bytes = stf.finish()?;
/// assert_eq!(&bytes[..2], &[0xCD, 0xAB]);
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
pub struct StringTableWriter<W: Write> {
    inner: W,
    options: WriterOptions,
    rows: u32,
    value_block: Vec<u8>,
    key_block: Vec<u8>,
}

impl<W: Write> StringTableWriter<W> {
    /// Initializes an empty table that will be written to `inner`
    pub fn new(inner: W, options: WriterOptions) -> StringTableWriter<W> {
        StringTableWriter {
            inner,
            options,
            rows: 0,
            value_block: Vec::new(),
            key_block: Vec::new(),
        }
    }

    /// Number of rows added so far
    pub const fn len(&self) -> usize {
        self.rows as usize
    }

    /// Whether no rows have been added yet
    pub const fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Append a row to the table.
    ///
    /// A rejected row leaves the writer untouched, so later rows keep their numbering.
    #[instrument(skip(self, key, value), err, fields(rows = self.rows))]
    pub fn add_row(&mut self, key: &str, value: &str) -> Result<()> {
        let row = self.rows.checked_add(1).ok_or(Error::TooManyRows)?;

        let mut value_record = Vec::with_capacity(3 * FIELD_WIDTH + 2 * value.len());
        write_field(&mut value_record, row)?;
        value_record.write_all(&VALUE_FILLER)?;
        write_field(
            &mut value_record,
            character_count(Section::Value, row, value)?,
        )?;
        for (position, c) in value.chars().enumerate() {
            let ordinal = self.ordinal(Section::Value, row, position, c)?;
            write_value_char(&mut value_record, ordinal)?;
        }

        let mut key_record = Vec::with_capacity(2 * FIELD_WIDTH + key.len());
        write_field(&mut key_record, row)?;
        write_field(&mut key_record, character_count(Section::Key, row, key)?)?;
        for (position, c) in key.chars().enumerate() {
            let ordinal = self.ordinal(Section::Key, row, position, c)?;
            write_key_char(&mut key_record, ordinal)?;
        }

        trace!(
            key,
            value_bytes = value_record.len(),
            key_bytes = key_record.len(),
            "added row"
        );

        self.value_block.extend_from_slice(&value_record);
        self.key_block.extend_from_slice(&key_record);
        self.rows = row;

        Ok(())
    }

    fn ordinal(&self, section: Section, row: u32, position: usize, c: char) -> Result<u64> {
        let ordinal = u32::from(c);
        if ordinal <= 0xFF {
            return Ok(ordinal.into());
        }

        match self.options.character_policy {
            CharacterPolicy::Reject => Err(Error::CharacterOutOfRange {
                section,
                row,
                position,
                ordinal,
            }),
            CharacterPolicy::Replace(replacement) => {
                warn!(%section, row, position, ordinal, "replacing character outside of byte range");
                Ok(replacement.into())
            }
            CharacterPolicy::Unchecked => Ok(ordinal.into()),
        }
    }

    /// Write the header followed by both sections and return the inner writer
    #[instrument(skip(self), err, fields(rows = self.rows))]
    pub fn finish(mut self) -> Result<W> {
        self.inner.write_all(&HEADER)?;
        write_field(&mut self.inner, self.rows)?;

        debug!(
            value_bytes = self.value_block.len(),
            key_bytes = self.key_block.len(),
            "writing sections"
        );
        self.inner.write_all(&self.value_block)?;
        self.inner.write_all(&self.key_block)?;

        Ok(self.inner)
    }
}

fn character_count(section: Section, row: u32, text: &str) -> Result<u32> {
    u32::try_from(text.chars().count()).map_err(|_| Error::TooManyCharacters { section, row })
}

/// Encode `rows` into a complete STF buffer with the default [`WriterOptions`]
pub fn encode(rows: impl AsRef<[Row]>) -> Result<Vec<u8>> {
    encode_with(rows, WriterOptions::default())
}

/// Encode `rows` into a complete STF buffer
#[instrument(skip_all, err, fields(rows = rows.as_ref().len()))]
pub fn encode_with(rows: impl AsRef<[Row]>, options: WriterOptions) -> Result<Vec<u8>> {
    let rows = rows.as_ref();
    if u32::try_from(rows.len()).is_err() {
        return Err(Error::TooManyRows);
    }

    let mut writer = StringTableWriter::new(Vec::new(), options);
    for row in rows {
        writer.add_row(&row.key, &row.value)?;
    }

    writer.finish()
}

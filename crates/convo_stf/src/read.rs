//! Types for reading string table files
//!

use bon::Builder;
use std::{
    collections::{BTreeMap, HashMap},
    io::{Cursor, Read},
};
use tracing::{debug, instrument, trace, warn};

use crate::error::{Error, Result};
use crate::types::{
    Row, Section, StringTable, HEADER, KEY_CHAR_WIDTH, VALUE_CHAR_WIDTH, VALUE_FILLER,
};
use crate::varint::{read_uint, FIELD_WIDTH};

/// How row numbers that do not form the sequence `1..=N` are handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowNumbering {
    /// Duplicate or missing row numbers fail the decode
    #[default]
    Strict,

    /// Later duplicates replace earlier ones and rows missing from either section are skipped,
    /// leaving a gap at their index
    Lenient,
}

/// Options for how the STF file should be read
#[derive(Debug, Clone, Copy, Default, Builder)]
pub struct ReaderOptions {
    /// Check the magic number instead of skipping the header
    #[builder(default)]
    pub verify_header: bool,

    /// Handling of inconsistent row numbers
    #[builder(default)]
    pub row_numbering: RowNumbering,
}

/// Bounds checked cursor over a complete file
struct SectionReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> SectionReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        SectionReader {
            cursor: Cursor::new(data),
        }
    }

    fn remaining(&self) -> u64 {
        (self.cursor.get_ref().len() as u64).saturating_sub(self.cursor.position())
    }

    fn ensure(&self, section: Section, record: u32, needed: u64) -> Result<()> {
        let available = self.remaining();
        if available < needed {
            return Err(Error::Truncated {
                section,
                record,
                offset: self.cursor.position(),
                needed,
                available,
            });
        }
        Ok(())
    }

    fn field(&mut self, section: Section, record: u32) -> Result<u32> {
        self.ensure(section, record, FIELD_WIDTH as u64)?;
        Ok(read_uint(&mut self.cursor, FIELD_WIDTH)? as u32)
    }

    fn bytes(&mut self, section: Section, record: u32, len: u64) -> Result<&'a [u8]> {
        self.ensure(section, record, len)?;

        let data: &'a [u8] = *self.cursor.get_ref();
        let start = self.cursor.position() as usize;
        let end = start + len as usize;
        self.cursor.set_position(end as u64);

        Ok(&data[start..end])
    }
}

/// STF file reader
///
/// ```no_run
/// use std::io::prelude::*;
///
/// fn list_entries(reader: impl Read) -> convo_stf::error::Result<()> {
///     let stf = convo_stf::StringTableReader::new(reader)?;
///
///     for (index, row) in stf.rows() {
///         println!("{index} {}: {}", &row.key, &row.value);
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct StringTableReader {
    row_count: u32,
    entries: BTreeMap<usize, Row>,
}

impl StringTableReader {
    /// Read a STF file and parse it's entries with the default [`ReaderOptions`].
    pub fn new<R: Read>(reader: R) -> Result<StringTableReader> {
        Self::with_options(reader, ReaderOptions::default())
    }

    /// Read a STF file to its end and parse it's entries.
    pub fn with_options<R: Read>(mut reader: R, options: ReaderOptions) -> Result<StringTableReader> {
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        Self::from_bytes(&buffer, options)
    }

    /// Parse a complete STF file held in memory.
    #[instrument(skip(buffer), err, fields(len = buffer.len()))]
    pub fn from_bytes(buffer: &[u8], options: ReaderOptions) -> Result<StringTableReader> {
        let mut reader = SectionReader::new(buffer);

        let header = reader.bytes(Section::Header, 0, HEADER.len() as u64)?;
        if options.verify_header && header[..2] != HEADER[..2] {
            return Err(Error::InvalidHeader([header[0], header[1]]));
        }

        let row_count = reader.field(Section::Header, 0)?;
        debug!(row_count, "reading sections");

        let values = read_values(&mut reader, row_count, options.row_numbering)?;
        let keys = read_keys(&mut reader, row_count, options.row_numbering)?;

        if reader.remaining() > 0 {
            debug!(trailing = reader.remaining(), "ignoring bytes after key section");
        }

        let entries = assemble(row_count, values, keys, options.row_numbering)?;

        Ok(StringTableReader { row_count, entries })
    }

    /// Number of rows declared in the file header.
    pub fn row_count(&self) -> usize {
        self.row_count as usize
    }

    /// Number of rows that were decoded.
    ///
    /// Only differs from [`StringTableReader::row_count`] with [`RowNumbering::Lenient`].
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether this STF contains no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get a row by its 0-based position
    pub fn by_index(&self, index: usize) -> Option<&Row> {
        self.entries.get(&index)
    }

    /// Try to get a value from this file by it's key
    pub fn by_key(&self, key: impl AsRef<str>) -> Option<&str> {
        let key = key.as_ref();
        self.entries
            .values()
            .find(|row| row.key == key)
            .map(|row| row.value.as_str())
    }

    /// Iterate over the decoded rows and their positions
    pub fn rows(&self) -> impl Iterator<Item = (usize, &Row)> {
        self.entries.iter().map(|(index, row)| (*index, row))
    }

    /// Iterate over the keys in row order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|row| row.key.as_str())
    }

    /// Values indexed by their 0-based row position
    pub fn values(&self) -> BTreeMap<usize, &str> {
        self.entries
            .iter()
            .map(|(index, row)| (*index, row.value.as_str()))
            .collect()
    }

    /// Consume the reader, keeping only the values indexed by row position
    pub fn into_values(self) -> BTreeMap<usize, String> {
        self.entries
            .into_iter()
            .map(|(index, row)| (index, row.value))
            .collect()
    }

    /// Consume the reader into an ordered table.
    ///
    /// Gaps left by [`RowNumbering::Lenient`] are closed, shifting the following rows down.
    pub fn into_table(self) -> StringTable {
        self.entries.into_values().collect()
    }
}

fn insert(
    map: &mut HashMap<u32, String>,
    section: Section,
    row: u32,
    text: String,
    numbering: RowNumbering,
) -> Result<()> {
    if map.insert(row, text).is_some() {
        match numbering {
            RowNumbering::Strict => return Err(Error::DuplicateRow { section, row }),
            RowNumbering::Lenient => warn!(%section, row, "duplicate row number, keeping the last"),
        }
    }
    Ok(())
}

fn read_values(
    reader: &mut SectionReader<'_>,
    row_count: u32,
    numbering: RowNumbering,
) -> Result<HashMap<u32, String>> {
    const MIN_RECORD: u64 = 3 * FIELD_WIDTH as u64;

    let capacity = (reader.remaining() / MIN_RECORD).min(row_count.into()) as usize;
    let mut values = HashMap::with_capacity(capacity);

    for record in 1..=row_count {
        let row = reader.field(Section::Value, record)?;
        let filler = reader.bytes(Section::Value, record, VALUE_FILLER.len() as u64)?;
        if filler != VALUE_FILLER {
            debug!(row, ?filler, "unexpected filler");
        }
        let chars = reader.field(Section::Value, record)?;
        let data = reader.bytes(
            Section::Value,
            record,
            u64::from(chars) * VALUE_CHAR_WIDTH as u64,
        )?;

        let mut text = String::with_capacity(chars as usize);
        let mut high_bytes = 0usize;
        for slot in data.chunks_exact(VALUE_CHAR_WIDTH) {
            text.push(char::from(slot[0]));
            if slot[1] != 0 {
                high_bytes += 1;
            }
        }
        if high_bytes > 0 {
            warn!(row, high_bytes, "ignoring non-zero high bytes in value");
        }

        trace!(row, chars, "read value");
        insert(&mut values, Section::Value, row, text, numbering)?;
    }

    Ok(values)
}

fn read_keys(
    reader: &mut SectionReader<'_>,
    row_count: u32,
    numbering: RowNumbering,
) -> Result<HashMap<u32, String>> {
    const MIN_RECORD: u64 = 2 * FIELD_WIDTH as u64;

    let capacity = (reader.remaining() / MIN_RECORD).min(row_count.into()) as usize;
    let mut keys = HashMap::with_capacity(capacity);

    for record in 1..=row_count {
        let row = reader.field(Section::Key, record)?;
        let chars = reader.field(Section::Key, record)?;
        let data = reader.bytes(
            Section::Key,
            record,
            u64::from(chars) * KEY_CHAR_WIDTH as u64,
        )?;

        let text = data.iter().copied().map(char::from).collect::<String>();

        trace!(row, key = %text, "read key");
        insert(&mut keys, Section::Key, row, text, numbering)?;
    }

    Ok(keys)
}

fn assemble(
    row_count: u32,
    mut values: HashMap<u32, String>,
    mut keys: HashMap<u32, String>,
    numbering: RowNumbering,
) -> Result<BTreeMap<usize, Row>> {
    let mut entries = BTreeMap::new();

    for row in 1..=row_count {
        match (values.remove(&row), keys.remove(&row)) {
            (Some(value), Some(key)) => {
                entries.insert((row - 1) as usize, Row::new(key, value));
            }
            (value, _) => {
                let section = if value.is_none() {
                    Section::Value
                } else {
                    Section::Key
                };
                match numbering {
                    RowNumbering::Strict => return Err(Error::MissingRow { section, row }),
                    RowNumbering::Lenient => warn!(%section, row, "row missing, skipping"),
                }
            }
        }
    }

    if !values.is_empty() || !keys.is_empty() {
        warn!(
            values = values.len(),
            keys = keys.len(),
            "ignoring rows numbered outside of the row count"
        );
    }

    Ok(entries)
}

/// Decode a complete STF buffer into an ordered table
pub fn decode(buffer: &[u8]) -> Result<StringTable> {
    Ok(StringTableReader::from_bytes(buffer, ReaderOptions::default())?.into_table())
}

/// Decode a complete STF buffer into its values indexed by 0-based row position
pub fn decode_values(buffer: &[u8]) -> Result<BTreeMap<usize, String>> {
    Ok(StringTableReader::from_bytes(buffer, ReaderOptions::default())?.into_values())
}

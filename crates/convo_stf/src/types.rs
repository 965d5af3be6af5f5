//! Base types for the contents of a string table

use derive_more::derive::{AsRef, Constructor, Deref, Display, Index, IntoIterator};
use std::collections::BTreeMap;

/// Fixed file header: the `0xABCD` magic number followed by seven reserved bytes
pub const HEADER: [u8; 9] = [0xCD, 0xAB, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];

/// Marker written between the row number and character count of every value record
pub const VALUE_FILLER: [u8; 4] = [0xFF; 4];

/// Bytes a single character occupies in a value record (ordinal and zero spacer)
pub const VALUE_CHAR_WIDTH: usize = 2;

/// Bytes a single character occupies in a key record
pub const KEY_CHAR_WIDTH: usize = 1;

/// Part of the file a record or character belongs to
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// The fixed header and row count
    #[display("header")]
    Header,

    /// Records holding the value strings
    #[display("value")]
    Value,

    /// Records holding the key strings
    #[display("key")]
    Key,
}

/// A single key/value pair of a string table
#[derive(Constructor, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Row {
    /// Identifier of the string, e.g. `s_1f3a`
    pub key: String,

    /// The text referenced by the key
    pub value: String,
}

impl<K: Into<String>, V: Into<String>> From<(K, V)> for Row {
    fn from((key, value): (K, V)) -> Self {
        Row::new(key.into(), value.into())
    }
}

/// An ordered list of rows
///
/// The position of a row in the table is its identity inside the file; two tables holding the
/// same rows in a different order encode to different files.
#[derive(Constructor, Clone, Debug, Default, PartialEq, Eq, AsRef, Deref, Index, IntoIterator)]
#[as_ref(forward)]
#[into_iterator(owned, ref)]
pub struct StringTable(Vec<Row>);

impl StringTable {
    /// Append a row to the end of the table
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push(Row::new(key.into(), value.into()));
    }

    /// Look up the value of the first row with the given key
    pub fn by_key(&self, key: impl AsRef<str>) -> Option<&str> {
        let key = key.as_ref();
        self.0
            .iter()
            .find(|row| row.key == key)
            .map(|row| row.value.as_str())
    }

    /// Iterate over the keys in row order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|row| row.key.as_str())
    }

    /// Values indexed by their 0-based row position
    pub fn values(&self) -> BTreeMap<usize, &str> {
        self.0
            .iter()
            .enumerate()
            .map(|(i, row)| (i, row.value.as_str()))
            .collect()
    }

    /// Consume the table, keeping only the values indexed by row position
    pub fn into_values(self) -> BTreeMap<usize, String> {
        self.0
            .into_iter()
            .enumerate()
            .map(|(i, row)| (i, row.value))
            .collect()
    }

    /// Remove every line feed from the values
    pub fn strip_newlines(&mut self) {
        for row in self.0.iter_mut() {
            row.value.retain(|c| c != '\n');
        }
    }
}

impl<R: Into<Row>> FromIterator<R> for StringTable {
    fn from_iter<T: IntoIterator<Item = R>>(iter: T) -> Self {
        StringTable(iter.into_iter().map(Into::into).collect())
    }
}

impl From<Vec<Row>> for StringTable {
    fn from(value: Vec<Row>) -> Self {
        StringTable(value)
    }
}

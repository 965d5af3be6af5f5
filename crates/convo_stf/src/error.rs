//! Error types that can be emitted from this library
//!

use miette::Diagnostic;
use thiserror::Error;

use crate::types::Section;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`polars::error::PolarsError`]
    #[cfg(feature = "polars")]
    #[error(transparent)]
    PolarsError(#[from] polars::error::PolarsError),

    /// The two magic bytes at the start of the file did not match
    #[error("invalid string table header: expected magic CD AB, found {0:02X?}")]
    #[diagnostic(help("pass a buffer produced by an STF writer, or disable header verification"))]
    InvalidHeader([u8; 2]),

    /// The buffer ended before a declared field or count could be read
    #[error("string table truncated in {section} section at record {record}: needed {needed} bytes at offset {offset}, {available} available")]
    Truncated {
        section: Section,
        record: u32,
        offset: u64,
        needed: u64,
        available: u64,
    },

    /// A character can not be represented in the slot of its section
    #[error("character {ordinal:#X} at position {position} of {section} row {row} does not fit in a single byte")]
    #[diagnostic(help("only characters with an ordinal up to 0xFF can be stored in a string table"))]
    CharacterOutOfRange {
        section: Section,
        row: u32,
        position: usize,
        ordinal: u32,
    },

    /// An integer does not fit in the requested number of bytes
    #[error("integer {value} does not fit in {width} bytes")]
    IntegerTooWide { value: u64, width: usize },

    /// An explicit integer width outside of 1..=8 was requested
    #[error("invalid integer width {0}, expected 1 to 8 bytes")]
    InvalidWidth(usize),

    /// More rows than the 4 byte row count can hold
    #[error("string table holds more rows than fit in a 32 bit row count")]
    TooManyRows,

    /// More characters in a single string than the 4 byte character count can hold
    #[error("{section} of row {row} holds more characters than fit in a 32 bit count")]
    TooManyCharacters { section: Section, row: u32 },

    /// A row number expected from the row count never appeared in a section
    #[error("row {row} is missing from the {section} section")]
    MissingRow { section: Section, row: u32 },

    /// The same row number appeared twice in one section
    #[error("row {row} appears more than once in the {section} section")]
    DuplicateRow { section: Section, row: u32 },

    /// A string reference could not be parsed
    #[error("invalid string reference {0:?}, expected @<table>:<key>")]
    InvalidReference(String),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;

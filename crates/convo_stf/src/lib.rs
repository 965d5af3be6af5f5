//! # STF Format Documentation
//!
//! This crate provides utilities to read and create files in the **STF** string table format used by
//! conversation templates. The STF format is a custom binary format that stores an ordered list of string keys
//! and values within a single file. STF files are typically identified with the `.stf` extension.
//!
//! ## File Structure
//!
//! A STF file consists of a header, followed by a list of Value entries, and a list of Key entries.
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Magic number           | 2 bytes: 0xABCD                                            |
//! | 0x0002         | Reserved               | 7 bytes: Always zero                                       |
//! | 0x0009         | Row Count              | 4 bytes: The number of rows in this file                   |
//!
//! ### Header
//!
//! The STF header consists of the following fields:
//!
//! - **Magic Number**: A 2-byte identifier set to `0xABCD`. Readers skip it unless asked to verify it.
//! - **Reserved**: Seven zero bytes.
//! - **Row Count**: A 4-byte unsigned integer indicating the number of rows in each of the two lists.
//!
//! ### Value List
//!
//! After the header, the STF file contains one record per row holding its value. Records are written in row order,
//! but readers associate them with rows through the row number. Each record has the following structure:
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Row                    | 4 bytes: 1-based row number                             |
//! | 0x0004         | Filler                 | 4 bytes: Fixed value of 0xFFFFFFFF                      |
//! | 0x0008         | Characters             | 4 bytes: Number of characters in the string             |
//! | 0x000C         | Data                   | (Characters * 2) bytes: character byte, then 0x00       |
//!
//! ### Key List
//!
//! After the value list, the STF file contains one record per row holding its key. Unlike value records there is
//! no filler and no spacer byte between characters:
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Row                    | 4 bytes: 1-based row number                             |
//! | 0x0004         | Characters             | 4 bytes: Number of characters in the string             |
//! | 0x0008         | Data                   | (Characters) bytes: one byte per character              |
//!
//! ## Additional Information
//!
//! - **File Extension**: `.stf`
//! - **Endianness**: Little-endian for all multi-byte integers
//! - **Characters**: Only characters `U+0000..=U+00FF` can be stored, see [`write::CharacterPolicy`]
//!
//! ```
//! # fn doit() -> convo_stf::error::Result<()>
//! # {
//! use convo_stf::{decode, encode, StringTable};
//!
//! let table: StringTable = [("s_greet", "Hi"), ("s_bye", "Bye")].into_iter().collect();
//!
//! let bytes = encode(&table)?;
//! assert_eq!(decode(&bytes)?, table);
//! # Ok(())
//! # }
//! # doit().unwrap();
//! ```

pub mod error;
pub mod read;
pub mod reference;
pub mod types;
pub mod varint;
pub mod write;

#[cfg(feature = "polars")]
mod dataframe;
#[cfg(feature = "serde")]
mod serialize;

pub use read::{decode, decode_values, StringTableReader};
pub use reference::StringReference;
pub use types::{Row, StringTable};
pub use write::{encode, StringTableWriter};

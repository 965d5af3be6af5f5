//! References to a single string of a table, written as `@<table>:<key>`
//!
//! Conversation templates point at their text with references such as
//! `@conversation/tatooine_trader:s_5f1c`, where the table is the path of the STF file below the
//! string root without its extension.

use derive_more::derive::{Constructor, Display};
use std::{path::PathBuf, str::FromStr};

use crate::error::Error;
use crate::types::StringTable;

/// A parsed `@<table>:<key>` reference
#[derive(Constructor, Display, Debug, Clone, PartialEq, Eq, Hash)]
#[display("@{table}:{key}")]
pub struct StringReference {
    /// Table path, e.g. `conversation/tatooine_trader`
    pub table: String,

    /// Key of the row inside the table
    pub key: String,
}

impl StringReference {
    /// Location of the referenced STF file relative to the string root
    pub fn path(&self) -> PathBuf {
        PathBuf::from(format!("{}.stf", self.table))
    }

    /// Look up the referenced value in an already decoded table
    pub fn resolve<'a>(&self, table: &'a StringTable) -> Option<&'a str> {
        table.by_key(&self.key)
    }
}

impl FromStr for StringReference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidReference(s.to_string());

        let (table, key) = s
            .strip_prefix('@')
            .and_then(|rest| rest.split_once(':'))
            .ok_or_else(invalid)?;

        if table.is_empty() || key.is_empty() || key.contains(':') {
            return Err(invalid());
        }

        Ok(StringReference::new(table.to_string(), key.to_string()))
    }
}

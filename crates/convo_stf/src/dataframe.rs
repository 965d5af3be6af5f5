//! Conversion of string tables into polars data frames

use polars::prelude::*;

use crate::error::Result;
use crate::types::StringTable;

impl StringTable {
    /// Build a frame with `index`, `key` and `value` columns, one frame row per table row
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let index = (0..self.len() as u32).collect::<Vec<_>>();
        let keys = self.iter().map(|row| row.key.as_str()).collect::<Vec<_>>();
        let values = self.iter().map(|row| row.value.as_str()).collect::<Vec<_>>();

        Ok(df! {
            "index" => index,
            "key" => keys,
            "value" => values,
        }?)
    }
}

#[cfg(test)]
mod test {
    use crate::error::Result;
    use crate::types::StringTable;

    #[test]
    fn one_frame_row_per_table_row() -> Result<()> {
        let table: StringTable = [("s_1", "a"), ("s_2", "b")].into_iter().collect();
        let df = table.to_dataframe()?;

        assert_eq!(df.shape(), (2, 3));
        assert!(df.column("key").is_ok());
        assert!(df.column("value").is_ok());

        Ok(())
    }

    #[test]
    fn empty_table_has_columns() -> Result<()> {
        let df = StringTable::default().to_dataframe()?;

        assert_eq!(df.shape(), (0, 3));

        Ok(())
    }
}

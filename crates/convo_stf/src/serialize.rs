use std::fmt;

use serde::{
    de::{MapAccess, SeqAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Serialize,
};

use crate::types::{Row, StringTable};

/// Serializes as a `key: value` map in row order
impl Serialize for StringTable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for row in self.iter() {
            map.serialize_entry(&row.key, &row.value)?;
        }
        map.end()
    }
}

struct StringTableVisitor {}

impl StringTableVisitor {
    fn new() -> Self {
        StringTableVisitor {}
    }
}

impl<'de> Visitor<'de> for StringTableVisitor {
    type Value = Vec<Row>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string/string map or a list of [key, value] pairs")
    }

    fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut rows = Vec::with_capacity(access.size_hint().unwrap_or(0));

        while let Some((key, value)) = access.next_entry::<String, String>()? {
            rows.push(Row::new(key, value));
        }

        Ok(rows)
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut rows = Vec::with_capacity(access.size_hint().unwrap_or(0));

        while let Some((key, value)) = access.next_element::<(String, String)>()? {
            rows.push(Row::new(key, value));
        }

        Ok(rows)
    }
}

impl<'de> Deserialize<'de> for StringTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(StringTable::new(
            deserializer.deserialize_any(StringTableVisitor::new())?,
        ))
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::types::{Row, StringTable};

    #[test]
    fn serializes_in_row_order() -> serde_json::Result<()> {
        let table: StringTable = [("s_b", "second"), ("s_a", "first")].into_iter().collect();

        assert_eq!(
            serde_json::to_string(&table)?,
            r#"{"s_b":"second","s_a":"first"}"#
        );

        Ok(())
    }

    #[test]
    fn deserializes_maps_in_document_order() -> serde_json::Result<()> {
        let table: StringTable = serde_json::from_str(r#"{"z": "last?", "a": "no, first"}"#)?;

        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["z", "a"]);
        assert_eq!(table.by_key("a"), Some("no, first"));

        Ok(())
    }

    #[test]
    fn deserializes_pairs_with_repeated_keys() -> serde_json::Result<()> {
        let table: StringTable = serde_json::from_str(r#"[["s_1", "one"], ["s_1", "uno"]]"#)?;

        assert_eq!(table.len(), 2);
        assert_eq!(table[1], Row::from(("s_1", "uno")));

        Ok(())
    }

    #[test]
    fn rejects_non_string_values() {
        assert!(serde_json::from_str::<StringTable>(r#"{"s_1": 3}"#).is_err());
    }
}

use proptest::prelude::*;

use convo_stf::error::Error;
use convo_stf::{decode, decode_values, encode, Row, StringTable};

fn byte_string(max: usize) -> impl Strategy<Value = String> {
    proptest::collection::vec(any::<u8>(), 0..max)
        .prop_map(|bytes| bytes.into_iter().map(char::from).collect())
}

fn tables() -> impl Strategy<Value = StringTable> {
    proptest::collection::vec((byte_string(24), byte_string(48)), 0..32)
        .prop_map(|rows| rows.into_iter().collect())
}

proptest! {
    #[test]
    fn values_survive_roundtrip(table in tables()) {
        let values = decode_values(&encode(&table)?)?;

        prop_assert_eq!(values.len(), table.len());
        prop_assert!(values.keys().copied().eq(0..table.len()));
        for (index, row) in table.iter().enumerate() {
            prop_assert_eq!(&values[&index], &row.value);
        }
    }

    #[test]
    fn keys_survive_roundtrip(table in tables()) {
        prop_assert_eq!(decode(&encode(&table)?)?, table);
    }

    #[test]
    fn swapping_rows_only_moves_those_rows(
        table in tables().prop_filter("needs two rows", |t| t.len() >= 2),
        a in any::<prop::sample::Index>(),
        b in any::<prop::sample::Index>(),
    ) {
        let (a, b) = (a.index(table.len()), b.index(table.len()));

        let mut rows: Vec<Row> = table.iter().cloned().collect();
        rows.swap(a, b);

        let before = decode_values(&encode(&table)?)?;
        let after = decode_values(&encode(&rows)?)?;

        for index in 0..table.len() {
            let expected = if index == a {
                &before[&b]
            } else if index == b {
                &before[&a]
            } else {
                &before[&index]
            };
            prop_assert_eq!(&after[&index], expected);
        }
    }

    #[test]
    fn prefixes_never_decode(table in tables(), cut in any::<prop::sample::Index>()) {
        let data = encode(&table)?;
        let len = cut.index(data.len());

        let result = decode(&data[..len]);
        prop_assert!(matches!(result, Err(Error::Truncated { .. })), "{:?}", result);
    }

    #[test]
    fn wide_characters_are_rejected(
        table in tables(),
        wide in proptest::char::range('\u{100}', char::MAX),
    ) {
        let mut table = table;
        table.push("s_wide", wide.to_string());

        let result = encode(&table);
        prop_assert!(matches!(result, Err(Error::CharacterOutOfRange { .. })), "{:?}", result);
    }
}

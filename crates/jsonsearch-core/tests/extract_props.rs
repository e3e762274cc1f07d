use jsonsearch_core::extract_strings;
use proptest::prelude::*;
use serde_json::{Map, Value};

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-z ]{0,12}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec(("[a-z]{1,4}", inner), 0..6)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<String, Value>>())),
        ]
    })
}

/// Independent reference walk used to check the extractor.
fn expected_leaves(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => out.push(s.clone()),
        Value::Array(items) => {
            for item in items {
                expected_leaves(item, out);
            }
        }
        Value::Object(map) => {
            for (_, v) in map.iter() {
                expected_leaves(v, out);
            }
        }
        _ => {}
    }
}

proptest! {
    #[test]
    fn yields_exactly_the_string_leaves_in_order(value in arb_json()) {
        let mut expected = Vec::new();
        expected_leaves(&value, &mut expected);
        let got: Vec<String> = extract_strings(&value).into_iter().map(str::to_string).collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn survives_a_serialization_round_trip(value in arb_json()) {
        let text = serde_json::to_string(&value).unwrap();
        let reparsed: Value = serde_json::from_str(&text).unwrap();
        prop_assert_eq!(extract_strings(&reparsed), extract_strings(&value));
    }
}

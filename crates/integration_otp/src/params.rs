//! Query parameter filtering
//!
//! Request models keep every declared parameter, set or not. Before a call is
//! made the unset ones are dropped here.

use serde_json::Value;

/// Whether a parameter value counts as unset
///
/// Only `null` and the empty string are unset; `false` and `0` are real values.
#[must_use]
pub fn is_unset(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Keep the entries whose value is set, in their original order
pub fn filter_params<K, I>(params: I) -> Vec<(K, Value)>
where
    I: IntoIterator<Item = (K, Value)>,
{
    params
        .into_iter()
        .filter(|(_, value)| !is_unset(value))
        .collect()
}

/// Render a parameter value the way OTP expects it in a query string
///
/// Strings are used as-is, arrays are joined with `,`.
#[must_use]
pub fn param_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(param_to_string)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_keeps_false_and_zero() {
        let params = vec![
            ("a", Value::Null),
            ("b", json!("")),
            ("c", json!(false)),
            ("d", json!(0)),
            ("e", json!("x")),
            ("f", json!(1.5)),
        ];

        let filtered = filter_params(params);
        assert_eq!(
            filtered,
            vec![
                ("c", json!(false)),
                ("d", json!(0)),
                ("e", json!("x")),
                ("f", json!(1.5)),
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        let filtered = filter_params(Vec::<(&str, Value)>::new());
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_param_to_string() {
        assert_eq!(param_to_string(&json!("41.3,2.1")), "41.3,2.1");
        assert_eq!(param_to_string(&json!(false)), "false");
        assert_eq!(param_to_string(&json!(0)), "0");
        assert_eq!(param_to_string(&json!(804.672)), "804.672");
        assert_eq!(param_to_string(&json!(["1_A", "1_B"])), "1_A,1_B");
        assert_eq!(param_to_string(&Value::Null), "");
    }

    fn arb_value() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            Just(json!("")),
            Just(json!(false)),
            Just(json!(true)),
            Just(json!(0)),
            any::<i32>().prop_map(|n| json!(n)),
            "[a-z0-9,.:]{1,12}".prop_map(Value::String),
        ]
    }

    proptest! {
        #[test]
        fn filter_keeps_exactly_set_values_in_order(
            values in proptest::collection::vec(arb_value(), 0..24)
        ) {
            let params: Vec<(usize, Value)> = values.into_iter().enumerate().collect();
            let expected: Vec<(usize, Value)> = params
                .iter()
                .filter(|(_, v)| !v.is_null() && v.as_str() != Some(""))
                .cloned()
                .collect();

            let filtered = filter_params(params);
            prop_assert_eq!(&filtered, &expected);
            prop_assert!(filtered.windows(2).all(|w| w[0].0 < w[1].0));
        }
    }
}

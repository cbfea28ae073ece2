/// Builds a [`Value`](crate::Value) from a JSON-like literal.
///
/// ```rust
/// use toon_codec::toon;
///
/// let data = toon!({
///     "host": "edge-3",
///     "cores": 8,
///     "roles": ["ingest", "replay"]
/// });
/// assert!(data.is_object());
/// ```
#[macro_export]
macro_rules! toon {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::toon!($elem)),*])
    };

    ({}) => {
        $crate::Value::Object($crate::Map::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::Map::new();
        $(
            object.insert($key.to_string(), $crate::toon!($value));
        )*
        $crate::Value::Object(object)
    }};

    // Fallback for any other expression.
    ($other:expr) => {
        $crate::to_value(&$other).unwrap_or($crate::Value::Null)
    };
}

#[cfg(test)]
mod tests {
    use crate::{Map, Value};

    #[test]
    fn test_toon_macro_primitives() {
        assert_eq!(toon!(null), Value::Null);
        assert_eq!(toon!(true), Value::Bool(true));
        assert_eq!(toon!(false), Value::Bool(false));
        assert_eq!(toon!(42), Value::Number(42.0));
        assert_eq!(toon!(3.5), Value::Number(3.5));
        assert_eq!(toon!("hello"), Value::String("hello".to_string()));
    }

    #[test]
    fn test_toon_macro_arrays() {
        assert_eq!(toon!([]), Value::Array(vec![]));

        let arr = toon!([1, 2, 3]);
        assert_eq!(
            arr,
            Value::Array(vec![
                Value::Number(1.0),
                Value::Number(2.0),
                Value::Number(3.0)
            ])
        );
    }

    #[test]
    fn test_toon_macro_objects() {
        assert_eq!(toon!({}), Value::Object(Map::new()));

        let obj = toon!({
            "host": "edge-3",
            "cores": 8
        });

        match obj {
            Value::Object(map) => {
                assert_eq!(map.len(), 2);
                assert_eq!(map.get("host"), Some(&Value::String("edge-3".to_string())));
                assert_eq!(map.get("cores"), Some(&Value::Number(8.0)));
            }
            _ => panic!("Expected object"),
        }
    }

    #[test]
    fn test_toon_macro_nesting() {
        let value = toon!({
            "user": { "id": 1 },
            "items": [{ "sku": "A1" }, null]
        });
        let obj = value.as_object().unwrap();
        assert!(obj.get("user").is_some_and(Value::is_object));
        assert_eq!(obj.get("items").and_then(Value::as_array).map(Vec::len), Some(2));
    }
}

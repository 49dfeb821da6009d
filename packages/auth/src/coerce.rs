//! Loose value semantics for untyped stored payloads.
//!
//! Stored sessions were written by several generations of page scripts, so a
//! field can hold a string, a number, a boolean or nothing at all. These helpers
//! answer the two questions the session code asks of such a field: "is it set?"
//! ([`is_truthy`]) and "what number does it denote?" ([`to_number`]).

use serde_json::{Map, Value};

/// `null`, `false`, `0`, `NaN` and `""` are unset; everything else is set.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// First field among `keys` whose value is set.
pub fn first_truthy<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find(|value| is_truthy(value))
}

/// Numeric reading of a value. Returns `NaN` when the value denotes no number.
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(true) => 1.0,
        Value::Bool(false) => 0.0,
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => string_to_number(s),
        Value::Array(items) => match items.as_slice() {
            [] => 0.0,
            [Value::Null] => 0.0,
            [single @ (Value::Number(_) | Value::String(_) | Value::Array(_))] => to_number(single),
            _ => f64::NAN,
        },
        Value::Object(_) => f64::NAN,
    }
}

/// Numeric reading of a string: surrounding whitespace (and U+FEFF) ignored, empty is zero,
/// `0x`/`0o`/`0b` prefixes select a radix, `Infinity` is accepted.
pub fn string_to_number(raw: &str) -> f64 {
    let s = raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}');
    if s.is_empty() {
        return 0.0;
    }

    let radix = match s.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return parse_radix(&s[2..], radix);
    }

    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    // `str::parse::<f64>` also accepts "inf" and "nan", which are not numbers here.
    if !s
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
    {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
    })
    .unwrap_or(f64::NAN)
}

/// JSON encoding of a number, integral values as integers.
pub fn number_value(n: f64) -> Value {
    const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        for falsy in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
            assert!(!is_truthy(&falsy), "{falsy} should be unset");
        }
        for truthy in [json!(true), json!(1), json!(-2.5), json!("0"), json!([]), json!({})] {
            assert!(is_truthy(&truthy), "{truthy} should be set");
        }
    }

    #[test]
    fn test_string_numbers() {
        assert_eq!(string_to_number("42"), 42.0);
        assert_eq!(string_to_number("  7 "), 7.0);
        assert_eq!(string_to_number("   "), 0.0);
        assert_eq!(string_to_number("\u{FEFF}5"), 5.0);
        assert_eq!(string_to_number(" 5\u{FEFF}\n"), 5.0);
        assert_eq!(string_to_number("\u{FEFF}"), 0.0);
        assert_eq!(string_to_number("1.5e3"), 1500.0);
        assert_eq!(string_to_number("-.5"), -0.5);
        assert_eq!(string_to_number("0x1F"), 31.0);
        assert_eq!(string_to_number("0b101"), 5.0);
        assert_eq!(string_to_number("0o17"), 15.0);
        assert_eq!(string_to_number("Infinity"), f64::INFINITY);
        assert!(string_to_number("abc").is_nan());
        assert!(string_to_number("12px").is_nan());
        assert!(string_to_number("inf").is_nan());
        assert!(string_to_number("NaN").is_nan());
        assert!(string_to_number("0x").is_nan());
        assert!(string_to_number("0xZZ").is_nan());
    }

    #[test]
    fn test_value_numbers() {
        assert_eq!(to_number(&json!(true)), 1.0);
        assert_eq!(to_number(&json!(false)), 0.0);
        assert_eq!(to_number(&json!(12)), 12.0);
        assert_eq!(to_number(&json!([])), 0.0);
        assert_eq!(to_number(&json!(["8"])), 8.0);
        assert_eq!(to_number(&json!([[3]])), 3.0);
        assert!(to_number(&json!([true])).is_nan());
        assert!(to_number(&json!([1, 2])).is_nan());
        assert!(to_number(&json!({"a": 1})).is_nan());
    }

    #[test]
    fn test_first_truthy() {
        let value = json!({"a": "", "b": 0, "c": "x", "d": "y"});
        let map = value.as_object().unwrap();
        assert_eq!(first_truthy(map, &["a", "b", "c", "d"]), Some(&json!("x")));
        assert_eq!(first_truthy(map, &["a", "b", "missing"]), None);
    }

    #[test]
    fn test_number_value_keeps_integers() {
        assert_eq!(number_value(3.0), json!(3));
        assert_eq!(number_value(2.5), json!(2.5));
        assert_eq!(number_value(1_704_067_200_000.0), json!(1_704_067_200_000_i64));
    }
}

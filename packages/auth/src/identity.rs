//! # Identity extraction
//!
//! The astronomer's identity has been stored under a different field name by
//! almost every schema revision. [`ID_ALIASES`] lists them from most specific and
//! most recent to least, and [`pick_astronomo_id`] takes the first usable one.
//!
//! A value is usable when it is neither `null` nor the empty string. Usable values
//! that denote a finite number come back as [`AstronomoId::Number`]; anything else
//! (`"abc"`, an object) is returned untouched as [`AstronomoId::Raw`].

use serde_json::{Map, Value};

use crate::coerce::{number_value, to_number};

/// Identity field names in priority order.
pub const ID_ALIASES: [&str; 8] = [
    "id_astronomo",
    "astronomo_id",
    "id",
    "user_id",
    "usuario_id",
    "assistant_id",
    "row_number",
    "row_num",
];

#[derive(Clone, Debug, PartialEq)]
pub enum AstronomoId {
    Number(f64),
    Raw(Value),
}

impl AstronomoId {
    pub fn to_value(&self) -> Value {
        match self {
            AstronomoId::Number(n) => number_value(*n),
            AstronomoId::Raw(value) => value.clone(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            AstronomoId::Number(n) => Some(*n),
            AstronomoId::Raw(_) => None,
        }
    }
}

impl From<AstronomoId> for Value {
    fn from(id: AstronomoId) -> Self {
        id.to_value()
    }
}

/// Identity of `obj`, or `None` when `obj` is not an object or has no usable alias.
pub fn pick_astronomo_id(obj: &Value) -> Option<AstronomoId> {
    pick_astronomo_id_in(obj.as_object()?)
}

pub fn pick_astronomo_id_in(map: &Map<String, Value>) -> Option<AstronomoId> {
    let value = ID_ALIASES
        .iter()
        .filter_map(|alias| map.get(*alias))
        .find(|value| !value.is_null() && value.as_str() != Some(""))?;

    let n = to_number(value);
    if n.is_finite() {
        Some(AstronomoId::Number(n))
    } else {
        Some(AstronomoId::Raw(value.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_alias_is_none() {
        assert_eq!(pick_astronomo_id(&json!({})), None);
        assert_eq!(pick_astronomo_id(&json!({"nome": "Ana", "uid": 4})), None);
        assert_eq!(pick_astronomo_id(&json!("id")), None);
        assert_eq!(pick_astronomo_id(&json!(null)), None);
    }

    #[test]
    fn test_priority_and_coercion() {
        let id = pick_astronomo_id(&json!({"id": "9", "id_astronomo": "5"}));
        assert_eq!(id, Some(AstronomoId::Number(5.0)));
        assert_eq!(id.unwrap().to_value(), json!(5));
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        assert_eq!(
            pick_astronomo_id(&json!({"id": "\u{FEFF}5"})),
            Some(AstronomoId::Number(5.0))
        );
    }

    #[test]
    fn test_non_numeric_kept_as_is() {
        assert_eq!(
            pick_astronomo_id(&json!({"id": "abc"})),
            Some(AstronomoId::Raw(json!("abc")))
        );
    }

    #[test]
    fn test_unusable_values_are_skipped() {
        let obj = json!({"id_astronomo": null, "astronomo_id": "", "id": 0, "user_id": 7});
        assert_eq!(pick_astronomo_id(&obj), Some(AstronomoId::Number(0.0)));

        let obj = json!({"id_astronomo": null, "row_num": "12"});
        assert_eq!(pick_astronomo_id(&obj), Some(AstronomoId::Number(12.0)));
    }

    #[test]
    fn test_first_usable_alias_wins_even_if_not_numeric() {
        let obj = json!({"astronomo_id": "x-1", "id": 3});
        assert_eq!(pick_astronomo_id(&obj), Some(AstronomoId::Raw(json!("x-1"))));
    }
}

//! # Legacy session normalization
//!
//! Older page scripts stored the session under `userSession`, sometimes flat and
//! sometimes nested under an `astronomer` object next to `loginTime`/`token`.
//! [`normalize_legacy_session`] turns either shape into a canonical [`Session`]:
//!
//! 1. The *base* is `legacy.astronomer` when that is an object, else `legacy`.
//! 2. Every base field is carried through, then the canonical fields are
//!    overwritten (see the table in [`crate::session`]).
//! 3. `loginTime` and `token` are read from the outer record first, then the base.
//! 4. `timestamp` is `loginTime` in epoch milliseconds, or the clock's "now" when
//!    that is missing or unparsable.
//!
//! The result always has `loggedIn: true`, a numeric `timestamp`, and equal
//! `username`/`usuario` and `sessionId`/`session_id` pairs.

use serde_json::{Map, Value};

use crate::clock::Clock;
use crate::coerce::{first_truthy, number_value};
use crate::identity::pick_astronomo_id_in;
use crate::session::Session;
use crate::timestamp::parse_login_time;

const USERNAME_SOURCES: [&str; 3] = ["usuario", "username", "astronomo"];
const DISPLAY_NAME_SOURCES: [&str; 4] = ["astronomo", "nome_completo", "nome", "usuario"];
const SESSION_ID_SOURCES: [&str; 2] = ["sessionId", "session_id"];

/// Canonical form of a legacy record, `None` unless `legacy` is an object.
pub fn normalize_legacy_session<C: Clock + ?Sized>(legacy: Option<&Value>, clock: &C) -> Option<Session> {
    let legacy = legacy?.as_object()?;
    let base = match legacy.get("astronomer") {
        Some(Value::Object(nested)) => nested,
        _ => legacy,
    };

    let id = pick_astronomo_id_in(base);
    let login_time = outer_then_base(legacy, base, "loginTime");
    let token = outer_then_base(legacy, base, "token");
    let timestamp = login_time
        .and_then(Value::as_str)
        .and_then(parse_login_time)
        .unwrap_or_else(|| clock.now_millis());

    let username = owned_or_null(first_truthy(base, &USERNAME_SOURCES));
    let astronomo = owned_or_null(first_truthy(base, &DISPLAY_NAME_SOURCES));
    let session_id = owned_or_null(token.or_else(|| first_truthy(base, &SESSION_ID_SOURCES)));

    let mut fields: Map<String, Value> = base.clone();
    fields.insert("loggedIn".into(), Value::Bool(true));
    fields.insert("username".into(), username.clone());
    fields.insert("usuario".into(), username);
    fields.insert("astronomo".into(), astronomo);
    fields.insert(
        "id_astronomo".into(),
        id.map(Value::from).unwrap_or(Value::Null),
    );
    fields.insert("sessionId".into(), session_id.clone());
    fields.insert("session_id".into(), session_id);
    fields.insert("loginTime".into(), owned_or_null(login_time));
    fields.insert("timestamp".into(), number_value(timestamp));

    Some(Session::new(fields))
}

fn outer_then_base<'a>(
    legacy: &'a Map<String, Value>,
    base: &'a Map<String, Value>,
    field: &str,
) -> Option<&'a Value> {
    first_truthy(legacy, &[field]).or_else(|| first_truthy(base, &[field]))
}

fn owned_or_null(value: Option<&Value>) -> Value {
    value.cloned().unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use serde_json::json;

    const NOW: FixedClock = FixedClock(1_750_000_000_000.0);

    #[test]
    fn test_non_objects_are_none() {
        assert_eq!(normalize_legacy_session(None, &NOW), None);
        assert_eq!(normalize_legacy_session(Some(&json!(null)), &NOW), None);
        assert_eq!(normalize_legacy_session(Some(&json!("ana")), &NOW), None);
        assert_eq!(normalize_legacy_session(Some(&json!([1, 2])), &NOW), None);
    }

    #[test]
    fn test_nested_legacy_shape() {
        let legacy = json!({
            "astronomer": {"usuario": "ana", "id": "3"},
            "loginTime": "2024-01-01T00:00:00Z",
        });
        let session = normalize_legacy_session(Some(&legacy), &NOW).unwrap();

        assert!(session.logged_in());
        assert_eq!(session.usuario(), Some("ana"));
        assert_eq!(session.username(), Some("ana"));
        assert_eq!(session.astronomo(), Some("ana"));
        assert_eq!(session.id_astronomo(), Some(&json!(3)));
        assert_eq!(session.login_time(), Some("2024-01-01T00:00:00Z"));
        assert_eq!(session.timestamp(), Some(1_704_067_200_000.0));
        // Base fields are spread through, the outer wrapper is not.
        assert_eq!(session.get("id"), Some(&json!("3")));
        assert_eq!(session.get("astronomer"), None);
    }

    #[test]
    fn test_flat_legacy_shape_keeps_extra_fields() {
        let legacy = json!({
            "nome_completo": "Carl Sagan",
            "username": "carl",
            "token": "abc123",
            "observatorio": "Arecibo",
            "row_number": 41,
        });
        let session = normalize_legacy_session(Some(&legacy), &NOW).unwrap();

        assert_eq!(session.username(), Some("carl"));
        assert_eq!(session.usuario(), Some("carl"));
        assert_eq!(session.astronomo(), Some("Carl Sagan"));
        assert_eq!(session.id_astronomo(), Some(&json!(41)));
        assert_eq!(session.get("sessionId"), Some(&json!("abc123")));
        assert_eq!(session.get("session_id"), Some(&json!("abc123")));
        assert_eq!(session.get("observatorio"), Some(&json!("Arecibo")));
        assert_eq!(session.get("loginTime"), Some(&json!(null)));
        assert_eq!(session.timestamp(), Some(NOW.0));
    }

    #[test]
    fn test_outer_token_and_login_time_take_precedence() {
        let legacy = json!({
            "astronomer": {"usuario": "ana", "token": "inner", "loginTime": "2020-01-01"},
            "token": "outer",
            "loginTime": "",
        });
        let session = normalize_legacy_session(Some(&legacy), &NOW).unwrap();
        assert_eq!(session.session_id(), Some("outer"));
        assert_eq!(session.login_time(), Some("2020-01-01"));
        assert_eq!(session.timestamp(), Some(1_577_836_800_000.0));
    }

    #[test]
    fn test_existing_session_id_aliases_are_synced() {
        let legacy = json!({"usuario": "ana", "session_id": "s-1"});
        let session = normalize_legacy_session(Some(&legacy), &NOW).unwrap();
        assert_eq!(session.get("sessionId"), Some(&json!("s-1")));
        assert_eq!(session.get("session_id"), Some(&json!("s-1")));
    }

    #[test]
    fn test_unparsable_login_time_falls_back_to_now() {
        let legacy = json!({"usuario": "ana", "loginTime": "ontem"});
        let session = normalize_legacy_session(Some(&legacy), &NOW).unwrap();
        assert_eq!(session.login_time(), Some("ontem"));
        assert_eq!(session.timestamp(), Some(NOW.0));
    }

    #[test]
    fn test_empty_record_still_normalizes() {
        let session = normalize_legacy_session(Some(&json!({})), &NOW).unwrap();
        assert!(session.logged_in());
        assert_eq!(session.id_astronomo(), None);
        assert_eq!(session.username(), None);
        assert_eq!(session.timestamp(), Some(NOW.0));
    }

    #[test]
    fn test_non_object_astronomer_is_ignored() {
        let legacy = json!({"astronomer": "ana", "id": 2});
        let session = normalize_legacy_session(Some(&legacy), &NOW).unwrap();
        assert_eq!(session.id_astronomo(), Some(&json!(2)));
        assert_eq!(session.astronomo(), None);
        assert_eq!(session.get("astronomer"), Some(&json!("ana")));
    }
}

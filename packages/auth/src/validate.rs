use serde_json::{Map, Value};

use crate::coerce::is_truthy;
use crate::session::Session;

const TOKEN_FIELDS: [&str; 4] = ["loginTime", "token", "sessionId", "session_id"];
const NAME_FIELDS: [&str; 3] = ["usuario", "username", "astronomo"];

/// Whether `session` carries any signal of a logged-in user.
///
/// Deliberately permissive: an explicit `loggedIn: true`, any token-like field,
/// a non-null `id_astronomo` or any name is enough.
pub fn has_active_session(session: &Value) -> bool {
    session.as_object().is_some_and(is_active_map)
}

pub(crate) fn is_active_map(fields: &Map<String, Value>) -> bool {
    let set = |field: &&str| fields.get(*field).is_some_and(is_truthy);

    fields.get("loggedIn") == Some(&Value::Bool(true))
        || TOKEN_FIELDS.iter().any(set)
        || fields.get("id_astronomo").is_some_and(|id| !id.is_null())
        || NAME_FIELDS.iter().any(set)
}

impl Session {
    pub fn is_active(&self) -> bool {
        is_active_map(self.as_map())
    }
}

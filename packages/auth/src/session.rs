//! # Canonical session
//!
//! [`Session`] is the normalized shape stored under the primary key. It stays an
//! open JSON object: legacy records carry arbitrary extra fields and those must
//! survive normalization and re-serialization untouched. The typed accessors
//! below cover the fields the guard and pages actually read.
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `loggedIn` | explicit active flag |
//! | `username` / `usuario` | login name, kept equal |
//! | `astronomo` | display name |
//! | `id_astronomo` | resolved identity, number or raw value |
//! | `sessionId` / `session_id` | opaque token, kept equal |
//! | `loginTime` | original textual timestamp |
//! | `timestamp` | creation or migration time in epoch milliseconds |

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::coerce::number_value;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Session(Map<String, Value>);

impl Session {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Fresh canonical session for `usuario`, as written by the login page.
    pub fn for_user(usuario: &str, timestamp: f64) -> Self {
        let mut fields = Map::new();
        fields.insert("loggedIn".into(), Value::Bool(true));
        fields.insert("username".into(), Value::from(usuario));
        fields.insert("usuario".into(), Value::from(usuario));
        fields.insert("astronomo".into(), Value::from(usuario));
        fields.insert("timestamp".into(), number_value(timestamp));
        Self(fields)
    }

    /// Wrap `value` if it is a JSON object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    fn str_field(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn logged_in(&self) -> bool {
        self.0.get("loggedIn") == Some(&Value::Bool(true))
    }

    pub fn username(&self) -> Option<&str> {
        self.str_field("username")
    }

    pub fn usuario(&self) -> Option<&str> {
        self.str_field("usuario")
    }

    pub fn astronomo(&self) -> Option<&str> {
        self.str_field("astronomo")
    }

    pub fn id_astronomo(&self) -> Option<&Value> {
        self.0.get("id_astronomo").filter(|id| !id.is_null())
    }

    pub fn session_id(&self) -> Option<&str> {
        self.str_field("sessionId")
            .or_else(|| self.str_field("session_id"))
    }

    pub fn login_time(&self) -> Option<&str> {
        self.str_field("loginTime")
    }

    pub fn timestamp(&self) -> Option<f64> {
        self.0.get("timestamp").and_then(Value::as_f64)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Serialized form written to storage.
    pub fn to_json(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }
}

impl From<Session> for Value {
    fn from(session: Session) -> Self {
        Value::Object(session.0)
    }
}

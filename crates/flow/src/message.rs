use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use rolegate_core::MessageId;

static NULL: Value = Value::Null;

/// Authorization context attached to a message by an upstream authentication
/// step (typically a decoded bearer token).
///
/// Held as raw JSON: whatever upstream put there is carried through
/// unchanged, including shapes that carry no usable role (an undecoded token
/// string, a numeric role). Nothing here decodes or verifies a token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(Value);

impl AuthToken {
    pub fn new() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn with_role(self, role: impl Into<String>) -> Self {
        self.with_claim("role", Value::String(role.into()))
    }

    /// Set a claim; a token that is not a JSON object is replaced by one.
    pub fn with_claim(mut self, key: impl Into<String>, value: Value) -> Self {
        if !self.0.is_object() {
            self.0 = Value::Object(Map::new());
        }
        if let Value::Object(claims) = &mut self.0 {
            claims.insert(key.into(), value);
        }
        self
    }

    /// The asserted role, exactly as issued. `None` unless the token is an
    /// object whose `role` is a string.
    pub fn role(&self) -> Option<&str> {
        self.0.get("role").and_then(Value::as_str)
    }

    pub fn claim(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

impl Default for AuthToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Present-but-null stays `Some(Value::Null)`, so it is written back out.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// A message travelling through a flow.
///
/// The JSON shape matches what flow runtimes exchange: `_msgid`, `token`,
/// `payload`, `statusCode`, plus any other top-level properties. Whatever was
/// read is written back the same way; absent fields stay absent. Only
/// `_msgid` is filled in (with a fresh id) when missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "_msgid", default)]
    msg_id: MessageId,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    token: Option<AuthToken>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    payload: Option<Value>,

    #[serde(rename = "statusCode", default, skip_serializing_if = "Option::is_none")]
    status_code: Option<u16>,

    #[serde(flatten)]
    properties: Map<String, Value>,
}

impl Message {
    pub fn new(payload: Value) -> Self {
        Self::with_id(MessageId::generate(), payload)
    }

    pub fn with_id(msg_id: MessageId, payload: Value) -> Self {
        Self {
            msg_id,
            token: None,
            payload: Some(payload),
            status_code: None,
            properties: Map::new(),
        }
    }

    pub fn with_token(mut self, token: AuthToken) -> Self {
        self.token = Some(token);
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    pub fn msg_id(&self) -> &MessageId {
        &self.msg_id
    }

    pub fn token(&self) -> Option<&AuthToken> {
        self.token.as_ref()
    }

    /// The payload; `null` when the message has none.
    pub fn payload(&self) -> &Value {
        self.payload.as_ref().unwrap_or(&NULL)
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn set_payload(&mut self, payload: Value) {
        self.payload = Some(payload);
    }

    pub fn set_status_code(&mut self, status_code: u16) {
        self.status_code = Some(status_code);
    }
}

//! Strongly-typed identifiers.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a message travelling through a flow.
///
/// Serialized as `_msgid`. Runtimes pick their own formats (e.g.
/// `"d5e2c6f1.8c2a38"`), so the value is kept opaque and forwarded as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Cow<'static, str>);

/// Identifier of a node inside a flow definition.
///
/// Node ids are opaque strings chosen by whoever authored the flow
/// (e.g. `"n1"`), so no format is imposed here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(Cow<'static, str>);

macro_rules! impl_str_newtype {
    ($t:ty) => {
        impl $t {
            pub fn new(id: impl Into<Cow<'static, str>>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&'static str> for $t {
            fn from(value: &'static str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $t {
            fn from(value: String) -> Self {
                Self::new(value)
            }
        }
    };
}

impl_str_newtype!(MessageId);
impl_str_newtype!(NodeId);

impl MessageId {
    /// Fresh identifier for a message that arrived without one.
    ///
    /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
    /// for determinism.
    pub fn generate() -> Self {
        Self::new(Uuid::now_v7().to_string())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::generate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_id_keeps_runtime_format() {
        let id: MessageId = serde_json::from_str("\"d5e2c6f1.8c2a38\"").unwrap();
        assert_eq!(id.as_str(), "d5e2c6f1.8c2a38");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"d5e2c6f1.8c2a38\"");
    }

    #[test]
    fn generated_message_ids_are_uuids() {
        let a = MessageId::generate();
        let b = MessageId::generate();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn node_id_serializes_as_plain_string() {
        let id = NodeId::new("n1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"n1\"");
        let back: NodeId = serde_json::from_str("\"n1\"").unwrap();
        assert_eq!(back, id);
    }
}

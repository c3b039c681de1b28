//! Node type registry.
//!
//! Maps a type name from a flow definition to the factory that builds it. The
//! registry is an ordinary value owned by the host; nothing registers itself
//! globally.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use rolegate_core::{ConfigError, ConfigResult, NodeId};

use crate::node::{CaptureNode, Node};

/// One node entry of a flow definition.
///
/// Type-specific settings (e.g. `requiredRole`) land in `props`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDef {
    pub id: NodeId,

    #[serde(rename = "type")]
    pub type_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// `wires[i]` lists the nodes fed by output `i`.
    #[serde(default)]
    pub wires: Vec<Vec<NodeId>>,

    #[serde(flatten)]
    pub props: Map<String, Value>,
}

impl NodeDef {
    pub fn new(id: impl Into<NodeId>, type_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            type_name: type_name.into(),
            name: None,
            wires: Vec::new(),
            props: Map::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_wires(mut self, wires: Vec<Vec<NodeId>>) -> Self {
        self.wires = wires;
        self
    }

    pub fn with_prop(mut self, key: impl Into<String>, value: Value) -> Self {
        self.props.insert(key.into(), value);
        self
    }

    /// A string property; `Ok(None)` when absent or null, an error when it
    /// holds anything other than a string.
    pub fn str_prop(&self, key: &str) -> ConfigResult<Option<&str>> {
        match self.props.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(ConfigError::invalid(
                &self.id,
                key,
                format!("expected a string, found {other}"),
            )),
        }
    }
}

pub type NodeFactory = Box<dyn Fn(&NodeDef) -> ConfigResult<Box<dyn Node>> + Send + Sync>;

/// Registry of node factories keyed by type name.
pub struct NodeRegistry {
    factories: HashMap<String, NodeFactory>,
}

impl NodeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// A registry with the built-in `helper` type installed.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(CaptureNode::TYPE_NAME, |def: &NodeDef| {
            Ok(Box::new(CaptureNode::new(def.id.clone(), def.name.clone())) as Box<dyn Node>)
        });
        registry
    }

    /// Install `factory` under `type_name`, replacing any previous one.
    pub fn register<F>(&mut self, type_name: impl Into<String>, factory: F)
    where
        F: Fn(&NodeDef) -> ConfigResult<Box<dyn Node>> + Send + Sync + 'static,
    {
        let type_name = type_name.into();
        tracing::debug!(node_type = %type_name, "registering node type");
        if self.factories.insert(type_name.clone(), Box::new(factory)).is_some() {
            tracing::warn!(node_type = %type_name, "node type re-registered; previous factory replaced");
        }
    }

    /// Build the node described by `def`.
    pub fn create(&self, def: &NodeDef) -> ConfigResult<Box<dyn Node>> {
        let factory = self
            .factories
            .get(&def.type_name)
            .ok_or_else(|| ConfigError::UnknownNodeType {
                node: def.id.clone(),
                type_name: def.type_name.clone(),
            })?;
        factory(def)
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl core::fmt::Debug for NodeRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut types: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        types.sort_unstable();
        f.debug_struct("NodeRegistry").field("types", &types).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn node_def_parses_flow_json() {
        let def: NodeDef = serde_json::from_value(json!({
            "id": "n1",
            "type": "role-check",
            "name": "test-node",
            "requiredRole": "admin",
            "wires": [["n2"], ["n3"]],
        }))
        .unwrap();

        assert_eq!(def.id, NodeId::new("n1"));
        assert_eq!(def.type_name, "role-check");
        assert_eq!(def.name.as_deref(), Some("test-node"));
        assert_eq!(def.wires, vec![vec![NodeId::new("n2")], vec![NodeId::new("n3")]]);
        assert_eq!(def.str_prop("requiredRole"), Ok(Some("admin")));
    }

    #[test]
    fn str_prop_rejects_non_strings() {
        let def = NodeDef::new("n1", "role-check").with_prop("requiredRole", json!(7));
        assert!(matches!(
            def.str_prop("requiredRole"),
            Err(ConfigError::InvalidProperty { .. })
        ));
        assert_eq!(def.str_prop("absent"), Ok(None));
    }

    #[test]
    fn unknown_type_is_a_config_error() {
        let registry = NodeRegistry::with_builtins();
        let err = registry.create(&NodeDef::new("n9", "mystery")).err().unwrap();
        assert_eq!(
            err,
            ConfigError::UnknownNodeType {
                node: NodeId::new("n9"),
                type_name: "mystery".to_string(),
            }
        );
    }

    #[test]
    fn builtins_include_helper() {
        let registry = NodeRegistry::with_builtins();
        let node = registry
            .create(&NodeDef::new("n2", "helper").with_name("sink"))
            .unwrap();
        assert_eq!(node.type_name(), "helper");
        assert_eq!(node.name(), Some("sink"));
    }
}

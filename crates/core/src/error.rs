//! Configuration error model.

use thiserror::Error;

use crate::NodeId;

/// Result type used when building nodes and flows.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Deployment-time configuration failure.
///
/// These are raised while a flow definition is being turned into live nodes.
/// Per-message outcomes (such as an access denial) are never expressed here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A property is present but has the wrong shape.
    #[error("node '{node}': invalid property '{property}': {reason}")]
    InvalidProperty {
        node: NodeId,
        property: String,
        reason: String,
    },

    /// No factory is registered for the node type.
    #[error("node '{node}': unknown node type '{type_name}'")]
    UnknownNodeType { node: NodeId, type_name: String },

    /// Two definitions share the same id.
    #[error("duplicate node id '{0}'")]
    DuplicateNode(NodeId),

    /// A wire points at a node that is not part of the flow.
    #[error("node '{from}': wire to unknown node '{to}'")]
    UnknownWireTarget { from: NodeId, to: NodeId },

    /// More wire groups were declared than the node has outputs.
    #[error("node '{node}': {wired} wire groups but only {outputs} outputs")]
    TooManyOutputs {
        node: NodeId,
        wired: usize,
        outputs: usize,
    },
}

impl ConfigError {
    pub fn invalid(node: &NodeId, property: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidProperty {
            node: node.clone(),
            property: property.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_node() {
        let err = ConfigError::invalid(&NodeId::new("n1"), "requiredRole", "expected a string");
        assert_eq!(
            err.to_string(),
            "node 'n1': invalid property 'requiredRole': expected a string"
        );

        let err = ConfigError::TooManyOutputs {
            node: NodeId::new("n2"),
            wired: 3,
            outputs: 2,
        };
        assert_eq!(err.to_string(), "node 'n2': 3 wire groups but only 2 outputs");
    }
}

//! Role-check gate: a two-output access decision for flow messages.
//!
//! - No IO
//! - No panics
//! - No errors across the boundary: a denial is a routing outcome

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use rolegate_core::{ConfigResult, NodeId};
use rolegate_flow::{Message, Node, NodeDef, NodeRegistry, Outputs};

use crate::Role;
use crate::claims::claim_role;

/// Output receiving messages whose claim satisfies the requirement.
pub const ALLOW_PORT: usize = 0;

/// Output receiving denied messages.
pub const DENY_PORT: usize = 1;

/// Status code stamped on denied messages.
pub const FORBIDDEN: u16 = 403;

/// Gate configuration, fixed when the gate is created.
///
/// An empty or whitespace-only role leaves the gate misconfigured, and a
/// misconfigured gate denies everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    required_role: String,
    normalized: Option<Role>,
}

impl GateConfig {
    pub fn new(required_role: impl Into<String>) -> Self {
        let required_role = required_role.into();
        let normalized = if required_role.trim().is_empty() {
            None
        } else {
            Some(Role::normalized(&required_role))
        };
        Self {
            required_role,
            normalized,
        }
    }

    /// Configuration for a definition that never named a role.
    pub fn unset() -> Self {
        Self::new(String::new())
    }

    /// The role exactly as configured; used verbatim in denial messages.
    pub fn required_role(&self) -> &str {
        &self.required_role
    }

    /// The uppercased requirement claims are compared against.
    pub fn normalized_role(&self) -> Option<&Role> {
        self.normalized.as_ref()
    }

    pub fn is_well_formed(&self) -> bool {
        self.normalized.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    /// The message carried no role claim.
    MissingClaim,
    /// A claim was present but is not the required role.
    RoleMismatch,
    /// The gate has no usable required role.
    Misconfigured,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied(DenialKind),
}

/// Body placed in `payload` of a denied message.
///
/// The JSON shape `{"ok": false, "message": "Access denied: <role> only"}` is
/// what callers already parse; keep it stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenialBody {
    pub ok: bool,
    pub message: String,
}

impl DenialBody {
    pub fn for_role(required_role: &str) -> Self {
        Self {
            ok: false,
            message: format!("Access denied: {required_role} only"),
        }
    }

    pub fn into_value(self) -> Value {
        json!({ "ok": self.ok, "message": self.message })
    }
}

/// The single place a message went.
#[derive(Debug, Clone, PartialEq)]
pub enum Routed {
    /// Forwarded unchanged on [`ALLOW_PORT`].
    Allowed(Message),
    /// Stamped with [`FORBIDDEN`] and a [`DenialBody`], forwarded on [`DENY_PORT`].
    Denied(Message),
}

impl Routed {
    pub fn port(&self) -> usize {
        match self {
            Routed::Allowed(_) => ALLOW_PORT,
            Routed::Denied(_) => DENY_PORT,
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Routed::Allowed(_))
    }

    pub fn message(&self) -> &Message {
        match self {
            Routed::Allowed(m) | Routed::Denied(m) => m,
        }
    }

    pub fn into_message(self) -> Message {
        match self {
            Routed::Allowed(m) | Routed::Denied(m) => m,
        }
    }

    pub fn into_outputs(self) -> Outputs {
        let port = self.port();
        Outputs::on(port, self.into_message())
    }
}

/// Decide whether `message` may pass `config`, without touching it.
pub fn decide(message: &Message, config: &GateConfig) -> Decision {
    let Some(required) = config.normalized_role() else {
        return Decision::Denied(DenialKind::Misconfigured);
    };

    match claim_role(message) {
        None => Decision::Denied(DenialKind::MissingClaim),
        Some(claim) if required.matches(claim) => Decision::Allowed,
        Some(_) => Decision::Denied(DenialKind::RoleMismatch),
    }
}

/// Route `message` through a gate configured with `config`.
///
/// Allowed messages come back untouched. Denied ones get `statusCode = 403`
/// and their payload replaced by the denial body.
pub fn evaluate(mut message: Message, config: &GateConfig) -> Routed {
    match decide(&message, config) {
        Decision::Allowed => Routed::Allowed(message),
        Decision::Denied(_) => {
            message.set_status_code(FORBIDDEN);
            message.set_payload(DenialBody::for_role(config.required_role()).into_value());
            Routed::Denied(message)
        }
    }
}

/// A deployed role-check node.
#[derive(Debug, Clone)]
pub struct RoleGate {
    id: NodeId,
    name: Option<String>,
    config: GateConfig,
}

impl RoleGate {
    pub const TYPE_NAME: &'static str = "role-check";

    /// Property of the flow definition holding the required role.
    pub const REQUIRED_ROLE_PROP: &'static str = "requiredRole";

    pub fn new(id: NodeId, name: Option<String>, config: GateConfig) -> Self {
        if !config.is_well_formed() {
            tracing::warn!(node = %id, "role-check has no required role; every message will be denied");
        }
        Self { id, name, config }
    }

    /// Build a gate from its flow definition.
    ///
    /// A missing, null or blank `requiredRole` yields a deny-all gate; a
    /// non-string value is rejected.
    pub fn from_def(def: &NodeDef) -> ConfigResult<Self> {
        let config = match def.str_prop(Self::REQUIRED_ROLE_PROP)? {
            Some(role) => GateConfig::new(role),
            None => GateConfig::unset(),
        };
        Ok(Self::new(def.id.clone(), def.name.clone(), config))
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn decide(&self, message: &Message) -> Decision {
        decide(message, &self.config)
    }

    pub fn evaluate(&self, message: Message) -> Routed {
        let routed = evaluate(message, &self.config);
        tracing::debug!(
            node = %self.id,
            msg_id = %routed.message().msg_id(),
            required_role = %self.config.required_role(),
            allowed = routed.is_allowed(),
            "access decision"
        );
        routed
    }
}

impl Node for RoleGate {
    fn id(&self) -> &NodeId {
        &self.id
    }

    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn output_count(&self) -> usize {
        2
    }

    fn receive(&self, message: Message) -> Outputs {
        self.evaluate(message).into_outputs()
    }
}

/// Install the `role-check` node type.
pub fn register(registry: &mut NodeRegistry) {
    registry.register(RoleGate::TYPE_NAME, |def: &NodeDef| {
        Ok(Box::new(RoleGate::from_def(def)?) as Box<dyn Node>)
    });
}

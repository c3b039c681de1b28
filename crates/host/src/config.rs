//! Host configuration, read once from the environment at startup.

use std::path::PathBuf;

use thiserror::Error;

use rolegate_core::NodeId;
use rolegate_flow::DEFAULT_MAX_DELIVERIES;
use rolegate_observability::LogFormat;

pub const FLOW_VAR: &str = "ROLEGATE_FLOW";
pub const ENTRY_VAR: &str = "ROLEGATE_ENTRY";
pub const LOG_FORMAT_VAR: &str = "ROLEGATE_LOG_FORMAT";
pub const MAX_DELIVERIES_VAR: &str = "ROLEGATE_MAX_DELIVERIES";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// Flow definition (JSON array of nodes).
    pub flow_path: PathBuf,
    /// Node that receives each input message.
    pub entry: NodeId,
    pub log_format: LogFormat,
    pub max_deliveries: usize,
}

impl HostConfig {
    pub fn from_env() -> Result<Self, HostConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, HostConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let flow_path = get(FLOW_VAR)
            .map(PathBuf::from)
            .ok_or(HostConfigError::Missing(FLOW_VAR))?;

        let entry = get(ENTRY_VAR)
            .map(|v| NodeId::new(v.trim().to_string()))
            .ok_or(HostConfigError::Missing(ENTRY_VAR))?;

        let log_format = get(LOG_FORMAT_VAR)
            .map(|v| LogFormat::from_name(&v))
            .unwrap_or_default();

        let max_deliveries = match get(MAX_DELIVERIES_VAR) {
            None => DEFAULT_MAX_DELIVERIES,
            Some(v) => match v.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                Ok(_) => {
                    return Err(HostConfigError::Invalid {
                        var: MAX_DELIVERIES_VAR,
                        reason: "must be greater than zero".to_string(),
                    });
                }
                Err(e) => {
                    return Err(HostConfigError::Invalid {
                        var: MAX_DELIVERIES_VAR,
                        reason: e.to_string(),
                    });
                }
            },
        };

        Ok(Self {
            flow_path,
            entry,
            log_format,
            max_deliveries,
        })
    }
}

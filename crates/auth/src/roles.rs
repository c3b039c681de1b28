use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role identifier used for access checks.
///
/// Roles are opaque strings at this layer. Comparison is exact; any case
/// folding is done explicitly by the caller via [`Role::normalized`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Uppercased form of `name`, the canonical spelling roles are issued in.
    pub fn normalized(name: &str) -> Self {
        Self(Cow::Owned(name.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact, case-sensitive match against a raw claim.
    pub fn matches(&self, claim: &str) -> bool {
        self.as_str() == claim
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_uppercases() {
        assert_eq!(Role::normalized("admin").as_str(), "ADMIN");
        assert_eq!(Role::normalized("Facility-Manager").as_str(), "FACILITY-MANAGER");
    }

    #[test]
    fn normalized_uses_full_unicode_case_mapping() {
        assert_eq!(Role::normalized("straße").as_str(), "STRASSE");
        assert_eq!(Role::normalized("ﬁnance").as_str(), "FINANCE");
        assert_eq!(Role::normalized("prüfer").as_str(), "PRÜFER");
    }

    #[test]
    fn matches_is_case_sensitive() {
        let role = Role::new("ADMIN");
        assert!(role.matches("ADMIN"));
        assert!(!role.matches("admin"));
        assert!(!role.matches("ADMIN "));
    }
}

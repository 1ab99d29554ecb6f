/// Shared types used across the codebase

use serde::{Deserialize, Serialize};

/// Capability tag attached to a caller, used by the gateway to pick a
/// visibility and field-redaction policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Public,
    Sysadmin,
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Public => "public",
            Role::Sysadmin => "sysadmin",
            Role::Staff => "staff",
        }
    }

    /// Parse a role name from a JWT claim. Unknown names are ignored by callers.
    pub fn parse(name: &str) -> Option<Role> {
        match name.trim().to_ascii_lowercase().as_str() {
            "public" => Some(Role::Public),
            "sysadmin" => Some(Role::Sysadmin),
            "staff" => Some(Role::Staff),
            _ => None,
        }
    }

    pub fn is_elevated(&self) -> bool {
        matches!(self, Role::Sysadmin | Role::Staff)
    }
}

/// Ordered, immutable set of roles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleSet(&'static [Role]);

impl RoleSet {
    pub const fn new(roles: &'static [Role]) -> Self {
        Self(roles)
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    /// True when any member grants staff-level visibility
    pub fn is_elevated(&self) -> bool {
        self.0.iter().any(Role::is_elevated)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.0.iter().map(Role::as_str).collect()
    }
}

/// Anonymous visibility: published projects only, audit fields redacted
pub const PUBLIC_ROLES: RoleSet = RoleSet::new(&[Role::Public]);

/// Staff visibility: every project, every field
pub const SECURE_ROLES: RoleSet = RoleSet::new(&[Role::Sysadmin, Role::Staff]);

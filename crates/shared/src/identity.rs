//! Caller identity and role capabilities.
//!
//! Authentication happens upstream; the engine only consumes a resolved
//! identity and role.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a caller in the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access, including locked-document overrides.
    Admin,
    /// Day-to-day management, including locked-document overrides.
    Manager,
    /// Counter staff; cannot touch locked documents.
    Staff,
}

impl Role {
    /// Returns true if this role may mutate locked documents.
    #[must_use]
    pub fn can_override_locks(&self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Manager => write!(f, "manager"),
            Self::Staff => write!(f, "staff"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "staff" => Ok(Self::Staff),
            _ => Err(format!("Unknown role: {s}")),
        }
    }
}

/// Resolved caller identity attached to every mutating request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Caller {
    /// The caller's user ID.
    pub id: Uuid,
    /// Display name, recorded in audit entries and lock fields.
    pub name: String,
    /// The caller's role.
    pub role: Role,
}

impl Caller {
    /// Creates a new caller identity.
    #[must_use]
    pub fn new(id: Uuid, name: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            name: name.into(),
            role,
        }
    }
}

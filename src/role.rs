//! User roles and the fixed permission hierarchy.

use serde::{Deserialize, Serialize};

/// Role assigned to an EMS account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Supervisor,
    Engineer,
    Maintenance,
    Operator,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Admin,
        Role::Supervisor,
        Role::Engineer,
        Role::Maintenance,
        Role::Operator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Supervisor => "supervisor",
            Role::Engineer => "engineer",
            Role::Maintenance => "maintenance",
            Role::Operator => "operator",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "supervisor" => Some(Role::Supervisor),
            "engineer" => Some(Role::Engineer),
            "maintenance" => Some(Role::Maintenance),
            "operator" => Some(Role::Operator),
            _ => None,
        }
    }

    /// Position in the hierarchy, admin highest.
    pub const fn rank(&self) -> u8 {
        match self {
            Role::Admin => 5,
            Role::Supervisor => 4,
            Role::Engineer => 3,
            Role::Maintenance => 2,
            Role::Operator => 1,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s).ok_or_else(|| format!("unknown role '{s}'"))
    }
}

/// Rank of an optional role; no role ranks below every real one.
pub fn rank_of(role: Option<Role>) -> u8 {
    role.map(|r| r.rank()).unwrap_or(0)
}

/// Whether `current` satisfies `required` in the hierarchy.
///
/// A missing requirement always passes.
pub fn satisfies(current: Option<Role>, required: Option<Role>) -> bool {
    match required {
        None => true,
        Some(required) => rank_of(current) >= required.rank(),
    }
}

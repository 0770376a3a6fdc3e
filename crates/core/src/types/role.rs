//! Admin role levels for member accounts.
//!
//! A role is an attribute attached to an authenticated account. Most members
//! have no role at all; absence of a role row implies no elevated access.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a role string from the database is not recognized.
#[derive(thiserror::Error, Debug, Clone)]
#[error("unknown admin role: {0}")]
pub struct RoleParseError(pub String);

/// Admin role tier attached to a member account.
///
/// Stored as text in `site.member_role`; granted only via the CLI, never by
/// the website itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Can manage members and record payments.
    Editor,
    /// Full administrative access, including role management.
    SuperAdmin,
}

impl AdminRole {
    /// Database/text representation of this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Editor => "editor",
            Self::SuperAdmin => "super_admin",
        }
    }
}

impl fmt::Display for AdminRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdminRole {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "editor" => Ok(Self::Editor),
            "super_admin" => Ok(Self::SuperAdmin),
            other => Err(RoleParseError(other.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_all_roles() {
        for role in [AdminRole::Editor, AdminRole::SuperAdmin] {
            assert_eq!(role.as_str().parse::<AdminRole>().unwrap(), role);
        }
    }

    #[test]
    fn test_parse_unknown_role() {
        let err = "owner".parse::<AdminRole>().unwrap_err();
        assert_eq!(err.to_string(), "unknown admin role: owner");
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&AdminRole::SuperAdmin).unwrap();
        assert_eq!(json, "\"super_admin\"");
        let back: AdminRole = serde_json::from_str("\"editor\"").unwrap();
        assert_eq!(back, AdminRole::Editor);
    }
}

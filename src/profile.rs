//! User profile snapshot and role values.
//!
//! DESIGN
//! ======
//! The backend owns the profile shape. The session core only reads `role`;
//! every other field is carried through untouched so the cached snapshot is
//! exactly what the backend returned at login.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// ROLE
// =============================================================================

/// Account role reported by the backend.
///
/// The set is open: unknown values are preserved as [`Role::Other`] and never
/// satisfy a role requirement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Talent,
    Recruiter,
    Other(String),
}

impl Role {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "admin" => Self::Admin,
            "talent" => Self::Talent,
            "recruiter" => Self::Recruiter,
            other => Self::Other(other.to_owned()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "admin",
            Self::Talent => "talent",
            Self::Recruiter => "recruiter",
            Self::Other(raw) => raw,
        }
    }

    /// Landing view for a freshly logged-in user of this role.
    #[must_use]
    pub fn home_route(&self) -> Option<&'static str> {
        match self {
            Self::Admin => Some("/admin"),
            Self::Talent => Some("/talent/dashboard"),
            Self::Recruiter => Some("/recruiter/dashboard"),
            Self::Other(_) => None,
        }
    }

    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// USER PROFILE
// =============================================================================

/// Opaque profile snapshot returned by the backend on login.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<Role>,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl UserProfile {
    #[must_use]
    pub fn with_role(role: Role) -> Self {
        Self { role: Some(role), fields: Map::new() }
    }

    /// Attach an arbitrary backend-owned field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn role(&self) -> Option<&Role> {
        self.role.as_ref()
    }

    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// True only when the profile carries exactly `role`. A missing role or an
    /// unrecognized value never matches.
    #[must_use]
    pub fn has_role(&self, role: &Role) -> bool {
        role.is_known() && self.role.as_ref() == Some(role)
    }
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;

//! Authenticated actor identity.
//!
//! The identity layer (out of scope) verifies tokens and hands the engine a
//! `(subject, role)` pair; nothing here checks credentials.

use serde::{Deserialize, Serialize};

/// Permission class of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
    Admin,
}

/// Verified identity making a request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Actor {
    /// Subject id from the identity layer
    pub id: String,
    pub role: Role,
}

impl Actor {
    pub fn patient(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: Role::Patient,
        }
    }

    pub fn doctor(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: Role::Doctor,
        }
    }

    pub fn admin(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: Role::Admin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Patient).unwrap(), r#""patient""#);
        let role: Role = serde_json::from_str(r#""admin""#).unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn test_constructors() {
        let actor = Actor::doctor("doc-1");
        assert_eq!(actor.id, "doc-1");
        assert_eq!(actor.role, Role::Doctor);
    }
}

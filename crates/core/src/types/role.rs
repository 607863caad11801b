//! Account roles.

use serde::{Deserialize, Serialize};

/// Role attached to a user profile at registration.
///
/// The role decides which dashboard a user lands on after login and which
/// views the route guards let them render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access to user and category management.
    Admin,
    /// Sells produce; owns products and receives orders.
    Farmer,
    /// Browses the catalog and places orders.
    Customer,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Farmer => write!(f, "farmer"),
            Self::Customer => write!(f, "customer"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "farmer" => Ok(Self::Farmer),
            "customer" => Ok(Self::Customer),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

impl Role {
    /// Dashboard path users of this role are sent to after login.
    #[must_use]
    pub const fn dashboard_path(&self) -> &'static str {
        match self {
            Self::Admin => "/admin",
            Self::Farmer => "/farmer",
            Self::Customer => "/customer",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_round_trip() {
        for role in [Role::Admin, Role::Farmer, Role::Customer] {
            assert_eq!(Role::from_str(&role.to_string()).unwrap(), role);
        }
    }

    #[test]
    fn test_invalid_role() {
        assert!(Role::from_str("supplier").is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Farmer).unwrap(), "\"farmer\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"admin\"").unwrap(),
            Role::Admin
        );
    }

    #[test]
    fn test_dashboard_path() {
        assert_eq!(Role::Customer.dashboard_path(), "/customer");
    }
}

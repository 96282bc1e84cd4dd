//! User and role models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Staff roles for authorization
///
/// The serialized names are the historical wire strings carried in user
/// records; anything else fails to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Shop owner - runs the café and manages the catalog
    #[serde(rename = "Shop_Owner")]
    ShopOwner,
    /// Shop manager - day-to-day operations
    #[serde(rename = "Shop_Manager")]
    ShopManager,
    /// Chef - kitchen dashboard only
    #[serde(rename = "Chef")]
    Chef,
}

impl Role {
    /// Dashboard entry point for this role
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Role::ShopOwner => "/dashboard/owner",
            Role::ShopManager => "/dashboard/manager",
            Role::Chef => "/dashboard/chef",
        }
    }

    /// Human-readable name for messages and page titles
    pub fn label(&self) -> &'static str {
        match self {
            Role::ShopOwner => "Shop Owner",
            Role::ShopManager => "Shop Manager",
            Role::Chef => "Chef",
        }
    }

    /// Whether this role may manage the catalog
    pub fn can_manage_catalog(&self) -> bool {
        matches!(self, Role::ShopOwner)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::ShopOwner => write!(f, "Shop_Owner"),
            Role::ShopManager => write!(f, "Shop_Manager"),
            Role::Chef => write!(f, "Chef"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Shop_Owner" => Ok(Role::ShopOwner),
            "Shop_Manager" => Ok(Role::ShopManager),
            "Chef" => Ok(Role::Chef),
            other => Err(format!("unrecognized role '{}'", other)),
        }
    }
}

/// A staff account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: String,
    /// Username for login
    pub username: String,
    /// Email address, used for the password reset flow
    pub email: String,
    /// Contact phone number
    pub phone_number: String,
    /// Bcrypt hash of the password; the plaintext is never stored
    pub password_hash: String,
    /// The user's role
    pub role: Role,
    /// Café this user belongs to, if any
    pub cafe: Option<String>,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
    /// When the account was created
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    /// Create a new user with an already-hashed password
    pub fn new(
        username: String,
        email: String,
        phone_number: String,
        password_hash: String,
        role: Role,
        cafe: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username,
            email,
            phone_number,
            password_hash,
            role,
            cafe,
            is_staff: true,
            is_superuser: false,
            created_at: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::ShopOwner, Role::ShopManager, Role::Chef] {
            let parsed: Role = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_unrecognized_role_rejected() {
        assert!("Barista".parse::<Role>().is_err());
        assert!("shop_owner".parse::<Role>().is_err());
    }

    #[test]
    fn test_dashboard_paths_are_distinct() {
        let paths = [
            Role::ShopOwner.dashboard_path(),
            Role::ShopManager.dashboard_path(),
            Role::Chef.dashboard_path(),
        ];
        assert_eq!(
            paths.len(),
            paths.iter().collect::<std::collections::HashSet<_>>().len()
        );
    }

    #[test]
    fn test_only_owner_manages_catalog() {
        assert!(Role::ShopOwner.can_manage_catalog());
        assert!(!Role::ShopManager.can_manage_catalog());
        assert!(!Role::Chef.can_manage_catalog());
    }

    #[test]
    fn test_user_id_uniqueness() {
        let a = User::new(
            "alice".into(),
            "alice@example.com".into(),
            "555-0100".into(),
            "hash".into(),
            Role::Chef,
            None,
        );
        let b = User::new(
            "alice".into(),
            "alice@example.com".into(),
            "555-0100".into(),
            "hash".into(),
            Role::Chef,
            None,
        );
        assert_ne!(a.id, b.id);
    }
}

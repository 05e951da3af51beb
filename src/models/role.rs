use serde::{Deserialize, Serialize};

/// Closed role set. Stored as lowercase TEXT in the users table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Manager,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Manager => "manager",
            Role::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "user" => Some(Role::User),
            "manager" => Some(Role::Manager),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Create, edit, and delete forms and their fields.
    pub fn can_manage_forms(self) -> bool {
        matches!(self, Role::Manager | Role::Admin)
    }

    /// Drive subscription status transitions and read all subscriptions.
    pub fn can_review(self) -> bool {
        matches!(self, Role::Manager | Role::Admin)
    }

    /// User account administration.
    pub fn can_manage_users(self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// Authenticated caller context, resolved from the session.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub user_id: i64,
    pub role: Role,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Authorization level attached to every user account.
///
/// Flat closed set: gates compare for equality, there is no hierarchy
/// between roles. Values outside this set in configuration are a config
/// error, not a runtime case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    User,
    Moderator,
}

impl Role {
    /// The one role check in the crate. `required = None` means the
    /// resource is open to any authenticated role.
    pub fn permits(self, required: Option<Role>) -> bool {
        match required {
            Some(role) => self == role,
            None => true,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "ADMIN"),
            Role::User => write!(f, "USER"),
            Role::Moderator => write!(f, "MODERATOR"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "USER" => Ok(Role::User),
            "MODERATOR" => Ok(Role::Moderator),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// Full user record as the store keeps it.
///
/// `password_hash` is a salted Argon2 PHC string and never crosses the
/// authentication boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// Unique user identifier
    pub id: String,
    /// Login name, usable as an identifier
    pub username: String,
    /// Email address, usable as an identifier
    pub email: String,
    /// Salted one-way password hash (PHC string)
    pub password_hash: String,
    /// Name shown in the UI
    pub display_name: String,
    /// Avatar URI (optional)
    pub avatar_url: Option<String>,
    /// Authorization level
    pub role: Role,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Creates a record with a fresh id; display name defaults to the
    /// username.
    pub fn new(username: &str, email: &str, password_hash: &str, role: Role) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            display_name: username.to_string(),
            avatar_url: None,
            role,
            created_at: Utc::now(),
        }
    }

    pub fn with_avatar(mut self, avatar_url: &str) -> Self {
        self.avatar_url = Some(avatar_url.to_string());
        self
    }

    pub fn with_display_name(mut self, display_name: &str) -> Self {
        self.display_name = display_name.to_string();
        self
    }

    /// Strips the record down to what callers may see.
    pub fn to_authenticated(&self) -> AuthenticatedUser {
        AuthenticatedUser {
            id: self.id.clone(),
            display_name: self.display_name.clone(),
            email: self.email.clone(),
            avatar_url: self.avatar_url.clone(),
            role: self.role,
        }
    }
}

/// Minimal projection returned after successful authentication.
///
/// Deliberately excludes the password hash and anything else the store
/// keeps for its own purposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: String,
    pub display_name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub role: Role,
}

//! Navigation descriptor tree
//!
//! Static configuration describing the dashboard's navigation surface and
//! who may see each entry. Built once at process start, never mutated.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::auth::user::Role;
use crate::error::{OpsGateError, Result};

/// Leaf entry nested under an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavChild {
    pub label: String,
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// Entry within a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavItem {
    pub label: String,
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavChild>,
}

/// Named, ordered group of items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavSection {
    pub section: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    pub items: Vec<NavItem>,
}

/// Loads a navigation tree from a JSON configuration file.
///
/// Unknown role strings fail the load: they are configuration errors, not
/// something to recover from at request time.
pub fn load_tree(path: &Path) -> Result<Vec<NavSection>> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        OpsGateError::NavConfigError(format!("cannot read {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&raw).map_err(|e| {
        OpsGateError::NavConfigError(format!("invalid navigation config {}: {}", path.display(), e))
    })
}

fn item(label: &str, href: &str) -> NavItem {
    NavItem {
        label: label.to_string(),
        href: href.to_string(),
        subtitle: None,
        badge: None,
        role: None,
        children: Vec::new(),
    }
}

fn child(label: &str, href: &str) -> NavChild {
    NavChild {
        label: label.to_string(),
        href: href.to_string(),
        role: None,
    }
}

/// Built-in tree used when no configuration file is provided.
pub fn default_tree() -> Vec<NavSection> {
    vec![
        NavSection {
            section: "Overview".to_string(),
            role: None,
            items: vec![
                NavItem {
                    subtitle: Some("System summary and analytics".to_string()),
                    badge: Some("new".to_string()),
                    ..item("Dashboard", "/dashboard")
                },
                item("Activity", "/activity"),
                NavItem {
                    badge: Some("12".to_string()),
                    ..item("Notifications", "/notifications")
                },
            ],
        },
        NavSection {
            section: "Infrastructure".to_string(),
            role: None,
            items: vec![
                NavItem {
                    subtitle: Some("Deployed instances and resources".to_string()),
                    children: vec![
                        child("Production", "/servers/production"),
                        child("Staging", "/servers/staging"),
                        child("Local", "/servers/local"),
                    ],
                    ..item("Servers", "/servers")
                },
                NavItem {
                    children: vec![
                        child("PostgreSQL", "/databases/postgres"),
                        child("Redis Cache", "/databases/redis"),
                    ],
                    ..item("Databases", "/databases")
                },
                item("Networking", "/networking"),
            ],
        },
        NavSection {
            section: "Development".to_string(),
            role: Some(Role::User),
            items: vec![
                NavItem {
                    subtitle: Some("Source-managed repositories".to_string()),
                    children: vec![
                        child("Frontend", "/projects/frontend"),
                        child("Backend", "/projects/backend"),
                    ],
                    ..item("Projects", "/projects")
                },
                NavItem {
                    badge: Some("running".to_string()),
                    ..item("CI/CD Pipelines", "/ci-cd")
                },
                item("Logs", "/logs"),
            ],
        },
        NavSection {
            section: "Security".to_string(),
            role: None,
            items: vec![
                NavItem {
                    children: vec![
                        child("Roles", "/users/roles"),
                        child("Permissions", "/users/permissions"),
                    ],
                    ..item("Users", "/users")
                },
                NavItem {
                    subtitle: Some("Manage access tokens and scopes".to_string()),
                    ..item("API Keys", "/api-keys")
                },
                item("Audit Logs", "/audit"),
            ],
        },
        NavSection {
            section: "Administration".to_string(),
            role: None,
            items: vec![
                NavItem {
                    children: vec![
                        child("General", "/settings/general"),
                        child("Appearance", "/settings/appearance"),
                        NavChild {
                            role: Some(Role::User),
                            ..child("System", "/settings/system")
                        },
                    ],
                    ..item("Settings", "/settings")
                },
                NavItem {
                    subtitle: Some("External APIs and tools".to_string()),
                    ..item("Integrations", "/integrations")
                },
                item("Usage Reports", "/reports"),
            ],
        },
    ]
}

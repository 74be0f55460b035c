use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The two kinds of Taskify users.
///
/// - `Manager`: submits project ideas and reviews the generated plan
/// - `Developer`: registers skills and availability to be matched to stories
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Manager,
    Developer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::Developer => "developer",
        }
    }

    /// Route of this role's login page.
    pub fn login_path(&self) -> String {
        format!("/{}/login", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manager" => Ok(Self::Manager),
            "developer" => Ok(Self::Developer),
            other => Err(format!(
                "invalid role '{}': expected manager or developer",
                other
            )),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The stored credential pair.
///
/// Written on successful login and removed on logout. Field names follow the
/// storage keys the backend's front-ends use (`token`, `user_type`).
///
/// The role is kept as a raw string: a stored value that is neither
/// `manager` nor `developer` is still a session, it just matches no route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_type: String,
    /// Display name returned by the login endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Session {
    pub fn new(token: impl Into<String>, role: Role) -> Self {
        Self {
            token: token.into(),
            user_type: role.as_str().to_string(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Parsed role, if the stored value is a known one.
    pub fn role(&self) -> Option<Role> {
        self.user_type.parse().ok()
    }
}

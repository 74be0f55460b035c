use serde::{Deserialize, Serialize};

use super::WorkBatch;

/// Hours per day a new developer offers unless they pick otherwise.
pub const DEFAULT_HOURS_PER_DAY: u8 = 8;

/// Developer registration form.
///
/// No password policy is applied client-side; the backend decides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeveloperSignup {
    pub name: String,
    pub email: String,
    pub password: String,
    pub skills: Vec<String>,
    pub hours_per_day: u8,
    pub work_batch: WorkBatch,
}

impl DeveloperSignup {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            skills: Vec::new(),
            hours_per_day: DEFAULT_HOURS_PER_DAY,
            work_batch: WorkBatch::default(),
        }
    }

    /// Set skills from a comma-separated list, e.g. `"rust, sql,,go"`.
    pub fn with_skills_csv(mut self, raw: &str) -> Self {
        self.skills = parse_skills(raw);
        self
    }
}

/// Split a comma-separated skill list, trimming entries and dropping blanks.
pub fn parse_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Manager registration form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerSignup {
    pub name: String,
    pub email: String,
    pub password: String,
    pub department: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response of either login endpoint.
///
/// Exactly one of `developer_id` / `manager_id` is set, depending on the
/// endpoint called.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub message: String,
}

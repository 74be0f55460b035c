use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Allocation, Developer, EpicsAndStories, ProjectAnalysis};

/// Opaque project identifier threaded through every pipeline stage.
///
/// Minted client-side when an idea is submitted; the backend keys every
/// later payload by it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    /// Mint a fresh id (UUID v4).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ProjectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A selected developer as sent with an idea.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub name: String,
    pub role: String,
}

impl From<&Developer> for TeamMember {
    fn from(dev: &Developer) -> Self {
        Self {
            name: dev.name.clone(),
            role: dev.role.clone(),
        }
    }
}

/// Team description submitted together with a project idea.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMetadata {
    pub team_name: String,
    pub members: Vec<TeamMember>,
    pub project_goal: String,
}

/// Response of the idea submission endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitIdeaResponse {
    pub analysis: ProjectAnalysis,
}

/// Response of the epics generation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpicsResponse {
    pub epics_stories: EpicsAndStories,
}

/// Response of the team matcher endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMatchingResponse {
    #[serde(default)]
    pub project_id: Option<ProjectId>,
    #[serde(default)]
    pub allocations: Vec<Allocation>,
}

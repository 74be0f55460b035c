use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::collection::{CollectionError, EditableRecord};

/// Assignment of a user story to a team member, with the stated rationale.
///
/// A project's full list of allocations is its team matching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    #[serde(default)]
    pub story_title: String,
    #[serde(default)]
    pub assigned_to: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationField {
    StoryTitle,
    AssignedTo,
    Reason,
}

impl FromStr for AllocationField {
    type Err = CollectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "story_title" => Ok(Self::StoryTitle),
            "assigned_to" => Ok(Self::AssignedTo),
            "reason" => Ok(Self::Reason),
            other => Err(CollectionError::UnknownField(other.to_string())),
        }
    }
}

impl EditableRecord for Allocation {
    type Field = AllocationField;

    fn blank() -> Self {
        Self::default()
    }

    fn get(&self, field: AllocationField) -> &str {
        match field {
            AllocationField::StoryTitle => &self.story_title,
            AllocationField::AssignedTo => &self.assigned_to,
            AllocationField::Reason => &self.reason,
        }
    }

    fn set(&mut self, field: AllocationField, value: String) {
        match field {
            AllocationField::StoryTitle => self.story_title = value,
            AllocationField::AssignedTo => self.assigned_to = value,
            AllocationField::Reason => self.reason = value,
        }
    }
}

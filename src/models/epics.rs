use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::collection::{CollectionError, EditableRecord};

/// Epics and user stories generated from a saved analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpicsAndStories {
    #[serde(default)]
    pub epics: Vec<Epic>,
    #[serde(default)]
    pub user_stories: Vec<UserStory>,
}

/// A named, described unit of product scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Epic {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpicField {
    Name,
    Description,
}

impl FromStr for EpicField {
    type Err = CollectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "description" => Ok(Self::Description),
            other => Err(CollectionError::UnknownField(other.to_string())),
        }
    }
}

impl EditableRecord for Epic {
    type Field = EpicField;

    fn blank() -> Self {
        Self::default()
    }

    fn get(&self, field: EpicField) -> &str {
        match field {
            EpicField::Name => &self.name,
            EpicField::Description => &self.description,
        }
    }

    fn set(&mut self, field: EpicField, value: String) {
        match field {
            EpicField::Name => self.name = value,
            EpicField::Description => self.description = value,
        }
    }
}

/// A titled requirement with Gherkin acceptance criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStory {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub gherkin: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryField {
    Title,
    Gherkin,
}

impl FromStr for StoryField {
    type Err = CollectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(Self::Title),
            "gherkin" => Ok(Self::Gherkin),
            other => Err(CollectionError::UnknownField(other.to_string())),
        }
    }
}

impl EditableRecord for UserStory {
    type Field = StoryField;

    fn blank() -> Self {
        Self::default()
    }

    fn get(&self, field: StoryField) -> &str {
        match field {
            StoryField::Title => &self.title,
            StoryField::Gherkin => &self.gherkin,
        }
    }

    fn set(&mut self, field: StoryField, value: String) {
        match field {
            StoryField::Title => self.title = value,
            StoryField::Gherkin => self.gherkin = value,
        }
    }
}

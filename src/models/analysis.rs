use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::collection::{CollectionError, EditableRecord};

/// Generated analysis of a project idea.
///
/// Produced by the idea submission endpoint, edited by the manager, then
/// saved back unchanged apart from those edits. Lists missing from a payload
/// read as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectAnalysis {
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub features: Vec<Feature>,
    #[serde(default)]
    pub personas: Vec<Persona>,
    #[serde(default)]
    pub modules: Vec<String>,
    #[serde(default)]
    pub risks: Vec<Risk>,
}

/// A capability the project should offer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureField {
    Name,
    Description,
}

impl FromStr for FeatureField {
    type Err = CollectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "description" => Ok(Self::Description),
            other => Err(CollectionError::UnknownField(other.to_string())),
        }
    }
}

impl EditableRecord for Feature {
    type Field = FeatureField;

    fn blank() -> Self {
        Self::default()
    }

    fn get(&self, field: FeatureField) -> &str {
        match field {
            FeatureField::Name => &self.name,
            FeatureField::Description => &self.description,
        }
    }

    fn set(&mut self, field: FeatureField, value: String) {
        match field {
            FeatureField::Name => self.name = value,
            FeatureField::Description => self.description = value,
        }
    }
}

/// A kind of user and what they need from the project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub needs: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonaField {
    Role,
    Needs,
}

impl FromStr for PersonaField {
    type Err = CollectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "role" => Ok(Self::Role),
            "needs" => Ok(Self::Needs),
            other => Err(CollectionError::UnknownField(other.to_string())),
        }
    }
}

impl EditableRecord for Persona {
    type Field = PersonaField;

    fn blank() -> Self {
        Self::default()
    }

    fn get(&self, field: PersonaField) -> &str {
        match field {
            PersonaField::Role => &self.role,
            PersonaField::Needs => &self.needs,
        }
    }

    fn set(&mut self, field: PersonaField, value: String) {
        match field {
            PersonaField::Role => self.role = value,
            PersonaField::Needs => self.needs = value,
        }
    }
}

/// A project risk with its planned mitigation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Risk {
    #[serde(default)]
    pub risk: String,
    #[serde(default)]
    pub mitigation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskField {
    Risk,
    Mitigation,
}

impl FromStr for RiskField {
    type Err = CollectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "risk" => Ok(Self::Risk),
            "mitigation" => Ok(Self::Mitigation),
            other => Err(CollectionError::UnknownField(other.to_string())),
        }
    }
}

impl EditableRecord for Risk {
    type Field = RiskField;

    fn blank() -> Self {
        Self::default()
    }

    fn get(&self, field: RiskField) -> &str {
        match field {
            RiskField::Risk => &self.risk,
            RiskField::Mitigation => &self.mitigation,
        }
    }

    fn set(&mut self, field: RiskField, value: String) {
        match field {
            RiskField::Risk => self.risk = value,
            RiskField::Mitigation => self.mitigation = value,
        }
    }
}

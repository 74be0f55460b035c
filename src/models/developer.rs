use std::fmt;

use serde::{Deserialize, Serialize};

/// A developer available for team matching, as listed by the backend.
///
/// Read-only on the client. `bandwidth` is the fraction of capacity still
/// free, in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Developer {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub bandwidth: f64,
    #[serde(default)]
    pub work_batch: WorkBatch,
}

impl Developer {
    /// Bandwidth as a whole percentage, for display.
    pub fn bandwidth_percent(&self) -> u32 {
        (self.bandwidth.clamp(0.0, 1.0) * 100.0).round() as u32
    }
}

/// The daily shift a developer works.
///
/// Values the client does not know are kept verbatim so they round-trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WorkBatch {
    /// 8 AM - 6 PM
    #[default]
    EightToSix,
    /// 9 AM - 5 PM
    NineToFive,
    Other(String),
}

impl WorkBatch {
    pub fn as_str(&self) -> &str {
        match self {
            Self::EightToSix => "8-6",
            Self::NineToFive => "9-5",
            Self::Other(s) => s,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::EightToSix => "8 AM - 6 PM",
            Self::NineToFive => "9 AM - 5 PM",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for WorkBatch {
    fn from(s: String) -> Self {
        match s.as_str() {
            "8-6" => Self::EightToSix,
            "9-5" => Self::NineToFive,
            _ => Self::Other(s),
        }
    }
}

impl From<WorkBatch> for String {
    fn from(batch: WorkBatch) -> Self {
        batch.as_str().to_string()
    }
}

impl fmt::Display for WorkBatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response of the developer listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeveloperList {
    #[serde(default)]
    pub developers: Vec<Developer>,
}

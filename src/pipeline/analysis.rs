use std::str::FromStr;

use crate::client::TaskifyClient;
use crate::collection::{CollectionError, EditKey, EditOp, EditableCollection, StaleEditPolicy};
use crate::models::*;

use super::{PageStatus, PipelineContext, StageError};

/// Editable parts of the analysis page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisSection {
    Domain,
    Features,
    Personas,
    Modules,
    Risks,
}

impl AnalysisSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Features => "features",
            Self::Personas => "personas",
            Self::Modules => "modules",
            Self::Risks => "risks",
        }
    }
}

impl FromStr for AnalysisSection {
    type Err = CollectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "domain" => Ok(Self::Domain),
            "features" => Ok(Self::Features),
            "personas" => Ok(Self::Personas),
            "modules" => Ok(Self::Modules),
            "risks" => Ok(Self::Risks),
            other => Err(CollectionError::UnknownSection(other.to_string())),
        }
    }
}

/// The single field of the domain section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainField {
    Value,
}

impl FromStr for DomainField {
    type Err = CollectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "value" => Ok(Self::Value),
            other => Err(CollectionError::UnknownField(other.to_string())),
        }
    }
}

/// Review of the analysis generated from a project idea.
#[derive(Debug)]
pub struct AnalysisReview {
    client: TaskifyClient,
    context: PipelineContext,
    domain: String,
    editing_domain: bool,
    features: EditableCollection<Feature>,
    personas: EditableCollection<Persona>,
    modules: EditableCollection<String>,
    risks: EditableCollection<Risk>,
    status: PageStatus,
}

impl AnalysisReview {
    pub fn new(client: TaskifyClient, context: PipelineContext, analysis: ProjectAnalysis) -> Self {
        Self::with_policy(client, context, analysis, StaleEditPolicy::default())
    }

    pub fn with_policy(
        client: TaskifyClient,
        context: PipelineContext,
        analysis: ProjectAnalysis,
        policy: StaleEditPolicy,
    ) -> Self {
        Self {
            client,
            context,
            domain: analysis.domain,
            editing_domain: false,
            features: EditableCollection::with_policy(analysis.features, policy),
            personas: EditableCollection::with_policy(analysis.personas, policy),
            modules: EditableCollection::with_policy(analysis.modules, policy),
            risks: EditableCollection::with_policy(analysis.risks, policy),
            status: PageStatus::default(),
        }
    }

    /// Open the page from hand-off state. The analysis is only ever handed
    /// over by the intake; there is no endpoint to fetch it again.
    pub fn enter(
        client: TaskifyClient,
        project_id: Option<ProjectId>,
        analysis: Option<ProjectAnalysis>,
    ) -> Result<Self, StageError> {
        match (project_id, analysis) {
            (Some(project_id), Some(analysis)) => {
                Ok(Self::new(client, PipelineContext::new(project_id), analysis))
            }
            _ => Err(StageError::NoData("No analysis data available")),
        }
    }

    pub fn client(&self) -> &TaskifyClient {
        &self.client
    }

    pub fn context(&self) -> &PipelineContext {
        &self.context
    }

    pub fn status(&self) -> &PageStatus {
        &self.status
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn set_domain(&mut self, value: impl Into<String>) {
        self.domain = value.into();
    }

    /// Edit cursor policy shared by every list on the page.
    pub fn policy(&self) -> StaleEditPolicy {
        self.features.policy()
    }

    pub fn features(&self) -> &EditableCollection<Feature> {
        &self.features
    }

    pub fn personas(&self) -> &EditableCollection<Persona> {
        &self.personas
    }

    pub fn modules(&self) -> &EditableCollection<String> {
        &self.modules
    }

    pub fn risks(&self) -> &EditableCollection<Risk> {
        &self.risks
    }

    /// The record in edit mode. The domain reports index 0.
    pub fn editing(&self) -> Option<EditKey<AnalysisSection>> {
        if self.editing_domain {
            return Some(EditKey {
                section: AnalysisSection::Domain,
                index: 0,
            });
        }
        [
            (AnalysisSection::Features, self.features.editing()),
            (AnalysisSection::Personas, self.personas.editing()),
            (AnalysisSection::Modules, self.modules.editing()),
            (AnalysisSection::Risks, self.risks.editing()),
        ]
        .into_iter()
        .find_map(|(section, index)| index.map(|index| EditKey { section, index }))
    }

    /// Put one record in edit mode, leaving edit mode everywhere else.
    pub fn begin_edit(&mut self, section: AnalysisSection, index: usize) -> Result<(), StageError> {
        self.end_edit();
        match section {
            AnalysisSection::Domain => self.editing_domain = true,
            AnalysisSection::Features => self.features.begin_edit(index)?,
            AnalysisSection::Personas => self.personas.begin_edit(index)?,
            AnalysisSection::Modules => self.modules.begin_edit(index)?,
            AnalysisSection::Risks => self.risks.begin_edit(index)?,
        }
        Ok(())
    }

    pub fn end_edit(&mut self) {
        self.editing_domain = false;
        self.features.end_edit();
        self.personas.end_edit();
        self.modules.end_edit();
        self.risks.end_edit();
    }

    /// Apply a textual edit, e.g. `set:features:0:name=Search`.
    pub fn apply(&mut self, op: &EditOp) -> Result<(), StageError> {
        match op.section().parse::<AnalysisSection>()? {
            AnalysisSection::Domain => match op {
                EditOp::Set {
                    index,
                    field,
                    value,
                    ..
                } => {
                    let DomainField::Value = field.parse::<DomainField>()?;
                    if *index != 0 {
                        return Err(CollectionError::IndexOutOfRange {
                            index: *index,
                            len: 1,
                        }
                        .into());
                    }
                    self.domain = value.clone();
                    Ok(())
                }
                _ => Err(CollectionError::InvalidEdit(format!("{:?}", op)).into()),
            },
            AnalysisSection::Features => Ok(self.features.apply(op)?),
            AnalysisSection::Personas => Ok(self.personas.apply(op)?),
            AnalysisSection::Modules => Ok(self.modules.apply(op)?),
            AnalysisSection::Risks => Ok(self.risks.apply(op)?),
        }
    }

    /// The working copy as a payload.
    pub fn analysis(&self) -> ProjectAnalysis {
        ProjectAnalysis {
            domain: self.domain.clone(),
            features: self.features.items().to_vec(),
            personas: self.personas.items().to_vec(),
            modules: self.modules.items().to_vec(),
            risks: self.risks.items().to_vec(),
        }
    }

    /// Save the working copy. On success the pipeline moves on to the
    /// epics of this project.
    pub async fn save(&mut self) -> Result<PipelineContext, StageError> {
        self.status.begin();
        match self
            .client
            .save_analysis(&self.context.project_id, &self.analysis())
            .await
        {
            Ok(()) => {
                self.status.succeed("Analysis saved successfully!");
                tracing::info!("Saved analysis for project {}", self.context.project_id);
                Ok(self.context.clone())
            }
            Err(e) => Err(self.status.fail(e.into())),
        }
    }
}

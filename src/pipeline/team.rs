use std::str::FromStr;

use crate::client::TaskifyClient;
use crate::collection::{CollectionError, EditKey, EditOp, EditableCollection, StaleEditPolicy};
use crate::models::*;

use super::{Done, PageStatus, PipelineContext, StageError};

/// Editable parts of the team matching page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamSection {
    Allocations,
}

impl FromStr for TeamSection {
    type Err = CollectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "allocations" => Ok(Self::Allocations),
            other => Err(CollectionError::UnknownSection(other.to_string())),
        }
    }
}

/// Review of the generated story allocations.
///
/// There is no way to build this page from arbitrary allocations: it is
/// produced by a successful generation, either from
/// [`EpicsReview::go_for_team_matching`](super::EpicsReview::go_for_team_matching)
/// or from [`load`](Self::load).
#[derive(Debug)]
pub struct TeamMatchingReview {
    client: TaskifyClient,
    context: PipelineContext,
    allocations: EditableCollection<Allocation>,
    status: PageStatus,
}

impl TeamMatchingReview {
    pub(crate) fn generated(
        client: TaskifyClient,
        context: PipelineContext,
        allocations: Vec<Allocation>,
        policy: StaleEditPolicy,
    ) -> Self {
        Self {
            client,
            context,
            allocations: EditableCollection::with_policy(allocations, policy),
            status: PageStatus::default(),
        }
    }

    /// Generate the team matching of a project and open the page on it.
    pub async fn load(client: TaskifyClient, context: PipelineContext) -> Result<Self, StageError> {
        tracing::info!("Fetching team matching for project {}", context.project_id);
        let allocations = client.fetch_team_matching(&context.project_id).await?;
        let mut page = Self::generated(client, context, allocations, StaleEditPolicy::default());
        page.status.succeed("Team matching fetched successfully!");
        Ok(page)
    }

    /// Open the page for a project by generating its team matching.
    pub async fn enter(
        client: TaskifyClient,
        project_id: Option<ProjectId>,
    ) -> Result<Self, StageError> {
        match project_id {
            Some(project_id) => Self::load(client, PipelineContext::new(project_id)).await,
            None => Err(StageError::NoData("No team matching data available")),
        }
    }

    pub fn with_policy(mut self, policy: StaleEditPolicy) -> Self {
        self.allocations = EditableCollection::with_policy(self.allocations.into_items(), policy);
        self
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

    pub fn allocations(&self) -> &EditableCollection<Allocation> {
        &self.allocations
    }

    pub fn editing(&self) -> Option<EditKey<TeamSection>> {
        self.allocations.editing().map(|index| EditKey {
            section: TeamSection::Allocations,
            index,
        })
    }

    pub fn begin_edit(&mut self, index: usize) -> Result<(), StageError> {
        Ok(self.allocations.begin_edit(index)?)
    }

    pub fn end_edit(&mut self) {
        self.allocations.end_edit();
    }

    /// Apply a textual edit, e.g. `set:allocations:1:assigned_to=Ana`.
    pub fn apply(&mut self, op: &EditOp) -> Result<(), StageError> {
        match op.section().parse::<TeamSection>()? {
            TeamSection::Allocations => self.allocations.apply(op)?,
        }
        Ok(())
    }

    /// Save the allocations, ending the pipeline run.
    pub async fn save(&mut self) -> Result<Done, StageError> {
        self.status.begin();
        match self
            .client
            .save_team_matching(&self.context.project_id, self.allocations.items())
            .await
        {
            Ok(()) => {
                self.status.succeed("Team matching saved successfully!");
                tracing::info!("Saved team matching for project {}", self.context.project_id);
                Ok(Done {
                    context: self.context.clone(),
                })
            }
            Err(e) => Err(self.status.fail(e.into())),
        }
    }
}

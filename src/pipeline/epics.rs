use std::str::FromStr;

use crate::client::TaskifyClient;
use crate::collection::{CollectionError, EditKey, EditOp, EditableCollection, StaleEditPolicy};
use crate::models::*;

use super::{PageStatus, PipelineContext, StageError, TeamMatchingReview};

/// Editable parts of the epics page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpicsSection {
    Epics,
    UserStories,
}

impl EpicsSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Epics => "epics",
            Self::UserStories => "user_stories",
        }
    }
}

impl FromStr for EpicsSection {
    type Err = CollectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "epics" => Ok(Self::Epics),
            "user_stories" => Ok(Self::UserStories),
            other => Err(CollectionError::UnknownSection(other.to_string())),
        }
    }
}

/// Review of the epics and user stories of a project.
///
/// A page opened by id alone starts out pending: it holds no records until
/// [`fetch`](Self::fetch) succeeds, and a failed fetch stays on the page as
/// its error banner.
#[derive(Debug)]
pub struct EpicsReview {
    client: TaskifyClient,
    context: PipelineContext,
    epics: EditableCollection<Epic>,
    user_stories: EditableCollection<UserStory>,
    loaded: bool,
    status: PageStatus,
}

impl EpicsReview {
    pub fn new(client: TaskifyClient, context: PipelineContext, epics_stories: EpicsAndStories) -> Self {
        Self::with_policy(client, context, epics_stories, StaleEditPolicy::default())
    }

    pub fn with_policy(
        client: TaskifyClient,
        context: PipelineContext,
        epics_stories: EpicsAndStories,
        policy: StaleEditPolicy,
    ) -> Self {
        Self {
            client,
            context,
            epics: EditableCollection::with_policy(epics_stories.epics, policy),
            user_stories: EditableCollection::with_policy(epics_stories.user_stories, policy),
            loaded: true,
            status: PageStatus::default(),
        }
    }

    /// A page whose epics still have to be fetched.
    pub fn pending(client: TaskifyClient, context: PipelineContext, policy: StaleEditPolicy) -> Self {
        Self {
            loaded: false,
            ..Self::with_policy(client, context, EpicsAndStories::default(), policy)
        }
    }

    /// Fetch the epics of the project and open the page on them.
    pub async fn load(client: TaskifyClient, context: PipelineContext) -> Result<Self, StageError> {
        let mut page = Self::pending(client, context, StaleEditPolicy::default());
        page.fetch().await?;
        Ok(page)
    }

    /// Open the page on carried epics, or fetch them when only the project
    /// id is known.
    pub async fn enter(
        client: TaskifyClient,
        project_id: Option<ProjectId>,
        carried: Option<EpicsAndStories>,
        policy: StaleEditPolicy,
    ) -> Result<Self, StageError> {
        match (project_id, carried) {
            (Some(project_id), Some(epics_stories)) => Ok(Self::with_policy(
                client,
                PipelineContext::new(project_id),
                epics_stories,
                policy,
            )),
            (Some(project_id), None) => {
                let mut page = Self::pending(client, PipelineContext::new(project_id), policy);
                page.fetch().await?;
                Ok(page)
            }
            (None, _) => Err(StageError::NoData("No epics data available")),
        }
    }

    /// Fetch the epics of the project, replacing the working copy.
    pub async fn fetch(&mut self) -> Result<(), StageError> {
        self.status.begin();
        tracing::info!("Fetching epics for project {}", self.context.project_id);
        match self.client.generate_epics(&self.context.project_id).await {
            Ok(epics_stories) => {
                let policy = self.epics.policy();
                self.epics = EditableCollection::with_policy(epics_stories.epics, policy);
                self.user_stories =
                    EditableCollection::with_policy(epics_stories.user_stories, policy);
                self.loaded = true;
                self.status.succeed("Epics fetched successfully!");
                Ok(())
            }
            Err(e) => Err(self.status.fail(e.into())),
        }
    }

    /// Whether the page holds fetched or carried epics.
    pub fn is_loaded(&self) -> bool {
        self.loaded
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

    pub fn epics(&self) -> &EditableCollection<Epic> {
        &self.epics
    }

    pub fn user_stories(&self) -> &EditableCollection<UserStory> {
        &self.user_stories
    }

    /// Actions offered by the page, whatever its content.
    pub fn controls(&self) -> [&'static str; 3] {
        ["Add Epic", "Add User Story", "Go for Team Matching"]
    }

    pub fn editing(&self) -> Option<EditKey<EpicsSection>> {
        match (self.epics.editing(), self.user_stories.editing()) {
            (Some(index), _) => Some(EditKey {
                section: EpicsSection::Epics,
                index,
            }),
            (None, Some(index)) => Some(EditKey {
                section: EpicsSection::UserStories,
                index,
            }),
            (None, None) => None,
        }
    }

    /// Put one record in edit mode, leaving edit mode everywhere else.
    pub fn begin_edit(&mut self, section: EpicsSection, index: usize) -> Result<(), StageError> {
        self.end_edit();
        match section {
            EpicsSection::Epics => self.epics.begin_edit(index)?,
            EpicsSection::UserStories => self.user_stories.begin_edit(index)?,
        }
        Ok(())
    }

    pub fn end_edit(&mut self) {
        self.epics.end_edit();
        self.user_stories.end_edit();
    }

    /// Apply a textual edit, e.g. `remove:user_stories:3`.
    pub fn apply(&mut self, op: &EditOp) -> Result<(), StageError> {
        match op.section().parse::<EpicsSection>()? {
            EpicsSection::Epics => self.epics.apply(op)?,
            EpicsSection::UserStories => self.user_stories.apply(op)?,
        }
        Ok(())
    }

    /// The working copy as a payload.
    pub fn epics_stories(&self) -> EpicsAndStories {
        EpicsAndStories {
            epics: self.epics.items().to_vec(),
            user_stories: self.user_stories.items().to_vec(),
        }
    }

    /// Save the working copy, then generate the team matching.
    ///
    /// Generation is only requested once the save has succeeded.
    pub async fn go_for_team_matching(&mut self) -> Result<TeamMatchingReview, StageError> {
        self.status.begin();
        if !self.loaded {
            return Err(self.status.fail(StageError::NoData("No epics data available")));
        }

        if let Err(e) = self
            .client
            .save_epics(&self.context.project_id, &self.epics_stories())
            .await
        {
            return Err(self.status.fail(e.into()));
        }
        self.status
            .announce("Epics and features saved successfully! Generating team matching...");

        match self
            .client
            .generate_team_matching(&self.context.project_id)
            .await
        {
            Ok(allocations) => {
                self.status.succeed("Team matching generated successfully!");
                tracing::info!(
                    "Generated {} allocations for project {}",
                    allocations.len(),
                    self.context.project_id
                );
                Ok(TeamMatchingReview::generated(
                    self.client.clone(),
                    self.context.clone(),
                    allocations,
                    self.epics.policy(),
                ))
            }
            Err(e) => Err(self.status.fail(e.into())),
        }
    }
}

use crate::client::TaskifyClient;
use crate::models::*;

use super::{AnalysisReview, PageStatus, PipelineContext, StageError};

/// Inline error shown when the intake form is incomplete.
pub const MISSING_FIELDS: &str = "Please fill in all fields and select at least one developer";

/// New project form: idea, team, goal and the developers to staff it with.
#[derive(Debug)]
pub struct NewProjectIntake {
    client: TaskifyClient,
    pub idea: String,
    pub team_name: String,
    pub project_goal: String,
    developers: Vec<Developer>,
    /// Selected developer ids, in selection order.
    selected: Vec<String>,
    status: PageStatus,
}

impl NewProjectIntake {
    pub fn new(client: TaskifyClient) -> Self {
        Self {
            client,
            idea: String::new(),
            team_name: String::new(),
            project_goal: String::new(),
            developers: Vec::new(),
            selected: Vec::new(),
            status: PageStatus::default(),
        }
    }

    /// Fetch the developers that can be selected.
    pub async fn load_developers(&mut self) -> Result<(), StageError> {
        self.status.begin();
        match self.client.list_developers().await {
            Ok(developers) => {
                tracing::debug!("Loaded {} developers", developers.len());
                self.developers = developers;
                self.status.finish();
                Ok(())
            }
            Err(e) => Err(self.status.fail(e.into())),
        }
    }

    pub fn developers(&self) -> &[Developer] {
        &self.developers
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn is_selected(&self, developer_id: &str) -> bool {
        self.selected.iter().any(|id| id == developer_id)
    }

    /// Select or deselect a listed developer. Returns whether the developer
    /// is selected afterwards.
    pub fn toggle_developer(&mut self, developer_id: &str) -> Result<bool, StageError> {
        if !self.developers.iter().any(|d| d.id == developer_id) {
            return Err(StageError::Validation(format!(
                "Unknown developer '{}'",
                developer_id
            )));
        }

        if let Some(pos) = self.selected.iter().position(|id| id == developer_id) {
            self.selected.remove(pos);
            Ok(false)
        } else {
            self.selected.push(developer_id.to_string());
            Ok(true)
        }
    }

    pub fn status(&self) -> &PageStatus {
        &self.status
    }

    pub fn validate(&self) -> Result<(), StageError> {
        if self.idea.is_empty()
            || self.team_name.is_empty()
            || self.project_goal.is_empty()
            || self.selected.is_empty()
        {
            return Err(StageError::Validation(MISSING_FIELDS.to_string()));
        }
        Ok(())
    }

    /// Team metadata for the selected developers, in listing order.
    pub fn team_metadata(&self) -> TeamMetadata {
        TeamMetadata {
            team_name: self.team_name.clone(),
            members: self
                .developers
                .iter()
                .filter(|d| self.is_selected(&d.id))
                .map(TeamMember::from)
                .collect(),
            project_goal: self.project_goal.clone(),
        }
    }

    /// Submit the idea under a newly minted project id.
    ///
    /// Nothing is sent when the form is incomplete.
    pub async fn submit(&mut self) -> Result<AnalysisReview, StageError> {
        if let Err(e) = self.validate() {
            return Err(self.status.fail(e));
        }

        self.status.begin();
        let context = PipelineContext::start();
        tracing::info!("Submitting idea for project {}", context.project_id);

        match self
            .client
            .submit_idea(&context.project_id, &self.idea, &self.team_metadata())
            .await
        {
            Ok(analysis) => {
                self.status.finish();
                Ok(AnalysisReview::new(self.client.clone(), context, analysis))
            }
            Err(e) => Err(self.status.fail(e.into())),
        }
    }
}

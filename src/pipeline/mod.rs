//! The project pipeline.
//!
//! ```text
//! NewProjectIntake -> ProjectAnalysisReview -> EpicsReview -> TeamMatchingReview -> Done
//! ```
//!
//! Each stage is a page with its own working copy, status banner and
//! actions. A stage only advances on an explicit action, and a failed
//! action leaves the stage in place with its error shown; earlier stages
//! are never rolled back. The [`PipelineContext`] (the project id minted at
//! intake) is handed from stage to stage.
//!
//! Stages are only produced by a successful action of the stage before, or
//! by an `enter`/`load` call that performs the same backend call. In
//! particular a [`TeamMatchingReview`] always holds the result of a
//! successful team matching generation.

mod analysis;
mod epics;
mod intake;
mod team;

use thiserror::Error;

use crate::client::ClientError;
use crate::collection::CollectionError;
use crate::models::ProjectId;
use crate::routes::Route;

pub use analysis::{AnalysisReview, AnalysisSection, DomainField};
pub use epics::{EpicsReview, EpicsSection};
pub use intake::{NewProjectIntake, MISSING_FIELDS};
pub use team::{TeamMatchingReview, TeamSection};

/// Stage errors.
#[derive(Debug, Error)]
pub enum StageError {
    /// Input rejected before any network call.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Client(#[from] ClientError),

    /// A review page reached with nothing to show and no id to fetch with.
    #[error("{0}")]
    NoData(&'static str),

    #[error(transparent)]
    Edit(#[from] CollectionError),
}

/// State handed from one stage to the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineContext {
    pub project_id: ProjectId,
}

impl PipelineContext {
    pub fn new(project_id: impl Into<ProjectId>) -> Self {
        Self {
            project_id: project_id.into(),
        }
    }

    /// Context for a new run, with a freshly minted project id.
    pub fn start() -> Self {
        Self {
            project_id: ProjectId::generate(),
        }
    }
}

/// Loading flag and banners of a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageStatus {
    loading: bool,
    error: Option<String>,
    success: Option<String>,
}

impl PageStatus {
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    /// A call is starting: show loading and clear both banners.
    pub(crate) fn begin(&mut self) {
        self.loading = true;
        self.error = None;
        self.success = None;
    }

    /// The call finished without anything to announce.
    pub(crate) fn finish(&mut self) {
        self.loading = false;
    }

    /// Show a success banner while the call chain is still running.
    pub(crate) fn announce(&mut self, message: impl Into<String>) {
        self.success = Some(message.into());
    }

    pub(crate) fn succeed(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.success = Some(message.into());
    }

    /// Record a failure and hand the error back to the caller.
    pub(crate) fn fail(&mut self, error: StageError) -> StageError {
        self.loading = false;
        tracing::warn!("{}", error);
        self.error = Some(error.to_string());
        error
    }

    pub fn dismiss(&mut self) {
        self.error = None;
        self.success = None;
    }
}

/// Position in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    NewProjectIntake,
    ProjectAnalysisReview,
    EpicsReview,
    TeamMatchingReview,
    Done,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewProjectIntake => "new_project_intake",
            Self::ProjectAnalysisReview => "project_analysis_review",
            Self::EpicsReview => "epics_review",
            Self::TeamMatchingReview => "team_matching_review",
            Self::Done => "done",
        }
    }

    /// The page showing this stage.
    pub fn route(&self) -> Route {
        match self {
            Self::NewProjectIntake => Route::NewProject,
            Self::ProjectAnalysisReview => Route::Analysis,
            Self::EpicsReview => Route::Epics,
            Self::TeamMatchingReview => Route::TeamMatching,
            Self::Done => Route::ManagerHome,
        }
    }
}

/// End of a pipeline run: the team matching has been saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Done {
    pub context: PipelineContext,
}

/// One pipeline run, at whichever stage it has reached.
#[derive(Debug)]
pub enum Pipeline {
    Intake(NewProjectIntake),
    Analysis(AnalysisReview),
    Epics(EpicsReview),
    TeamMatching(TeamMatchingReview),
    Done(Done),
}

/// A failed [`Pipeline::advance`]: the run stays where it was.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct Stalled {
    pub pipeline: Pipeline,
    pub error: StageError,
}

impl Pipeline {
    pub fn stage(&self) -> Stage {
        match self {
            Self::Intake(_) => Stage::NewProjectIntake,
            Self::Analysis(_) => Stage::ProjectAnalysisReview,
            Self::Epics(_) => Stage::EpicsReview,
            Self::TeamMatching(_) => Stage::TeamMatchingReview,
            Self::Done(_) => Stage::Done,
        }
    }

    /// Run the forward action of the current stage:
    /// submit idea, save analysis, go for team matching, save team matching.
    ///
    /// Once the analysis is saved the run is on the epics page, even if
    /// fetching the epics fails; advancing a page whose epics are not
    /// fetched yet retries the fetch only.
    pub async fn advance(self) -> Result<Pipeline, Box<Stalled>> {
        let stalled =
            |pipeline: Pipeline, error: StageError| Box::new(Stalled { pipeline, error });

        let next = match self {
            Self::Intake(mut page) => match page.submit().await {
                Ok(next) => Self::Analysis(next),
                Err(error) => return Err(stalled(Self::Intake(page), error)),
            },
            Self::Analysis(mut page) => match page.save().await {
                Ok(context) => {
                    let mut next =
                        EpicsReview::pending(page.client().clone(), context, page.policy());
                    match next.fetch().await {
                        Ok(()) => Self::Epics(next),
                        Err(error) => return Err(stalled(Self::Epics(next), error)),
                    }
                }
                Err(error) => return Err(stalled(Self::Analysis(page), error)),
            },
            Self::Epics(mut page) if !page.is_loaded() => match page.fetch().await {
                Ok(()) => Self::Epics(page),
                Err(error) => return Err(stalled(Self::Epics(page), error)),
            },
            Self::Epics(mut page) => match page.go_for_team_matching().await {
                Ok(next) => Self::TeamMatching(next),
                Err(error) => return Err(stalled(Self::Epics(page), error)),
            },
            Self::TeamMatching(mut page) => match page.save().await {
                Ok(done) => Self::Done(done),
                Err(error) => return Err(stalled(Self::TeamMatching(page), error)),
            },
            Self::Done(done) => {
                return Err(stalled(
                    Self::Done(done),
                    StageError::Validation("Pipeline already finished".to_string()),
                ))
            }
        };

        tracing::info!("Pipeline advanced to {}", next.stage().as_str());
        Ok(next)
    }
}

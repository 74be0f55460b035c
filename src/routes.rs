//! Front-end route table.

use std::fmt;

use crate::models::Role;

/// Every page of the Taskify front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    Login(Role),
    Signup(Role),
    ManagerHome,
    NewProject,
    Analysis,
    Epics,
    TeamMatching,
}

impl Route {
    pub const ALL: [Route; 10] = [
        Route::Landing,
        Route::Login(Role::Manager),
        Route::Signup(Role::Manager),
        Route::Login(Role::Developer),
        Route::Signup(Role::Developer),
        Route::ManagerHome,
        Route::NewProject,
        Route::Analysis,
        Route::Epics,
        Route::TeamMatching,
    ];

    pub fn path(&self) -> String {
        match self {
            Self::Landing => "/".to_string(),
            Self::Login(role) => role.login_path(),
            Self::Signup(role) => format!("/{}/signup", role.as_str()),
            Self::ManagerHome => "/manager/home".to_string(),
            Self::NewProject => "/manager/new-project".to_string(),
            Self::Analysis => "/manager/analysis".to_string(),
            Self::Epics => "/manager/epics".to_string(),
            Self::TeamMatching => "/manager/team-matching".to_string(),
        }
    }

    /// Role a session must hold to open this route; `None` for public pages.
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Self::Landing | Self::Login(_) | Self::Signup(_) => None,
            Self::ManagerHome
            | Self::NewProject
            | Self::Analysis
            | Self::Epics
            | Self::TeamMatching => Some(Role::Manager),
        }
    }

    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        Self::ALL.into_iter().find(|r| r.path() == trimmed)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

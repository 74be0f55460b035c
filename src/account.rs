//! Signup and login pages.
//!
//! Signup forms are sent as entered: password strength and email format are
//! the backend's call, and its error message is shown verbatim. A
//! successful login writes the credential pair to the [`SessionStore`].

use thiserror::Error;

use crate::client::{ClientError, TaskifyClient};
use crate::models::*;
use crate::pipeline::{PageStatus, StageError};
use crate::session::{SessionError, SessionStore};

#[derive(Debug, Error)]
pub enum AccountError {
    /// The backend refused the request; the message is shown as is.
    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Registration page for either role.
#[derive(Debug)]
pub struct SignupPage {
    client: TaskifyClient,
    status: PageStatus,
    signed_up: bool,
}

impl SignupPage {
    pub fn new(client: TaskifyClient) -> Self {
        Self {
            client,
            status: PageStatus::default(),
            signed_up: false,
        }
    }

    pub fn status(&self) -> &PageStatus {
        &self.status
    }

    pub fn is_signed_up(&self) -> bool {
        self.signed_up
    }

    pub async fn submit_developer(&mut self, form: &DeveloperSignup) -> Result<(), AccountError> {
        self.status.begin();
        let result = self.client.developer_signup(form).await;
        self.finish(result, Role::Developer)
    }

    pub async fn submit_manager(&mut self, form: &ManagerSignup) -> Result<(), AccountError> {
        self.status.begin();
        let result = self.client.manager_signup(form).await;
        self.finish(result, Role::Manager)
    }

    fn finish(&mut self, result: Result<(), ClientError>, role: Role) -> Result<(), AccountError> {
        match result {
            Ok(()) => {
                self.signed_up = true;
                self.status.succeed(format!(
                    "Signup successful! Log in at {}",
                    role.login_path()
                ));
                tracing::info!("Registered new {}", role);
                Ok(())
            }
            Err(e) => {
                let error = self.status.fail(StageError::Client(e));
                Err(AccountError::Rejected(error.to_string()))
            }
        }
    }
}

/// Login page of one role.
pub struct LoginPage<'a> {
    client: TaskifyClient,
    store: &'a dyn SessionStore,
    role: Role,
    status: PageStatus,
}

impl<'a> LoginPage<'a> {
    pub fn new(client: TaskifyClient, store: &'a dyn SessionStore, role: Role) -> Self {
        Self {
            client,
            store,
            role,
            status: PageStatus::default(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn status(&self) -> &PageStatus {
        &self.status
    }

    /// Log in and store the resulting session.
    pub async fn submit(&mut self, email: &str, password: &str) -> Result<Session, AccountError> {
        self.status.begin();
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = match self.client.login(self.role, &request).await {
            Ok(response) => response,
            Err(e) => {
                let error = self.status.fail(StageError::Client(e));
                return Err(AccountError::Rejected(error.to_string()));
            }
        };

        if response.token.is_empty() {
            let message = if response.message.is_empty() {
                "Login failed".to_string()
            } else {
                response.message
            };
            self.status.fail(StageError::Validation(message.clone()));
            return Err(AccountError::Rejected(message));
        }

        let session = Session::new(response.token, self.role).with_name(response.name);
        self.store.set(session.clone())?;
        self.status.succeed(if response.message.is_empty() {
            "Login successful".to_string()
        } else {
            response.message
        });
        tracing::info!("Logged in as {}", self.role);
        Ok(session)
    }
}

/// Forget the stored session.
pub fn logout(store: &dyn SessionStore) -> Result<(), SessionError> {
    store.clear()?;
    tracing::info!("Logged out");
    Ok(())
}

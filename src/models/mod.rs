//! Domain models for Taskify.
//!
//! # Core Concepts
//!
//! ## Pipeline payloads
//!
//! Generated by the backend, edited by the manager, then saved back keyed by
//! the project id:
//!
//! - [`ProjectAnalysis`]: domain, features, personas, modules and risks of a project idea.
//! - [`EpicsAndStories`]: epics and Gherkin user stories derived from the analysis.
//! - [`Allocation`]: which developer takes which story, and why.
//!
//! ## People
//!
//! - [`Developer`]: read-only view of a developer available for a project.
//! - [`Session`]: the stored credential pair of the signed-in user.
//! - [`DeveloperSignup`], [`ManagerSignup`], [`LoginRequest`]: account forms.

mod account;
mod allocation;
mod analysis;
mod developer;
mod epics;
mod project;
mod session;

pub use account::*;
pub use allocation::*;
pub use analysis::*;
pub use developer::*;
pub use epics::*;
pub use project::*;
pub use session::*;

//! Taskify client library.
//!
//! Managers describe a project idea, review the generated analysis, refine
//! epics and user stories, then review how stories are allocated across the
//! selected developers. This crate holds the client side of that flow:
//!
//! - [`client`]: typed HTTP client for the Taskify backend.
//! - [`session`]: stored credential pair and the guard for protected routes.
//! - [`collection`]: editable record lists with a single edit cursor.
//! - [`pipeline`]: the intake → analysis → epics → team matching stages.
//! - [`account`]: signup and login forms.
//! - [`render`]: plain-text pages for the terminal.

pub mod account;
pub mod client;
pub mod collection;
pub mod config;
pub mod models;
pub mod pipeline;
pub mod render;
pub mod routes;
pub mod session;

pub use client::{ClientError, TaskifyClient};
pub use config::Config;

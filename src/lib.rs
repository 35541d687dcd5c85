//! GitLab projects and issues as queryable tables.
//!
//! Each table is a static descriptor plus list/get hydrate functions. The
//! hydrates walk GitLab's paginated REST endpoints and stream raw items into
//! a [`plugin::query::RowSink`]; the host projects them into typed rows.

pub mod cli;
pub mod config;
pub mod error;
pub mod gitlab;
pub mod logging;
pub mod output;
pub mod pagination;
pub mod plugin;
pub mod predicates;
pub mod run;
pub mod tables;
pub mod transforms;

pub use error::{Error, Result};

//! Tasky library - deterministic daily planning over a task store
//!
//! The plan engine in [`plan`] is the core: a pure function from one
//! user's task snapshot to an ordered, flagged daily plan. Everything
//! around it is the typed tool surface an agent loop drives and the
//! collaborator seams (storage, delivery) it plugs into.

pub mod agent;
pub mod cli;
pub mod config;
pub mod plan;
pub mod store;
pub mod summary;
pub mod task;
pub mod user;

//! Schema migration for stored workflow templates.
//!
//! Documents carry a [`SchemaMarker`]. The engine walks an ordered chain of
//! [`MigrationStep`]s from the document's marker up to the marker of the
//! running release. Steps are plain functions over an owned copy of the
//! document, so upgrades are pure and can run concurrently.

pub mod engine;
pub mod error;
pub mod step;
pub mod steps;

pub use engine::MigrationEngine;
pub use error::MigrationError;
pub use flowdraft_dto::SchemaMarker;
pub use step::{MigrationStep, Transform};

//! Built-in migration steps, oldest first.

pub mod trigger_workflow;

use flowdraft_dto::SchemaMarker;

use crate::step::MigrationStep;

/// Release tag of the schema before trigger_workflow nesting.
pub const LEGACY_RELEASE: &str = "1.0";
/// Release tag the running code writes.
pub const CURRENT_RELEASE: &str = "4.0";

pub fn builtin() -> Vec<MigrationStep> {
    vec![MigrationStep::new(
        SchemaMarker::release(LEGACY_RELEASE),
        SchemaMarker::release(CURRENT_RELEASE),
        "nest trigger_workflow template reference",
        trigger_workflow::nest_template_reference,
    )]
}

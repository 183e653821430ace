use flowdraft_dto::SchemaMarker;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MigrationError {
    #[error("task '{task_id}' is missing field '{field}'")]
    MissingField { task_id: String, field: &'static str },

    #[error("task '{task_id}' has field '{field}' that is not a {expected}")]
    InvalidField {
        task_id: String,
        field: &'static str,
        expected: &'static str,
    },

    #[error("more than one migration step starts at marker '{0}'")]
    AmbiguousStep(SchemaMarker),

    #[error("marker '{current}' is not reachable from '{origin}'")]
    UnreachableMarker { origin: SchemaMarker, current: SchemaMarker },

    #[error("migration chain loops back to marker '{0}'")]
    CycleDetected(SchemaMarker),
}

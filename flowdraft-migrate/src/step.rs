use flowdraft_dto::{SchemaMarker, TemplateDocument};

use crate::error::MigrationError;

/// Rewrites one document in place. Must not touch the schema marker.
pub type Transform = fn(&mut TemplateDocument) -> Result<(), MigrationError>;

#[derive(Debug, Clone)]
pub struct MigrationStep {
    pub source: SchemaMarker,
    pub target: SchemaMarker,
    pub description: &'static str,
    transform: Transform,
}

impl MigrationStep {
    pub fn new(source: SchemaMarker, target: SchemaMarker, description: &'static str, transform: Transform) -> Self {
        Self {
            source,
            target,
            description,
            transform,
        }
    }

    /// Run the transform and advance the marker to `target`.
    pub fn apply(&self, doc: &mut TemplateDocument) -> Result<(), MigrationError> {
        (self.transform)(doc)?;
        doc.schema_marker = Some(self.target.clone());
        Ok(())
    }
}

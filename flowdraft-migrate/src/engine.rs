use std::collections::{HashMap, HashSet};

use flowdraft_dto::{SchemaMarker, TemplateDocument};
use tracing::{debug, error, warn};

use crate::error::MigrationError;
use crate::step::MigrationStep;
use crate::steps;

/// Walks documents from their stored marker up to `current`.
#[derive(Debug, Clone)]
pub struct MigrationEngine {
    origin: SchemaMarker,
    chain: Vec<MigrationStep>,
    current: SchemaMarker,
}

impl MigrationEngine {
    /// Validate `steps` as a single chain ending at `current`.
    ///
    /// The chain starts at the first step's source. Steps that are not on
    /// the path from there to `current` are dropped.
    pub fn new(steps: Vec<MigrationStep>, current: SchemaMarker) -> Result<Self, MigrationError> {
        let origin = steps
            .first()
            .map(|s| s.source.clone())
            .unwrap_or_else(|| current.clone());

        let mut by_source = HashMap::with_capacity(steps.len());
        for step in steps {
            let source = step.source.clone();
            if by_source.insert(source.clone(), step).is_some() {
                return Err(MigrationError::AmbiguousStep(source));
            }
        }

        let mut chain = Vec::new();
        let mut seen = HashSet::from([origin.clone()]);
        let mut marker = origin.clone();
        while marker != current {
            let step = by_source.remove(&marker).ok_or_else(|| MigrationError::UnreachableMarker {
                origin: origin.clone(),
                current: current.clone(),
            })?;
            if !seen.insert(step.target.clone()) {
                return Err(MigrationError::CycleDetected(step.target));
            }
            marker = step.target.clone();
            chain.push(step);
        }

        if !by_source.is_empty() {
            debug!(dropped = by_source.len(), %current, "migration steps past current marker ignored");
        }

        Ok(Self { origin, chain, current })
    }

    /// Engine over [`steps::builtin`] ending at `current`.
    pub fn with_builtin_steps(current: SchemaMarker) -> Result<Self, MigrationError> {
        Self::new(steps::builtin(), current)
    }

    pub fn current(&self) -> &SchemaMarker {
        &self.current
    }

    /// Marker assumed for documents stored without one.
    pub fn oldest(&self) -> &SchemaMarker {
        &self.origin
    }

    pub fn steps(&self) -> &[MigrationStep] {
        &self.chain
    }

    fn marker_of<'a>(&'a self, doc: &'a TemplateDocument) -> &'a SchemaMarker {
        doc.schema_marker.as_ref().unwrap_or(&self.origin)
    }

    fn step_from(&self, marker: &SchemaMarker) -> Option<&MigrationStep> {
        self.chain.iter().find(|s| &s.source == marker)
    }

    pub fn needs_upgrade(&self, doc: &TemplateDocument) -> bool {
        doc.schema_marker.is_none() || self.step_from(self.marker_of(doc)).is_some()
    }

    /// Return `doc` rewritten to the current schema.
    ///
    /// Works on a copy: on error the caller's document is untouched.
    pub fn upgrade(&self, doc: &TemplateDocument) -> Result<TemplateDocument, MigrationError> {
        let mut work = doc.clone();
        let mut marker = self.marker_of(doc).clone();

        while let Some(step) = self.step_from(&marker) {
            if let Err(err) = step.apply(&mut work) {
                error!(
                    template_id = %doc.id,
                    version = doc.version,
                    from = %step.source,
                    to = %step.target,
                    error = %err,
                    "migration step failed"
                );
                return Err(err);
            }
            debug!(template_id = %doc.id, from = %step.source, to = %step.target, "{}", step.description);
            marker = step.target.clone();
        }

        if marker != self.current {
            warn!(template_id = %doc.id, marker = %marker, current = %self.current, "unknown schema marker, document left as stored");
        }
        work.schema_marker = Some(marker);
        Ok(work)
    }

    /// Upgrade in place. Returns whether anything changed.
    pub fn upgrade_in_place(&self, doc: &mut TemplateDocument) -> Result<bool, MigrationError> {
        let upgraded = self.upgrade(doc)?;
        let changed = upgraded != *doc;
        *doc = upgraded;
        Ok(changed)
    }
}

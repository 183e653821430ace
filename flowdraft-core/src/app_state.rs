use std::sync::Arc;

use flowdraft_migrate::MigrationEngine;
use flowdraft_storage::db::DynPM;

use crate::service::LifecycleCoordinator;

#[derive(Clone)]
pub struct AppState {
    pub persist: DynPM,
    pub engine: Arc<MigrationEngine>,
    pub templates: LifecycleCoordinator,
}

impl AppState {
    pub fn new(persist: DynPM, engine: Arc<MigrationEngine>) -> Self {
        let templates = LifecycleCoordinator::new(persist.clone(), engine.clone());
        Self {
            persist,
            engine,
            templates,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("persist", &"PersistenceManager")
            .field("current_schema", &self.engine.current())
            .field("templates", &"LifecycleCoordinator")
            .finish()
    }
}

use std::sync::Arc;

use crate::persistence_manager::PersistenceManager;

pub type DynPM = Arc<dyn PersistenceManager>;

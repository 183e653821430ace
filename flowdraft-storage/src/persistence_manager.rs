use crate::traits::*;

/// All four template collections behind one handle.
pub trait PersistenceManager:
      TemplateStorage
    + TaskBodyStorage
    + MetadataStorage
    + TriggerFormStorage
    + Send + Sync
{}

// 自动 blanket-impl
impl<T> PersistenceManager for T where
      T: TemplateStorage
      + TaskBodyStorage
      + MetadataStorage
      + TriggerFormStorage
      + Send + Sync {}

pub mod db;
pub mod entities;
pub mod error;
pub mod persistence_manager;
pub mod traits;

pub use error::StorageError;
pub use persistence_manager::PersistenceManager;

pub mod db;
pub mod storage_manager;

pub mod models {
    pub mod task_body;
    pub mod template_metadata;
    pub mod trigger_form;
    pub mod workflow_template;
}

pub mod crud {
    pub mod task_body_crud;
    pub mod template_metadata_crud;
    pub mod trigger_form_crud;
    pub mod workflow_template_crud;
}

pub mod persistence {
    pub mod task_body;
    pub mod template_metadata;
    pub mod trigger_form;
    pub mod workflow_template;
}

pub use db::{init_db, MIGRATOR};
pub use storage_manager::SqliteStorageManager;

#[macro_export]
macro_rules! tx_exec {
    ($tx:expr, $fn:ident($($arg:expr),*)) => {
        $fn(&mut *$tx, $($arg),*).await
    };
}

pub mod metadata;
pub mod task_body;
pub mod template;
pub mod trigger_form;

// Re-export all traits
pub use metadata::MetadataStorage;
pub use task_body::TaskBodyStorage;
pub use template::TemplateStorage;
pub use trigger_form::TriggerFormStorage;

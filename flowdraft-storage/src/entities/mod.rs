pub mod task_body;
pub mod template_metadata;
pub mod trigger_form;
pub mod workflow_template;

pub use task_body::*;
pub use template_metadata::*;
pub use trigger_form::*;
pub use workflow_template::*;

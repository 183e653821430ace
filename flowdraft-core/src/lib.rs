pub mod app_state;
pub mod builder;
pub mod error;
pub mod inspect;
pub mod service;
pub mod validation;

pub use app_state::AppState;
pub use error::{AppError, AppResult};
pub use service::{LifecycleCoordinator, TemplateService, TriggerFormService};

pub mod dto {
    pub mod schema_marker;
    pub mod template;
    pub mod trigger_form;
}

pub use dto::schema_marker::SchemaMarker;
pub use dto::template::{
    DraftSpec, MetadataUpdate, TaskDocument, TemplateDocument, TemplateGraph, TemplateMetadataDto, TemplateState,
};
pub use dto::trigger_form::TriggerFormDto;

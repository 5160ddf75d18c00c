pub mod chat_area;
pub mod model_picker;
pub mod settings;
pub mod sidebar;
pub mod templates;

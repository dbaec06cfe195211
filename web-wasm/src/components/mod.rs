pub mod footer;
pub mod header;
pub mod history_panel;
pub mod language_selector;
pub mod text_result;
pub mod upload_area;

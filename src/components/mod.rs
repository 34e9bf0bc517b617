//! UI Components
//!
//! Reusable Leptos components.

mod category_modals;
mod category_picker;
mod category_table;
mod drop_zone;
mod error_view;
mod image_upload;
mod layout;
mod modal;
mod product_form;
mod product_table;

pub use category_modals::{AddCategoryModal, DeleteCategoryModal, EditCategoryModal};
pub use category_picker::{CategoryPath, CategoryPicker};
pub use category_table::CategoryTable;
pub use drop_zone::FileDropZone;
pub use error_view::ErrorView;
pub use image_upload::ImageUploadSection;
pub use layout::Layout;
pub use modal::Modal;
pub use product_form::{FormMode, ProductFormView};
pub use product_table::ProductTable;

/// Blocking browser alert
pub fn alert(message: &str) {
    let Some(win) = web_sys::window() else { return };
    if let Err(e) = win.alert_with_message(message) {
        tracing::error!("[APP] alert failed: {:?}", e);
    }
}

//! User Flows
//!
//! Framework-free logic behind the category modals and product screens.

pub mod category;
pub mod modal;
pub mod product;

pub use modal::{ModalEvent, ModalState};

//! Error Types
//!
//! Every failure the UI can surface. Errors are cloned into signals,
//! so transport errors are captured as strings.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::tree::TreeError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AppError {
    /// Client-side validation; shown inline next to `field`
    #[error("{message}")]
    Validation { field: &'static str, message: String },

    /// Server refused the change (children still attached, duplicate key...)
    #[error("{0}")]
    Conflict(String),

    #[error("Request failed: {0}")]
    Network(String),

    #[error("Server returned {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error(transparent)]
    Integrity(#[from] TreeError),

    #[error("Request cancelled")]
    Cancelled,
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        AppError::Validation { field, message: message.into() }
    }

    pub fn field(&self) -> Option<&'static str> {
        match self {
            AppError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, AppError::Conflict(_))
    }

    /// Text for the blocking alert
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation { message, .. } => message.clone(),
            AppError::Conflict(message) => message.clone(),
            AppError::Network(_) => {
                "Could not reach the server. Please check your connection and try again.".to_string()
            }
            AppError::Http { status, .. } => {
                format!("The server could not complete the request ({}). Please try again.", status)
            }
            AppError::Decode(_) => "The server sent an unexpected response. Please try again.".to_string(),
            AppError::Integrity(err) => format!("Category data is inconsistent: {}", err),
            AppError::Cancelled => "The request was cancelled.".to_string(),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Decode(err.to_string())
        } else {
            AppError::Network(err.to_string())
        }
    }
}

/// Per-field validation messages of a form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the first message recorded for a field
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        match errors.0.into_iter().next() {
            Some((field, message)) => AppError::Validation { field, message },
            None => AppError::validation("form", "Invalid form"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_message_suggests_retry() {
        let err = AppError::Network("connection refused".into());
        assert!(err.user_message().contains("try again"));
        assert!(!err.is_conflict());
    }

    #[test]
    fn test_conflict_shows_server_message() {
        let err = AppError::Conflict("Category has subcategories".into());
        assert!(err.is_conflict());
        assert_eq!(err.user_message(), "Category has subcategories");
    }

    #[test]
    fn test_field_errors_keep_first_message() {
        let mut errors = FieldErrors::new();
        errors.insert("price", "Price is required");
        errors.insert("price", "Price must be positive");
        errors.insert("name", "Name is required");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("price"), Some("Price is required"));
        assert!(errors.clone().into_result(()).is_err());

        let err: AppError = errors.into();
        assert_eq!(err.field(), Some("name"));
    }

    #[test]
    fn test_integrity_error_converts() {
        let err: AppError = TreeError::DanglingParent { id: 5, parent_id: 9 }.into();
        assert!(err.user_message().contains("missing parent 9"));
    }
}

//! HTTP Client
//!
//! Request plumbing shared by the resource modules: URL building,
//! status mapping and JSON decoding.

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct HttpCatalogApi {
    client: Client,
    config: AppConfig,
}

impl HttpCatalogApi {
    pub fn new(config: AppConfig) -> Self {
        Self { client: Client::new(), config }
    }

    pub(super) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.config.endpoint(path))
    }

    /// Send and return the raw body of a successful response
    pub(super) async fn send(&self, label: &str, request: RequestBuilder) -> AppResult<String> {
        tracing::debug!("[API] {}", label);
        let response = request.send().await.map_err(|e| {
            tracing::error!("[API] {} failed: {}", label, e);
            AppError::from(e)
        })?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            tracing::error!("[API] {} body unreadable: {}", label, e);
            AppError::from(e)
        })?;

        match error_for_status(status, &body) {
            Some(err) => {
                tracing::error!("[API] {} -> {}: {}", label, status, err);
                Err(err)
            }
            None => Ok(body),
        }
    }

    pub(super) async fn send_json<T: DeserializeOwned>(&self, label: &str, request: RequestBuilder) -> AppResult<T> {
        let body = self.send(label, request).await?;
        decode(&body).map_err(|err| {
            tracing::error!("[API] {} -> {}", label, err);
            err
        })
    }
}

pub(super) fn decode<T: DeserializeOwned>(body: &str) -> AppResult<T> {
    serde_json::from_str(body).map_err(|e| AppError::Decode(e.to_string()))
}

/// Error for a non-2xx status; `None` on success
pub fn error_for_status(status: u16, body: &str) -> Option<AppError> {
    match status {
        200..=299 => None,
        400 | 409 | 422 => Some(AppError::Conflict(server_message(body))),
        _ => Some(AppError::Http { status, message: server_message(body) }),
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Human-readable message from an error body
pub fn server_message(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(message) = parsed.message.or(parsed.error).filter(|m| !m.trim().is_empty()) {
            return message;
        }
    }
    let text = body.trim();
    if text.is_empty() || text.starts_with('{') || text.starts_with('<') {
        "Request failed".to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_statuses() {
        assert_eq!(error_for_status(200, ""), None);
        assert_eq!(error_for_status(204, ""), None);
    }

    #[test]
    fn test_rejections_become_conflicts() {
        let body = r#"{"message":"Category has child categories"}"#;
        for status in [400, 409, 422] {
            assert_eq!(
                error_for_status(status, body),
                Some(AppError::Conflict("Category has child categories".into()))
            );
        }
    }

    #[test]
    fn test_other_failures_keep_status() {
        assert_eq!(
            error_for_status(500, "upstream exploded"),
            Some(AppError::Http { status: 500, message: "upstream exploded".into() })
        );
        assert_eq!(
            error_for_status(404, "<html>nope</html>"),
            Some(AppError::Http { status: 404, message: "Request failed".into() })
        );
    }

    #[test]
    fn test_server_message_fields() {
        assert_eq!(server_message(r#"{"error":"duplicate key"}"#), "duplicate key");
        assert_eq!(server_message(r#"{"message":"  "}"#), "Request failed");
        assert_eq!(server_message(""), "Request failed");
    }

    #[test]
    fn test_decode_failure() {
        let result: AppResult<Vec<u32>> = decode("not json");
        assert!(matches!(result, Err(AppError::Decode(_))));
    }
}

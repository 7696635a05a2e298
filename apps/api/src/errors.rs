use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::letter::validation::FieldIssue;
use crate::llm_client::LlmError;
use crate::render::RenderError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    /// One or more required fields are blank. Carries one issue per field.
    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldIssue>),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Completion service error: {0}")]
    ExternalService(String),

    #[error("Completion service timed out: {0}")]
    Timeout(String),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LlmError> for AppError {
    fn from(error: LlmError) -> Self {
        let message = error.to_string();
        match error {
            LlmError::Timeout(_) => AppError::Timeout(message),
            _ => AppError::ExternalService(message),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ExternalService(_) => StatusCode::BAD_GATEWAY,
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Render(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match &self {
            AppError::Validation(issues) => {
                let body = Json(json!({
                    "error": {
                        "code": "VALIDATION_ERROR",
                        "message": "Please complete the required fields",
                        "fields": issues,
                    }
                }));
                return (status, body).into_response();
            }
            AppError::BadRequest(msg) => ("BAD_REQUEST", msg.clone()),
            AppError::ExternalService(msg) => {
                tracing::error!("Completion service error: {msg}");
                (
                    "EXTERNAL_SERVICE_ERROR",
                    "The letter could not be generated. Please try again.".to_string(),
                )
            }
            AppError::Timeout(msg) => {
                tracing::error!("Completion service timeout: {msg}");
                (
                    "EXTERNAL_SERVICE_TIMEOUT",
                    "The letter service took too long to respond. Please try again.".to_string(),
                )
            }
            AppError::Render(e) => {
                tracing::error!("Render error: {e}");
                (
                    "RENDER_ERROR",
                    "The PDF could not be produced".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::letter::validation::{Field, Severity};

    async fn body_json(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_error_lists_fields() {
        let issues = vec![FieldIssue {
            field: Field::ResumeText,
            severity: Severity::Blocking,
            message: "Paste your resume content.".to_string(),
        }];
        let (status, body) = body_json(AppError::Validation(issues)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["fields"][0]["field"], "resume_text");
        assert_eq!(body["error"]["fields"][0]["severity"], "blocking");
    }

    #[tokio::test]
    async fn test_timeout_maps_to_gateway_timeout() {
        let error: AppError = LlmError::Timeout(Duration::from_secs(60)).into();
        assert!(matches!(error, AppError::Timeout(_)));
        let (status, body) = body_json(error).await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body["error"]["code"], "EXTERNAL_SERVICE_TIMEOUT");
    }

    #[tokio::test]
    async fn test_api_failure_maps_to_bad_gateway_without_leaking_detail() {
        let error: AppError = LlmError::Api {
            status: 401,
            message: "Incorrect API key provided: sk-abc".to_string(),
        }
        .into();
        let (status, body) = body_json(error).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(!body["error"]["message"].as_str().unwrap().contains("sk-abc"));
    }
}

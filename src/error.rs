/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - 検証結果 (Decision) はエラーではないのでここには来ない
 */
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },
    #[error("request timed out")]
    RequestTimeout,
    #[error("internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // The identity platform only looks at the status; no body.
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                [(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                )],
            )
                .into_response(),
            AppError::PayloadTooLarge { .. } => {
                error_response(StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", &self)
            }
            AppError::RequestTimeout => {
                error_response(StatusCode::REQUEST_TIMEOUT, "REQUEST_TIMEOUT", &self)
            }
            AppError::Internal => {
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_SERVER_ERROR", &self)
            }
        }
    }
}

fn error_response(status: StatusCode, code: &'static str, err: &AppError) -> Response {
    let body = ErrorResponse {
        error: ErrorBody {
            code,
            message: err.to_string(),
        },
    };
    (status, Json(body)).into_response()
}

use crate::application::booking::{BookingApplicationError, ErrorKind};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを提供する。
#[derive(Debug)]
pub enum ApiError {
    /// アプリケーション層のエラー
    Application(BookingApplicationError),
    /// リクエストの形式不正（クエリ・ステータス文字列など）
    BadRequest(String),
}

impl From<BookingApplicationError> for ApiError {
    fn from(err: BookingApplicationError) -> Self {
        ApiError::Application(err)
    }
}

/// エラー分類からHTTPステータスを決める
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST", message),
            ApiError::Application(err) => {
                let kind = err.kind();
                if kind == ErrorKind::Internal {
                    // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
                    let source = std::error::Error::source(&err)
                        .map(|s| s.to_string())
                        .unwrap_or_default();
                    tracing::error!(
                        error = %err,
                        source = %source,
                        "Internal error in booking handler"
                    );
                    (
                        status_for(kind),
                        err.code(),
                        "An unexpected error occurred".to_string(),
                    )
                } else {
                    (status_for(kind), err.code(), err.to_string())
                }
            }
        };

        let body = Json(ErrorResponse::new(code, message));
        (status, body).into_response()
    }
}

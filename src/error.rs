//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//!
//! 에러는 세 가지 "도메인 에러"와 인프라 에러로 나뉩니다:
//! - `Validation`: 이름/본문/세션 값이 규칙을 어김 (400)
//! - `NotFound`: 대상 카테고리/스니펫/세션이 없음 (404)
//! - `Conflict`: 같은 범위 안에서 이름이 중복됨 (409)
//! - `Database`, `Migration`, `Io`, `Internal`: 서버 내부 문제 (500)
//!
//! 데이터 접근 계층은 sqlx 에러를 그대로 위로 전파하고,
//! 이름 중복(UNIQUE 제약 위반)만 `Conflict`로 바꿉니다.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 입력값 검증 실패 (HTTP 400)
    ///
    /// `field`는 어떤 필드가 규칙을 어겼는지 나타냅니다 (예: "category_name").
    #[error("Validation failed on `{field}`: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// 요청한 리소스를 찾을 수 없음 (HTTP 404)
    /// 문자열은 리소스 종류입니다 (예: "snippet").
    #[error("{0} not found")]
    NotFound(&'static str),

    /// 이름 중복 (HTTP 409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),

    /// 데이터베이스 오류 (HTTP 500)
    /// #[from]: `?`로 sqlx::Error를 자동 변환합니다.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// 마이그레이션 실패 (서버 시작 시에만 발생)
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// 파일 입출력 오류 (DB 디렉토리 생성 등)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// 검증 에러를 간단히 만드는 헬퍼
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field,
            message: message.into(),
        }
    }

    /// sqlx 에러가 UNIQUE 제약 위반이면 `Conflict`로, 아니면 `Database`로 변환합니다.
    ///
    /// 사전 중복 검사와 INSERT 사이에 다른 요청이 끼어든 경우에도
    /// DB 제약이 최종적으로 중복을 막고, 클라이언트에는 409가 전달됩니다.
    pub fn from_unique_violation(err: sqlx::Error, message: impl Into<String>) -> Self {
        match err.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => AppError::Conflict(message.into()),
            _ => AppError::Database(err),
        }
    }
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 내부 에러(Database, Migration, IO, Internal)는 실제 내용을 로그에만 기록하고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다.
    fn into_response(self) -> Response {
        let (status, code, message, field) = match self {
            AppError::Validation { field, ref message } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                message.clone(),
                Some(field),
            ),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", self.to_string(), None),
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, "conflict", msg.clone(), None),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "A database error occurred".to_string(),
                    None,
                )
            }
            AppError::Migration(ref e) => {
                tracing::error!("Migration error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "A database error occurred".to_string(),
                    None,
                )
            }
            AppError::Io(ref e) => {
                tracing::error!("IO error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "io_error",
                    "An IO error occurred".to_string(),
                    None,
                )
            }
        };

        // 결과: { "error": { "code": "validation_error", "message": "...", "field": "..." } }
        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(field) = field {
            error["field"] = json!(field);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

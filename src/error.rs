/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body / WWW-Authenticate)
 * - identity / policy のエラーを 401 / 403 / 500 に統一的に変換
 */
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::auth::{Denial, IdentityError};

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
    /// token が無い
    #[error("unauthorized")]
    Unauthorized,
    /// token はあるが検証できない / principal が取れない
    #[error("invalid token")]
    InvalidToken,
    /// 認証済みだが role が足りない
    #[error("forbidden")]
    Forbidden,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    fn www_authenticate(&self) -> Option<&'static str> {
        match self {
            AppError::Unauthorized => Some("Bearer"),
            AppError::InvalidToken => Some(r#"Bearer error="invalid_token""#),
            AppError::Forbidden => Some(r#"Bearer error="insufficient_scope""#),
            AppError::Internal => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_SERVER_ERROR"),
        };
        let challenge = self.www_authenticate();

        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message: self.to_string(),
            },
        };

        let mut res = (status, Json(body)).into_response();
        if let Some(challenge) = challenge {
            res.headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(challenge));
        }
        res
    }
}

impl From<IdentityError> for AppError {
    fn from(e: IdentityError) -> Self {
        match e {
            // token に principal が無い → 認証失敗
            IdentityError::MissingClaim(_) => AppError::InvalidToken,
            // token schema と resource-id の不一致。運用側で直すもの
            IdentityError::MalformedResourceAccess { .. } => AppError::Internal,
        }
    }
}

impl From<Denial> for AppError {
    fn from(d: Denial) -> Self {
        match d {
            Denial::Unauthenticated => AppError::Unauthorized,
            Denial::InsufficientRole { .. } => AppError::Forbidden,
        }
    }
}

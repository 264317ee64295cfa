//! `Authorization: Bearer <token>` の取り出し
//!
//! - ヘッダ無し → `Ok(None)` (未認証)
//! - ヘッダはあるが Bearer として読めない → `InvalidToken`

use axum::http::{HeaderMap, header};

use crate::error::AppError;

const SCHEME: &str = "bearer";

pub fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, AppError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value.to_str().map_err(|_| AppError::InvalidToken)?;
    let (scheme, token) = value.split_once(' ').ok_or(AppError::InvalidToken)?;

    // scheme is case-insensitive (RFC 7235)
    if !scheme.eq_ignore_ascii_case(SCHEME) {
        return Err(AppError::InvalidToken);
    }

    let token = token.trim();
    if token.is_empty() || token.contains(char::is_whitespace) {
        return Err(AppError::InvalidToken);
    }

    Ok(Some(token))
}

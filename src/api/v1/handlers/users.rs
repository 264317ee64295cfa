/*
 * Responsibility
 * - /users 系 handler
 * - role 要件は routes.rs 側で route_layer として宣言する (handler には入ってこない)
 */
use axum::http::StatusCode;

use crate::api::v1::extractors::AuthCtxExtractor;

/// role_user or role_admin
pub async fn list_users(AuthCtxExtractor(ctx): AuthCtxExtractor) -> (StatusCode, &'static str) {
    tracing::debug!(principal = ctx.principal(), jti = ctx.jti.as_deref(), "list users");
    (StatusCode::OK, "List of users")
}

/// role_admin only
pub async fn list_admin_users(
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> (StatusCode, &'static str) {
    tracing::debug!(principal = ctx.principal(), jti = ctx.jti.as_deref(), "list admin users");
    (StatusCode::OK, "List of admin users")
}

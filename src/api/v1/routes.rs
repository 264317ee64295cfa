/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - endpoint ごとの role 要件 (RoleRequirement) もここで宣言する
 * - 認証 (Bearer) 自体は app.rs で v1 全体に掛ける
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::auth::require;
use crate::services::auth::RoleRequirement;
use crate::state::AppState;

use crate::api::v1::handlers::{
    me::me,
    users::{list_admin_users, list_users},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users",
            require::apply(
                get(list_users),
                RoleRequirement::any_role(["role_user", "role_admin"]),
            )
            .merge(require::apply(
                post(list_admin_users),
                RoleRequirement::role("role_admin"),
            )),
        )
        .route("/me", get(me))
}

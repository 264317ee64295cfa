//! endpoint ごとの role 要件 (`RoleRequirement`) を評価する route layer
//!
//! 例：
//! ```ignore
//! .route("/users", require::apply(get(list_users), RoleRequirement::role("role_admin")))
//! ```

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::{Decision, Denial, RoleRequirement, authorize};
use crate::state::AppState;

/// `route` の handler の前で `requirement` を評価する。
pub fn apply(
    route: MethodRouter<AppState>,
    requirement: RoleRequirement,
) -> MethodRouter<AppState> {
    route.route_layer(middleware::from_fn_with_state(
        Arc::new(requirement),
        require_middleware,
    ))
}

async fn require_middleware(
    State(requirement): State<Arc<RoleRequirement>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_ctx = req.extensions().get::<AuthCtx>();

    match authorize(auth_ctx.map(|ctx| ctx.identity.as_ref()), &requirement) {
        Decision::Allow => Ok(next.run(req).await),
        Decision::Deny(denial) => {
            // role 不足は想定内の結果なので warn にはしない
            if let Denial::InsufficientRole { required } = &denial {
                tracing::debug!(
                    principal = auth_ctx.map(AuthCtx::principal),
                    required = %required,
                    method = %req.method(),
                    path = %req.uri().path(),
                    "access denied: insufficient role"
                );
            }
            Err(denial.into())
        }
    }
}

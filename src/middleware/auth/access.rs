//! access token (JWT) 検証 → claims から identity を組み立てて AuthCtx を extensions に入れる
//!
//! - 署名/iss/exp/aud は `TokenVerifier` 側
//! - authorities / principal の導出は `ClaimMapping::build`
//! - ここでは HTTP への変換とログだけを扱う (stateless, リクエストごとに評価)

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::IdentityError;
use crate::state::AppState;

use super::bearer::bearer_token;

/// `/api/v1/*` に認証を掛けるための middleware を適用する。
///
/// 例：
/// ```ignore
/// let v1 = api::v1::routes();
/// let v1 = middleware::auth::access::apply(v1, state.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = match bearer_token(req.headers())? {
        Some(token) => token,
        // 全 endpoint が認証必須 (anonymous は通さない)
        None => return Err(AppError::Unauthorized),
    };

    let claims = match state.verifier.verify(token) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(error = %err, "access token verification failed");
            return Err(AppError::InvalidToken);
        }
    };

    let identity = match state.claim_mapping.build(&claims) {
        Ok(identity) => identity,
        Err(err @ IdentityError::MissingClaim(_)) => {
            tracing::warn!(error = %err, "access token has no usable principal");
            return Err(err.into());
        }
        Err(err @ IdentityError::MalformedResourceAccess { .. }) => {
            tracing::error!(
                error = %err,
                jti = claims.jti(),
                "resource_access does not match the expected token schema"
            );
            return Err(err.into());
        }
    };

    tracing::debug!(
        principal = identity.principal(),
        authorities = identity.authorities().len(),
        "authenticated"
    );

    let auth_ctx = AuthCtx::new(identity, claims.jti().map(str::to_string));

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(auth_ctx);

    Ok(next.run(req).await)
}

/*
 * Responsibility
 * - GET /me: 認証済みなら誰でも。token から導出された principal / authorities を返す
 * - resource-id / principal-attribute の設定確認用
 */
use axum::Json;

use crate::api::v1::{dto::me::MeResponse, extractors::AuthCtxExtractor};

pub async fn me(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<MeResponse> {
    Json(MeResponse {
        principal: ctx.principal().to_string(),
        authorities: ctx.authorities().iter().cloned().collect(),
    })
}

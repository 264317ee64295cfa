/*
 * Responsibility
 * - GET /me の response DTO
 * - authorities は BTreeSet 由来なのでソート済みで返る
 */
use serde::Serialize;

use crate::services::auth::Authority;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub principal: String,
    pub authorities: Vec<Authority>,
}

/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - verifier: TokenVerifier, claim_mapping: ClaimMapping
 * - Clone 前提で持つ (内部は Arc/Clone cheap)。起動後は読み取り専用
 */
use std::sync::Arc;

use crate::services::auth::{ClaimMapping, TokenVerifier};

#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<dyn TokenVerifier>,
    pub claim_mapping: Arc<ClaimMapping>,
}

impl AppState {
    pub fn new(verifier: Arc<dyn TokenVerifier>, claim_mapping: ClaimMapping) -> Self {
        Self {
            verifier,
            claim_mapping: Arc::new(claim_mapping),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("claim_mapping", &self.claim_mapping)
            .finish_non_exhaustive()
    }
}

/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - JWT の検証と claims → identity 変換は middleware/services 側の責務
 * - リクエストごとに作って捨てる (session / cache なし)
 */
use std::sync::Arc;

use crate::services::auth::{Authorities, AuthenticatedIdentity};

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `identity` は principal + authorities (role 判定はこれだけを見る)
/// - `jti` は監査/相関用
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub identity: Arc<AuthenticatedIdentity>,
    pub jti: Option<String>,
}

impl AuthCtx {
    pub fn new(identity: AuthenticatedIdentity, jti: Option<String>) -> Self {
        Self {
            identity: Arc::new(identity),
            jti,
        }
    }

    pub fn principal(&self) -> &str {
        self.identity.principal()
    }

    pub fn authorities(&self) -> &Authorities {
        self.identity.authorities()
    }
}

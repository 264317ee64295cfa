use thiserror::Error;

/// Claims から identity を組み立てる時のエラー
///
/// - どちらも同じ入力なら同じ結果になる (retry しない)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// 主体 (principal) を表す claim が無い / 使える値でない
    #[error("missing '{0}' claim")]
    MissingClaim(String),

    /// `resource_access` の形が想定と違う (token と resource-id の不一致)
    #[error("malformed resource_access for '{resource_id}': {reason}")]
    MalformedResourceAccess {
        resource_id: String,
        reason: &'static str,
    },
}

use serde::Serialize;

use super::authorities::{self, Authorities, Authority};
use super::claims::Claims;
use super::error::IdentityError;
use super::principal;

/// Claims → identity 変換の設定 (起動後は読み取り専用)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimMapping {
    /// principal に使う claim 名。`None` / 空なら `sub`
    pub principal_attribute: Option<String>,
    /// `resource_access` のどのエントリを見るか (通常は client id)
    pub resource_id: String,
}

impl ClaimMapping {
    pub fn new(principal_attribute: Option<String>, resource_id: impl Into<String>) -> Self {
        Self {
            principal_attribute,
            resource_id: resource_id.into(),
        }
    }

    /// 検証済み claims から 1 リクエスト分の identity を組み立てる
    pub fn build(&self, claims: &Claims) -> Result<AuthenticatedIdentity, IdentityError> {
        let authorities = authorities::resolve(claims, &self.resource_id)?;
        let principal = principal::resolve(claims, self.principal_attribute.as_deref())?;

        Ok(AuthenticatedIdentity {
            principal,
            authorities,
        })
    }
}

/// 認証済みの呼び出し元。リクエストごとに作って捨てる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedIdentity {
    principal: String,
    authorities: Authorities,
}

impl AuthenticatedIdentity {
    pub fn principal(&self) -> &str {
        &self.principal
    }

    pub fn authorities(&self) -> &Authorities {
        &self.authorities
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities
            .iter()
            .any(|granted| granted.as_str() == authority)
    }

    /// `has_role("admin")` checks for `ROLE_admin`.
    pub fn has_role(&self, role: &str) -> bool {
        self.authorities.contains(&Authority::role(role))
    }
}

#[cfg(test)]
impl AuthenticatedIdentity {
    pub(crate) fn for_test(principal: &str, authorities: &[&str]) -> Self {
        Self {
            principal: principal.to_string(),
            authorities: authorities.iter().copied().map(Authority::new).collect(),
        }
    }
}

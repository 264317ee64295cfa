use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::claims::Claims;
use super::error::IdentityError;

pub const ROLE_PREFIX: &str = "ROLE_";

const SCOPE_CLAIMS: [&str; 2] = ["scope", "scp"];
const RESOURCE_ACCESS_CLAIM: &str = "resource_access";
const ROLES_KEY: &str = "roles";

/// Granted permission. Compared by exact string equality.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Authority(String);

impl Authority {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// `admin` -> `ROLE_admin`
    pub fn role(name: &str) -> Self {
        Self(format!("{ROLE_PREFIX}{name}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub type Authorities = BTreeSet<Authority>;

/// scope 由来 + resource_access 由来の authority を重複なしでまとめる
pub fn resolve(claims: &Claims, resource_id: &str) -> Result<Authorities, IdentityError> {
    let mut authorities = scope_authorities(claims);
    authorities.extend(resource_role_authorities(claims, resource_id)?);
    Ok(authorities)
}

/// `scope` (なければ `scp`) をそのまま authority にする。prefix は付けない。
///
/// Space-delimited strings and string lists are both accepted; any other
/// shape contributes nothing.
pub fn scope_authorities(claims: &Claims) -> Authorities {
    let Some(value) = SCOPE_CLAIMS.iter().find_map(|name| claims.get(name)) else {
        return Authorities::new();
    };

    match value {
        Value::String(s) => s.split_whitespace().map(Authority::new).collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .flat_map(str::split_whitespace)
            .map(Authority::new)
            .collect(),
        _ => Authorities::new(),
    }
}

/// `resource_access.<resource_id>.roles` を `ROLE_` 付きの authority にする。
///
/// - `resource_access` が無い / resource_id のエントリが無い → 空 (エラーではない)
/// - エントリはあるが形が違う → `MalformedResourceAccess`
pub fn resource_role_authorities(
    claims: &Claims,
    resource_id: &str,
) -> Result<Authorities, IdentityError> {
    let malformed = |reason| IdentityError::MalformedResourceAccess {
        resource_id: resource_id.to_string(),
        reason,
    };

    let Some(resource_access) = claims.get(RESOURCE_ACCESS_CLAIM) else {
        return Ok(Authorities::new());
    };
    let resource_access = resource_access
        .as_object()
        .ok_or_else(|| malformed("resource_access is not an object"))?;

    let Some(resource) = resource_access.get(resource_id).filter(|v| !v.is_null()) else {
        return Ok(Authorities::new());
    };
    let resource = resource
        .as_object()
        .ok_or_else(|| malformed("resource entry is not an object"))?;

    let roles = resource
        .get(ROLES_KEY)
        .ok_or_else(|| malformed("roles is missing"))?
        .as_array()
        .ok_or_else(|| malformed("roles is not a list"))?;

    roles
        .iter()
        .map(|role| {
            role.as_str()
                .map(Authority::role)
                .ok_or_else(|| malformed("roles contains a non-string value"))
        })
        .collect()
}

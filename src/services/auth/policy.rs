//! Role-based access decisions for protected operations.
//!
//! Requirements are a small expression tree evaluated against the
//! authorities of an [`AuthenticatedIdentity`]. `Role("admin")` matches the
//! `ROLE_admin` authority produced by the resolver, so route declarations
//! use bare role names and never repeat the prefix.

use std::fmt;

use super::authorities::Authority;
use super::identity::AuthenticatedIdentity;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleRequirement {
    /// `ROLE_<name>` must be granted
    Role(String),
    /// exact authority (e.g. a scope) must be granted
    Authority(String),
    /// at least one; empty never matches
    AnyOf(Vec<RoleRequirement>),
    /// every one; empty always matches
    AllOf(Vec<RoleRequirement>),
}

impl RoleRequirement {
    pub fn role(name: impl Into<String>) -> Self {
        Self::Role(name.into())
    }

    pub fn authority(name: impl Into<String>) -> Self {
        Self::Authority(name.into())
    }

    pub fn any_role<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AnyOf(names.into_iter().map(|name| Self::Role(name.into())).collect())
    }

    pub fn all_roles<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AllOf(names.into_iter().map(|name| Self::Role(name.into())).collect())
    }

    pub fn is_satisfied_by(&self, identity: &AuthenticatedIdentity) -> bool {
        match self {
            Self::Role(name) => identity.authorities().contains(&Authority::role(name)),
            Self::Authority(name) => identity.has_authority(name),
            Self::AnyOf(items) => items.iter().any(|r| r.is_satisfied_by(identity)),
            Self::AllOf(items) => items.iter().all(|r| r.is_satisfied_by(identity)),
        }
    }
}

impl fmt::Display for RoleRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(
            f: &mut fmt::Formatter<'_>,
            items: &[RoleRequirement],
            op: &str,
            empty: &str,
        ) -> fmt::Result {
            if items.is_empty() {
                return f.write_str(empty);
            }
            f.write_str("(")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, " {op} ")?;
                }
                write!(f, "{item}")?;
            }
            f.write_str(")")
        }

        match self {
            Self::Role(name) => write!(f, "hasRole({name})"),
            Self::Authority(name) => write!(f, "hasAuthority({name})"),
            Self::AnyOf(items) => join(f, items, "or", "denyAll"),
            Self::AllOf(items) => join(f, items, "and", "permitAll"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    /// no identity on the request (401)
    Unauthenticated,
    /// identity present, requirement not met (403)
    InsufficientRole { required: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(Denial),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// 1 リクエストにつき 1 回評価する。結果はキャッシュしない。
pub fn authorize(
    identity: Option<&AuthenticatedIdentity>,
    requirement: &RoleRequirement,
) -> Decision {
    let Some(identity) = identity else {
        return Decision::Deny(Denial::Unauthenticated);
    };

    if requirement.is_satisfied_by(identity) {
        Decision::Allow
    } else {
        Decision::Deny(Denial::InsufficientRole {
            required: requirement.to_string(),
        })
    }
}

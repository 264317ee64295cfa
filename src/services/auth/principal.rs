use serde_json::Value;

use super::claims::Claims;
use super::error::IdentityError;

pub const SUBJECT_CLAIM: &str = "sub";

/// 設定された claim 名 (空なら `sub`) から principal を取り出す
pub fn resolve(
    claims: &Claims,
    principal_attribute: Option<&str>,
) -> Result<String, IdentityError> {
    let name = principal_claim_name(principal_attribute);

    let value = match claims.get(name) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err(IdentityError::MissingClaim(name.to_string())),
    };

    Ok(value)
}

pub fn principal_claim_name(principal_attribute: Option<&str>) -> &str {
    principal_attribute
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(SUBJECT_CLAIM)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims() -> Claims {
        Claims::try_from(json!({"preferred_username": "alice", "sub": "123"})).unwrap()
    }

    #[test]
    fn configured_attribute_wins() {
        assert_eq!(
            resolve(&claims(), Some("preferred_username")).unwrap(),
            "alice"
        );
    }

    #[test]
    fn unset_or_blank_attribute_falls_back_to_sub() {
        assert_eq!(resolve(&claims(), None).unwrap(), "123");
        assert_eq!(resolve(&claims(), Some("")).unwrap(), "123");
        assert_eq!(resolve(&claims(), Some("  ")).unwrap(), "123");
    }

    #[test]
    fn absent_claim_is_missing() {
        assert_eq!(
            resolve(&claims(), Some("email")),
            Err(IdentityError::MissingClaim("email".to_string()))
        );
    }

    #[test]
    fn unusable_values_are_missing() {
        let claims = Claims::try_from(json!({"sub": "  ", "groups": ["a"]})).unwrap();

        assert!(resolve(&claims, None).is_err());
        assert!(resolve(&claims, Some("groups")).is_err());
    }

    #[test]
    fn numeric_principal_is_rendered() {
        let claims = Claims::try_from(json!({"uid": 42})).unwrap();

        assert_eq!(resolve(&claims, Some("uid")).unwrap(), "42");
    }
}

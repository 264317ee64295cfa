use serde::Deserialize;
use serde_json::{Map, Value};

/// Verified token payload.
///
/// - 署名/iss/exp などの検証は `TokenVerifier` 側で済んでいる前提
/// - ここでは claim 名 → 値 の読み取り専用 map としてだけ扱う
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    pub fn new(claims: Map<String, Value>) -> Self {
        Self(claims)
    }

    /// `null` is treated the same as an absent claim.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name).filter(|v| !v.is_null())
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn jti(&self) -> Option<&str> {
        self.get_str("jti")
    }
}

impl From<Map<String, Value>> for Claims {
    fn from(claims: Map<String, Value>) -> Self {
        Self(claims)
    }
}

impl TryFrom<Value> for Claims {
    type Error = serde_json::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        serde_json::from_value(value)
    }
}

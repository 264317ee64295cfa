/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, issuer, 検証鍵, claim mapping など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::services::auth::{ClaimMapping, VerificationKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub auth_issuer: String,
    pub auth_audience: Option<String>,
    pub access_token_leeway_seconds: u64,
    pub verification_key: VerificationKey,

    // jwt.auth.converter.*
    pub claim_mapping: ClaimMapping,

    pub request_timeout: Duration,
    pub request_body_limit_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `from_env` の本体。テストでは map を渡す。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // 空文字は未設定扱い
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port: u16 = match get("PORT") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = get("APP_ENV")
            .map(|v| AppEnv::parse(&v))
            .unwrap_or(AppEnv::Development);

        let auth_issuer = get("AUTH_ISSUER").ok_or(ConfigError::Missing("AUTH_ISSUER"))?;
        let auth_audience = get("AUTH_AUDIENCE");

        let access_token_leeway_seconds = match get("ACCESS_TOKEN_LEEWAY_SECONDS") {
            Some(v) => v
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("ACCESS_TOKEN_LEEWAY_SECONDS"))?,
            None => 60,
        };

        let verification_key = match (
            get("ACCESS_JWT_PUBLIC_KEY_PEM"),
            get("ACCESS_JWT_HMAC_SECRET"),
        ) {
            (Some(pem), None) => VerificationKey::PublicKeyPem {
                algorithm: get("ACCESS_JWT_ALGORITHM").unwrap_or_else(|| "RS256".to_string()),
                pem: pem.replace("\\n", "\n"),
            },
            (None, Some(secret)) => VerificationKey::HmacSecret(secret),
            (Some(_), Some(_)) => return Err(ConfigError::Invalid("ACCESS_JWT_HMAC_SECRET")),
            (None, None) => return Err(ConfigError::Missing("ACCESS_JWT_PUBLIC_KEY_PEM")),
        };

        let resource_id = get("JWT_AUTH_CONVERTER_RESOURCE_ID")
            .ok_or(ConfigError::Missing("JWT_AUTH_CONVERTER_RESOURCE_ID"))?;
        let claim_mapping = ClaimMapping::new(
            get("JWT_AUTH_CONVERTER_PRINCIPAL_ATTRIBUTE"),
            resource_id,
        );

        let request_timeout = match get("REQUEST_TIMEOUT_SECONDS") {
            Some(v) => v
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"))?,
            None => Duration::from_secs(30),
        };

        let request_body_limit_bytes = match get("REQUEST_BODY_LIMIT_BYTES") {
            Some(v) => v
                .parse::<usize>()
                .map_err(|_| ConfigError::Invalid("REQUEST_BODY_LIMIT_BYTES"))?,
            None => 1024 * 1024,
        };

        Ok(Self {
            addr,
            app_env,
            auth_issuer,
            auth_audience,
            access_token_leeway_seconds,
            verification_key,
            claim_mapping,
            request_timeout,
            request_body_limit_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("AUTH_ISSUER", "http://localhost:8080/realms/demo"),
        ("ACCESS_JWT_HMAC_SECRET", "dev-secret"),
        ("JWT_AUTH_CONVERTER_RESOURCE_ID", "demo-rest-api"),
    ];

    #[test]
    fn defaults() {
        let config = load(&REQUIRED).unwrap();

        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.auth_audience, None);
        assert_eq!(config.access_token_leeway_seconds, 60);
        assert_eq!(config.claim_mapping.principal_attribute, None);
        assert_eq!(config.claim_mapping.resource_id, "demo-rest-api");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn blank_principal_attribute_is_unset() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("JWT_AUTH_CONVERTER_PRINCIPAL_ATTRIBUTE", "  "));

        assert_eq!(load(&vars).unwrap().claim_mapping.principal_attribute, None);
    }

    #[test]
    fn resource_id_is_required() {
        assert_eq!(
            load(&REQUIRED[..2]).unwrap_err(),
            ConfigError::Missing("JWT_AUTH_CONVERTER_RESOURCE_ID")
        );
    }

    #[test]
    fn exactly_one_key_source() {
        let none = [REQUIRED[0], REQUIRED[2]];
        assert_eq!(
            load(&none).unwrap_err(),
            ConfigError::Missing("ACCESS_JWT_PUBLIC_KEY_PEM")
        );

        let mut both = REQUIRED.to_vec();
        both.push(("ACCESS_JWT_PUBLIC_KEY_PEM", "-----BEGIN PUBLIC KEY-----"));
        assert_eq!(
            load(&both).unwrap_err(),
            ConfigError::Invalid("ACCESS_JWT_HMAC_SECRET")
        );
    }

    #[test]
    fn pem_defaults_to_rs256_and_unescapes_newlines() {
        let vars = [
            REQUIRED[0],
            REQUIRED[2],
            ("ACCESS_JWT_PUBLIC_KEY_PEM", "-----BEGIN\\nKEY-----"),
        ];

        match load(&vars).unwrap().verification_key {
            VerificationKey::PublicKeyPem { algorithm, pem } => {
                assert_eq!(algorithm, "RS256");
                assert_eq!(pem, "-----BEGIN\nKEY-----");
            }
            other => panic!("unexpected key source: {other:?}"),
        }
    }

    #[test]
    fn invalid_numbers_fail_startup() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("PORT", "http"));
        assert_eq!(load(&vars).unwrap_err(), ConfigError::Invalid("PORT"));

        let mut vars = REQUIRED.to_vec();
        vars.push(("REQUEST_TIMEOUT_SECONDS", "0"));
        assert_eq!(
            load(&vars).unwrap_err(),
            ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS")
        );
    }

    #[test]
    fn production_env() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("APP_ENV", "PROD"));

        assert!(load(&vars).unwrap().app_env.is_production());
    }
}

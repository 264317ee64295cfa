use std::str::FromStr;

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use thiserror::Error;

use super::claims::Claims;

// Errors returned by access-token verification.
#[derive(Debug, Error)]
pub enum AccessJwtError {
    #[error("jwt verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Error)]
pub enum VerifierConfigError {
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("invalid public key pem: {0}")]
    InvalidKey(jsonwebtoken::errors::Error),
}

/// 署名・iss・exp (・aud) を検証して claims を返す境界
///
/// identity 組み立て側はここを通った claims だけを信頼する。
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Claims, AccessJwtError>;
}

/// Where the verification key comes from.
#[derive(Clone)]
pub enum VerificationKey {
    /// Issuer public key (e.g. Keycloak realm key) with its algorithm.
    PublicKeyPem { algorithm: String, pem: String },
    /// Shared HS256 secret, local development only.
    HmacSecret(String),
}

impl std::fmt::Debug for VerificationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        match self {
            Self::PublicKeyPem { algorithm, .. } => f
                .debug_struct("PublicKeyPem")
                .field("algorithm", algorithm)
                .finish_non_exhaustive(),
            Self::HmacSecret(_) => f.write_str("HmacSecret(..)"),
        }
    }
}

/// jsonwebtoken-based access-token verifier.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtVerifier {
    pub fn new(
        key: &VerificationKey,
        issuer: &str,
        audience: Option<&str>,
        leeway_seconds: u64,
    ) -> Result<Self, VerifierConfigError> {
        let (algorithm, decoding_key) = match key {
            VerificationKey::PublicKeyPem { algorithm, pem } => {
                let algorithm = Algorithm::from_str(algorithm)
                    .map_err(|_| VerifierConfigError::UnsupportedAlgorithm(algorithm.clone()))?;
                let decoding_key = decoding_key_from_pem(algorithm, pem.as_bytes())?;
                (algorithm, decoding_key)
            }
            VerificationKey::HmacSecret(secret) => {
                (Algorithm::HS256, DecodingKey::from_secret(secret.as_bytes()))
            }
        };

        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[issuer]);
        validation.set_required_spec_claims(&["exp", "iss"]);
        match audience {
            Some(aud) => validation.set_audience(&[aud]),
            // Keycloak access tokens often carry `aud: account`; only check when configured
            None => validation.validate_aud = false,
        }
        validation.leeway = leeway_seconds;

        Ok(Self {
            decoding_key,
            validation,
        })
    }
}

fn decoding_key_from_pem(
    algorithm: Algorithm,
    pem: &[u8],
) -> Result<DecodingKey, VerifierConfigError> {
    let key = match algorithm {
        Algorithm::RS256
        | Algorithm::RS384
        | Algorithm::RS512
        | Algorithm::PS256
        | Algorithm::PS384
        | Algorithm::PS512 => DecodingKey::from_rsa_pem(pem),
        Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_pem(pem),
        Algorithm::EdDSA => DecodingKey::from_ed_pem(pem),
        other => {
            return Err(VerifierConfigError::UnsupportedAlgorithm(format!(
                "{other:?}"
            )));
        }
    };

    key.map_err(VerifierConfigError::InvalidKey)
}

impl TokenVerifier for JwtVerifier {
    /// `jsonwebtoken::Validation` checks signature, `exp`, `nbf` (leeway), `iss`
    /// and `aud` when configured. Claims are kept as an untyped map.
    fn verify(&self, token: &str) -> Result<Claims, AccessJwtError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?;

        Ok(data.claims)
    }
}

/// Factory: build the token verifier from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::access_jwt::VerifierConfigError;
use crate::services::auth::{JwtVerifier, TokenVerifier};

pub fn build_token_verifier(
    config: &Config,
) -> Result<Arc<dyn TokenVerifier>, VerifierConfigError> {
    let verifier = JwtVerifier::new(
        &config.verification_key,
        &config.auth_issuer,
        config.auth_audience.as_deref(),
        config.access_token_leeway_seconds,
    )?;

    Ok(Arc::new(verifier))
}

pub mod access_jwt;
pub mod authorities;
pub mod claims;
pub mod error;
pub mod factory;
pub mod identity;
pub mod policy;
pub mod principal;

pub use access_jwt::{JwtVerifier, TokenVerifier, VerificationKey};
pub use authorities::{Authorities, Authority};
pub use claims::Claims;
pub use error::IdentityError;
pub use factory::build_token_verifier;
pub use identity::{AuthenticatedIdentity, ClaimMapping};
pub use policy::{Decision, Denial, RoleRequirement, authorize};

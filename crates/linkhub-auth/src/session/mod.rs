//! Session tokens: stateless HS256 JWTs carrying the resolved identity.

pub mod claims;
pub mod issuer;
pub mod verifier;

pub use claims::SessionClaims;
pub use issuer::{SessionIssuer, SessionToken};
pub use verifier::{SessionVerifier, VerifiedIdentity};

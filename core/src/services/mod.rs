//! Services containing token issuance, verification and revocation.

pub mod authn;

// Re-export commonly used types
pub use authn::{
    Authenticator, JwtAuthenticator, KeyMaterial, KeyResolver, SigningConfig,
    SigningConfigBuilder, StaticKeyResolver,
};

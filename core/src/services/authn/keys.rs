//! Key material for signing and verifying tokens

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header};
use std::fs;
use std::path::Path;

use crate::errors::{DomainError, DomainResult, TokenError};

/// Key families, one per signing scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFamily {
    Hmac,
    Rsa,
    Ec,
    Ed,
}

impl KeyFamily {
    /// The family an algorithm signs with
    pub fn of(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => KeyFamily::Hmac,
            Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512 => KeyFamily::Rsa,
            Algorithm::ES256 | Algorithm::ES384 => KeyFamily::Ec,
            Algorithm::EdDSA => KeyFamily::Ed,
        }
    }
}

/// Secret or key pair a token is signed with
#[derive(Clone)]
pub enum KeyMaterial {
    /// Shared secret for HMAC algorithms
    Secret(Vec<u8>),
    /// PEM-encoded private and public key for asymmetric algorithms
    Pem {
        private_key: String,
        public_key: String,
    },
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyMaterial::Secret(secret) => f
                .debug_struct("Secret")
                .field("len", &secret.len())
                .finish(),
            KeyMaterial::Pem { .. } => f.debug_struct("Pem").finish_non_exhaustive(),
        }
    }
}

impl KeyMaterial {
    pub fn secret(secret: impl AsRef<[u8]>) -> Self {
        KeyMaterial::Secret(secret.as_ref().to_vec())
    }

    /// Creates key material from PEM strings (useful for testing or embedded keys)
    pub fn from_pem_strings(private_key: impl Into<String>, public_key: impl Into<String>) -> Self {
        KeyMaterial::Pem {
            private_key: private_key.into(),
            public_key: public_key.into(),
        }
    }

    /// Loads a PEM key pair from disk
    ///
    /// # Returns
    ///
    /// * `Ok(KeyMaterial)` - Both files were read
    /// * `Err(DomainError)` - Either file could not be read
    pub fn from_pem_files<P: AsRef<Path>>(
        private_key_path: P,
        public_key_path: P,
    ) -> DomainResult<Self> {
        let read = |path: &Path, which: &str| {
            fs::read_to_string(path).map_err(|e| {
                DomainError::configuration(format!(
                    "Failed to read {} key {}: {}",
                    which,
                    path.display(),
                    e
                ))
            })
        };

        Ok(KeyMaterial::Pem {
            private_key: read(private_key_path.as_ref(), "private")?,
            public_key: read(public_key_path.as_ref(), "public")?,
        })
    }

    /// Whether this material can drive `algorithm` at all
    pub fn fits(&self, algorithm: Algorithm) -> bool {
        match self {
            KeyMaterial::Secret(_) => KeyFamily::of(algorithm) == KeyFamily::Hmac,
            KeyMaterial::Pem { .. } => KeyFamily::of(algorithm) != KeyFamily::Hmac,
        }
    }

    /// Key used to sign tokens with `algorithm`
    pub fn encoding_key(&self, algorithm: Algorithm) -> DomainResult<EncodingKey> {
        let key = match (self, KeyFamily::of(algorithm)) {
            (KeyMaterial::Secret(secret), KeyFamily::Hmac) => Ok(EncodingKey::from_secret(secret)),
            (KeyMaterial::Pem { private_key, .. }, KeyFamily::Rsa) => {
                EncodingKey::from_rsa_pem(private_key.as_bytes())
            }
            (KeyMaterial::Pem { private_key, .. }, KeyFamily::Ec) => {
                EncodingKey::from_ec_pem(private_key.as_bytes())
            }
            (KeyMaterial::Pem { private_key, .. }, KeyFamily::Ed) => {
                EncodingKey::from_ed_pem(private_key.as_bytes())
            }
            _ => return Err(family_mismatch(algorithm)),
        };

        key.map_err(|e| {
            DomainError::configuration(format!("Invalid private key for {:?}: {}", algorithm, e))
        })
    }

    /// Key used to verify tokens signed with `algorithm`
    pub fn decoding_key(&self, algorithm: Algorithm) -> DomainResult<DecodingKey> {
        let key = match (self, KeyFamily::of(algorithm)) {
            (KeyMaterial::Secret(secret), KeyFamily::Hmac) => Ok(DecodingKey::from_secret(secret)),
            (KeyMaterial::Pem { public_key, .. }, KeyFamily::Rsa) => {
                DecodingKey::from_rsa_pem(public_key.as_bytes())
            }
            (KeyMaterial::Pem { public_key, .. }, KeyFamily::Ec) => {
                DecodingKey::from_ec_pem(public_key.as_bytes())
            }
            (KeyMaterial::Pem { public_key, .. }, KeyFamily::Ed) => {
                DecodingKey::from_ed_pem(public_key.as_bytes())
            }
            _ => return Err(family_mismatch(algorithm)),
        };

        key.map_err(|e| {
            DomainError::configuration(format!("Invalid public key for {:?}: {}", algorithm, e))
        })
    }
}

fn family_mismatch(algorithm: Algorithm) -> DomainError {
    DomainError::configuration(format!(
        "Key material does not match the {:?} key family",
        algorithm
    ))
}

/// Chooses the verification key for a token
///
/// Resolvers see the already parsed header and must refuse any algorithm
/// they were not set up for; accepting whatever the token declares is what
/// makes algorithm-confusion attacks possible.
pub trait KeyResolver: Send + Sync {
    fn resolve(&self, header: &Header) -> Result<&DecodingKey, TokenError>;
}

/// Resolver holding a single key for a single algorithm
#[derive(Clone)]
pub struct StaticKeyResolver {
    algorithm: Algorithm,
    key: DecodingKey,
}

impl std::fmt::Debug for StaticKeyResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticKeyResolver")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

impl StaticKeyResolver {
    pub fn new(algorithm: Algorithm, key: DecodingKey) -> Self {
        Self { algorithm, key }
    }

    pub fn from_material(algorithm: Algorithm, material: &KeyMaterial) -> DomainResult<Self> {
        Ok(Self::new(algorithm, material.decoding_key(algorithm)?))
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
}

impl KeyResolver for StaticKeyResolver {
    fn resolve(&self, header: &Header) -> Result<&DecodingKey, TokenError> {
        if header.alg != self.algorithm {
            return Err(TokenError::AlgorithmMismatch);
        }
        Ok(&self.key)
    }
}

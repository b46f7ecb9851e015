//! Argon2id credential hashing.
//!
//! Digests are PHC strings, so the salt and cost parameters travel with the
//! hash and verification needs nothing but the stored value.

use std::sync::Arc;

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum HashError {
    /// No plaintext (or digest) was supplied.
    #[error("data and salt arguments required")]
    MissingArgument,

    #[error("malformed password hash: {0}")]
    Malformed(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("hashing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Salted one-way hasher for passwords.
///
/// Cloning is cheap; the blocking variants move a clone onto tokio's blocking
/// pool so a slow hash never occupies a request worker.
#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
    decoy: Arc<str>,
}

impl CredentialHasher {
    pub fn new() -> Result<Self, HashError> {
        let argon2 = Argon2::default();
        let filler: String = OsRng
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        let decoy = hash_with(&argon2, &filler)?;
        Ok(Self {
            argon2,
            decoy: decoy.into(),
        })
    }

    /// A valid digest of a random secret nobody knows. Verifying against it
    /// costs the same as verifying a real user's digest and never matches.
    pub fn decoy(&self) -> &str {
        &self.decoy
    }

    pub fn hash(&self, plain: Option<&str>) -> Result<String, HashError> {
        let plain = plain.ok_or(HashError::MissingArgument)?;
        hash_with(&self.argon2, plain)
    }

    pub fn verify(&self, plain: Option<&str>, digest: Option<&str>) -> Result<bool, HashError> {
        let (plain, digest) = match (plain, digest) {
            (Some(p), Some(d)) => (p, d),
            _ => return Err(HashError::MissingArgument),
        };
        let parsed = PasswordHash::new(digest).map_err(|e| {
            error!(error = %e, "argon2 parse hash error");
            HashError::Malformed(e.to_string())
        })?;
        match self.argon2.verify_password(plain.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(HashError::Hashing(e.to_string())),
        }
    }

    pub async fn hash_blocking(&self, plain: Option<String>) -> Result<String, HashError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(plain.as_deref())).await?
    }

    pub async fn verify_blocking(
        &self,
        plain: Option<String>,
        digest: String,
    ) -> Result<bool, HashError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify(plain.as_deref(), Some(&digest))).await?
    }
}

fn hash_with(argon2: &Argon2<'_>, plain: &str) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            HashError::Hashing(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> CredentialHasher {
        CredentialHasher::new().expect("hasher should build")
    }

    #[test]
    fn hash_and_verify_roundtrip() {
        let hasher = hasher();
        let password = "Secur3P@ssw0rd!";
        let hash = hasher.hash(Some(password)).expect("hashing should succeed");
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher
            .verify(Some(password), Some(&hash))
            .expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hasher = hasher();
        let hash = hasher
            .hash(Some("correct-horse-battery-staple"))
            .expect("hashing should succeed");
        assert!(!hasher
            .verify(Some("wrong-password"), Some(&hash))
            .expect("verify should not error"));
    }

    #[test]
    fn same_input_hashes_differently() {
        let hasher = hasher();
        let a = hasher.hash(Some("rahasia")).unwrap();
        let b = hasher.hash(Some("rahasia")).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn missing_plaintext_is_an_error() {
        let err = hasher().hash(None).unwrap_err();
        assert!(matches!(err, HashError::MissingArgument));
        assert_eq!(err.to_string(), "data and salt arguments required");
    }

    #[test]
    fn verify_requires_both_arguments() {
        let hasher = hasher();
        let hash = hasher.hash(Some("pw")).unwrap();
        assert!(matches!(
            hasher.verify(None, Some(&hash)),
            Err(HashError::MissingArgument)
        ));
        assert!(matches!(
            hasher.verify(Some("pw"), None),
            Err(HashError::MissingArgument)
        ));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = hasher()
            .verify(Some("anything"), Some("not-a-valid-hash"))
            .unwrap_err();
        assert!(matches!(err, HashError::Malformed(_)));
    }

    #[test]
    fn decoy_is_a_valid_digest_that_never_matches() {
        let hasher = hasher();
        assert!(!hasher.verify(Some(""), Some(hasher.decoy())).unwrap());
        assert!(!hasher.verify(Some("rahasia"), Some(hasher.decoy())).unwrap());
    }

    #[tokio::test]
    async fn blocking_variants_match_sync_ones() {
        let hasher = hasher();
        let hash = hasher
            .hash_blocking(Some("rahasia".into()))
            .await
            .expect("hash on blocking pool");
        assert!(hasher
            .verify_blocking(Some("rahasia".into()), hash.clone())
            .await
            .unwrap());
        assert!(matches!(
            hasher.verify_blocking(None, hash).await,
            Err(HashError::MissingArgument)
        ));
    }
}

//! Signing keys for session tokens.

use crate::error::TokenError;
use biscuit_auth::{Algorithm, KeyPair as BiscuitKeyPair, PrivateKey, PublicKey};
use rand::RngCore;
use std::path::Path;

/// An Ed25519 keypair for signing and verifying session tokens.
pub struct KeyPair {
    inner: BiscuitKeyPair,
}

impl Clone for KeyPair {
    fn clone(&self) -> Self {
        Self::from_private_key(self.inner.private())
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key_hex())
            .finish_non_exhaustive()
    }
}

impl KeyPair {
    /// Generate a new random keypair.
    pub fn generate() -> Result<Self, TokenError> {
        let mut rng = rand::rng();
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);

        let private_key = PrivateKey::from_bytes(&bytes, Algorithm::Ed25519)
            .map_err(|e| TokenError::KeyGenerationFailed(e.to_string()))?;

        Ok(Self::from_private_key(private_key))
    }

    /// Create a keypair from an existing private key.
    pub fn from_private_key(private_key: PrivateKey) -> Self {
        let inner = BiscuitKeyPair::from(&private_key);
        Self { inner }
    }

    /// Load a keypair from a hex-encoded private key string.
    pub fn from_private_key_hex(hex: &str) -> Result<Self, TokenError> {
        let private_key = PrivateKey::from_bytes_hex(hex.trim(), Algorithm::Ed25519)
            .map_err(|e| TokenError::InvalidPrivateKey(e.to_string()))?;
        Ok(Self::from_private_key(private_key))
    }

    /// Get the inner biscuit keypair.
    pub fn inner(&self) -> &BiscuitKeyPair {
        &self.inner
    }

    /// Get the public key.
    pub fn public_key(&self) -> PublicKey {
        self.inner.public()
    }

    /// Get the private key as hex string.
    pub fn private_key_hex(&self) -> String {
        self.inner.private().to_bytes_hex()
    }

    /// Get the public key as hex string.
    pub fn public_key_hex(&self) -> String {
        self.inner.public().to_bytes_hex()
    }

    /// Write the private key (hex) to a file, creating parent directories.
    pub fn save_to_file(&self, private_key_path: &Path) -> Result<(), TokenError> {
        if let Some(parent) = private_key_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(private_key_path, self.private_key_hex())?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(private_key_path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    /// Load a keypair from a private key file.
    pub fn load_from_file(private_key_path: &Path) -> Result<Self, TokenError> {
        let hex = std::fs::read_to_string(private_key_path)?;
        Self::from_private_key_hex(&hex)
    }

    /// Load the key at `path`, or generate one and save it there.
    pub fn load_or_generate(path: &Path) -> Result<Self, TokenError> {
        if path.exists() {
            return Self::load_from_file(path);
        }

        let keypair = Self::generate()?;
        keypair.save_to_file(path)?;
        tracing::info!(path = %path.display(), "generated new session signing key");
        Ok(keypair)
    }
}

/// Load a public key from hex string (for verification-only scenarios).
pub fn load_public_key_hex(hex: &str) -> Result<PublicKey, TokenError> {
    PublicKey::from_bytes_hex(hex.trim(), Algorithm::Ed25519)
        .map_err(|e| TokenError::InvalidPublicKey(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_keypair_roundtrip() {
        let keypair1 = KeyPair::generate().unwrap();
        let hex = keypair1.private_key_hex();

        let keypair2 = KeyPair::from_private_key_hex(&hex).unwrap();
        assert_eq!(keypair1.public_key_hex(), keypair2.public_key_hex());
    }

    #[test]
    fn test_clone_keeps_public_key() {
        let keypair = KeyPair::generate().unwrap();
        assert_eq!(keypair.clone().public_key_hex(), keypair.public_key_hex());
    }

    #[test]
    fn test_load_from_file_tolerates_trailing_newline() {
        let keypair = KeyPair::generate().unwrap();

        let mut priv_file = NamedTempFile::new().unwrap();
        writeln!(priv_file, "{}", keypair.private_key_hex()).unwrap();

        let loaded = KeyPair::load_from_file(priv_file.path()).unwrap();
        assert_eq!(keypair.public_key_hex(), loaded.public_key_hex());
    }

    #[test]
    fn test_load_or_generate_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.key");

        let first = KeyPair::load_or_generate(&path).unwrap();
        assert!(path.exists());
        let second = KeyPair::load_or_generate(&path).unwrap();
        assert_eq!(first.public_key_hex(), second.public_key_hex());
    }

    #[test]
    fn test_invalid_hex_is_rejected() {
        assert!(matches!(
            KeyPair::from_private_key_hex("not-a-key"),
            Err(TokenError::InvalidPrivateKey(_))
        ));
    }

    #[test]
    fn test_public_key_hex_roundtrip() {
        let keypair = KeyPair::generate().unwrap();
        let public = load_public_key_hex(&keypair.public_key_hex()).unwrap();
        assert_eq!(public.to_bytes_hex(), keypair.public_key_hex());
    }
}

//! Key and password commands.
//!
//! `nwr-audit keygen` - Generate a session signing key.
//! `nwr-audit hash-password` - Hash a password for the config file.

use nwr_token::KeyPair;
use std::path::PathBuf;

/// Generate a new signing key.
pub fn generate(output: Option<PathBuf>) -> anyhow::Result<()> {
    let keypair = KeyPair::generate()?;

    if let Some(path) = output {
        keypair.save_to_file(&path)?;

        println!("Generated session signing key: {}", path.display());
        println!("Public key: {}", keypair.public_key_hex());
        println!();
        println!("Keep the private key secure. Reference it from nwr-audit.yaml:");
        println!("  session:");
        println!("    private_key_file: {}", path.display());
    } else {
        println!("Private key (keep secure!):");
        println!("{}", keypair.private_key_hex());
        println!();
        println!("Public key:");
        println!("{}", keypair.public_key_hex());
        println!();
        println!("Use --output <file> to save the key.");
    }

    Ok(())
}

/// Argon2 PHC string for `password`.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    if password.is_empty() {
        anyhow::bail!("password must not be empty");
    }
    Ok(nwr_auth::hash_password(password)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_generate_key_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keys").join("session.key");
        generate(Some(path.clone())).unwrap();

        let hex = fs::read_to_string(&path).unwrap();
        assert_eq!(hex.trim().len(), 64);
        assert!(KeyPair::load_from_file(&path).is_ok());
    }

    #[test]
    fn test_hash_password() {
        let hash = hash_password("s3cret").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(hash_password("").is_err());
    }
}

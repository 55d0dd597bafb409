use std::sync::OnceLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::thread_rng;

use super::CredentialError;

pub const MIN_PASSWORD_LEN: usize = 8;

pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CredentialError::WeakPassword);
    }

    let salt = SaltString::generate(&mut thread_rng());
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| CredentialError::Hash(err.to_string()))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, CredentialError> {
    let parsed = PasswordHash::new(hash).map_err(|err| CredentialError::Hash(err.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Verifies against a throwaway hash so an unknown email costs as much as a wrong password.
pub fn burn_verification(password: &str) {
    static DUMMY: OnceLock<String> = OnceLock::new();
    let hash = DUMMY.get_or_init(|| hash_password("dummy-password-for-timing").unwrap_or_default());
    let _ = verify_password(password, hash);
}

#[cfg(test)]
mod tests {
    use super::{hash_password, verify_password};
    use crate::auth::CredentialError;

    #[test]
    fn hashes_are_salted_and_verifiable() {
        let first = hash_password("pw123456").expect("hash");
        let second = hash_password("pw123456").expect("hash");

        assert_ne!(first, second);
        assert!(first.starts_with("$argon2"));
        assert!(verify_password("pw123456", &first).expect("verify"));
        assert!(!verify_password("pw1234567", &first).expect("verify"));
    }

    #[test]
    fn rejects_short_password() {
        assert!(matches!(
            hash_password("short"),
            Err(CredentialError::WeakPassword)
        ));
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(matches!(
            verify_password("pw123456", "plaintext"),
            Err(CredentialError::Hash(_))
        ));
    }
}

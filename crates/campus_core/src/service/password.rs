//! Salted one-way password hashing.
//!
//! New hashes are Argon2id PHC strings (`$argon2id$v=19$...`) carrying their
//! own salt and cost parameters, so verification needs no side table.
//! Documents written by older deployments hold bcrypt strings (`$2a$`,
//! `$2b$`, `$2y$`); those are still verified, never produced.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use once_cell::sync::Lazy;

/// Hash of a throwaway password, verified against on unknown-email logins.
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("campus-dummy-password").ok());

/// Hashes `password` with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

/// Checks `password` against a stored Argon2 PHC string or legacy bcrypt hash.
///
/// An unparsable stored hash counts as a mismatch.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    if is_bcrypt_hash(stored_hash) {
        return bcrypt::verify(password, stored_hash).unwrap_or(false);
    }
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

fn is_bcrypt_hash(stored_hash: &str) -> bool {
    stored_hash.starts_with("$2")
}

/// Burns one hash computation so unknown-email logins cost the same as
/// wrong-password logins.
pub(crate) fn burn_verification(password: &str) {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
}

/// Constant-time byte comparison.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0_u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::{constant_time_eq, hash_password, verify_password};
    use bcrypt::Version;

    #[test]
    fn hash_is_salted_and_verifiable() {
        let first = hash_password("pw123").unwrap();
        let second = hash_password("pw123").unwrap();
        assert_ne!(first, second);
        assert!(first.starts_with("$argon2"));
        assert!(!first.contains("pw123"));
        assert!(verify_password("pw123", &first));
        assert!(!verify_password("wrong", &first));
    }

    #[test]
    fn legacy_bcrypt_hashes_still_verify() {
        let two_b = bcrypt::hash("pw123", 4).unwrap();
        assert!(two_b.starts_with("$2b$04$"));
        assert!(verify_password("pw123", &two_b));
        assert!(!verify_password("pw124", &two_b));

        let two_a = bcrypt::hash_with_result("pw123", 4)
            .unwrap()
            .format_for_version(Version::TwoA);
        assert!(two_a.starts_with("$2a$"));
        assert!(verify_password("pw123", &two_a));
    }

    #[test]
    fn truncated_bcrypt_hash_is_a_mismatch() {
        assert!(!verify_password("pw123", "$2b$10$x"));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("pw123", "pw123"));
        assert!(!verify_password("pw123", ""));
    }

    #[test]
    fn constant_time_eq_works() {
        assert!(constant_time_eq(b"hello", b"hello"));
        assert!(!constant_time_eq(b"hello", b"world"));
        assert!(!constant_time_eq(b"short", b"longer"));
    }
}

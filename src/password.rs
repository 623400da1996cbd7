//! Password digest and verification.
//!
//! Credentials are stored as a hex-encoded iterated SHA-256 digest over
//! `salt || password` with a per-account random salt. Verification compares
//! digests in constant time.

use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Number of digest rounds applied to `salt || password`.
const DIGEST_ROUNDS: u32 = 10_000;

/// Length of the per-account salt in bytes.
const SALT_LEN: usize = 16;

/// Generate a fresh random salt, hex-encoded for storage.
pub fn generate_salt() -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    hex::encode(salt)
}

/// Compute the stored digest for a password and hex-encoded salt.
///
/// Deterministic: identical inputs always produce identical output, and any
/// change to the password changes the output.
pub fn digest(password: &str, salt_hex: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt_hex.as_bytes());
    hasher.update(password.as_bytes());
    let mut current = hasher.finalize();

    for _ in 1..DIGEST_ROUNDS {
        let mut hasher = Sha256::new();
        hasher.update(current);
        current = hasher.finalize();
    }

    hex::encode(current)
}

/// Verify a candidate password against the stored salt and digest.
///
/// The comparison is constant time so the match position of a wrong digest
/// is not observable.
pub fn verify(password: &str, salt_hex: &str, expected_digest: &str) -> bool {
    let computed = digest(password, salt_hex);
    computed
        .as_bytes()
        .ct_eq(expected_digest.as_bytes())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_deterministic() {
        let salt = "00112233445566778899aabbccddeeff";
        let first = digest("lavender-absolute", salt);
        let second = digest("lavender-absolute", salt);

        assert_eq!(first, second);
        assert_eq!(first.len(), 64); // hex-encoded SHA-256
    }

    #[test]
    fn single_character_change_alters_digest() {
        let salt = "00112233445566778899aabbccddeeff";
        let original = digest("vetiver-oil-2024", salt);
        let changed = digest("vetiver-oil-2025", salt);

        assert_ne!(original, changed);
    }

    #[test]
    fn different_salts_produce_different_digests() {
        let first = digest("same-password", "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
        let second = digest("same-password", "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb");

        assert_ne!(first, second);
    }

    #[test]
    fn verify_round_trip() {
        let salt = generate_salt();
        let stored = digest("patchouli#88", &salt);

        assert!(verify("patchouli#88", &salt, &stored));
        assert!(!verify("patchouli#89", &salt, &stored));
        assert!(!verify("", &salt, &stored));
    }

    #[test]
    fn generated_salts_are_unique_and_well_formed() {
        let first = generate_salt();
        let second = generate_salt();

        assert_ne!(first, second);
        assert_eq!(first.len(), SALT_LEN * 2);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    }
}

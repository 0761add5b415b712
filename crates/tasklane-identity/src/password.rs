//! Password rules and salted hashing.

use sha2::{Digest, Sha256};

/// Minimum password length in characters.
pub const MIN_LENGTH: usize = 6;

/// Checks `password` against the password rules and returns one message per
/// broken rule, in a fixed order.
#[must_use]
pub fn validate(password: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if password.chars().count() < MIN_LENGTH {
        errors.push(format!("Passwords must be at least {MIN_LENGTH} characters."));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Passwords must have at least one digit ('0'-'9').".to_owned());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Passwords must have at least one lowercase ('a'-'z').".to_owned());
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Passwords must have at least one uppercase ('A'-'Z').".to_owned());
    }
    if password.chars().all(char::is_alphanumeric) {
        errors.push("Passwords must have at least one non alphanumeric character.".to_owned());
    }
    errors
}

/// Hex-encoded SHA-256 of `salt` followed by `password`.
#[must_use]
pub fn hash(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hasher
        .finalize()
        .iter()
        .fold(String::with_capacity(64), |mut out, byte| {
            out.push_str(&format!("{byte:02x}"));
            out
        })
}

//! Password hashing and the strength policy

use crate::error::{Error, Result};

/// Minimum password length accepted by the strength policy
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Hash a plaintext password for storage
pub fn hash_password(password: &str) -> Result<String> {
    Ok(bcrypt::hash(password, bcrypt::DEFAULT_COST)?)
}

/// Verify a submitted password against a stored hash
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    Ok(bcrypt::verify(password, password_hash)?)
}

/// Check a candidate password against the strength policy
///
/// Returns every violated rule; callers surface the first message.
pub fn check_password_strength(
    password: &str,
    username: Option<&str>,
) -> std::result::Result<(), Vec<String>> {
    let mut problems = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        problems.push(format!(
            "This password is too short. It must contain at least {} characters.",
            MIN_PASSWORD_LENGTH
        ));
    }

    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        problems.push("This password is entirely numeric.".to_string());
    }

    if let Some(username) = username {
        if !username.is_empty() && password.eq_ignore_ascii_case(username) {
            problems.push("The password is too similar to the username.".to_string());
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems)
    }
}

/// Policy check returning the first violation as a crate error
pub fn validate_password_strength(password: &str, username: Option<&str>) -> Result<()> {
    check_password_strength(password, username).map_err(|mut problems| {
        // at least one message is guaranteed by the Err path
        Error::WeakPassword(problems.remove(0))
    })
}

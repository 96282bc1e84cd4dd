//! One-time codes for the password reset flow

use chrono::{DateTime, Duration, Utc};
use rand::RngExt;

/// Inclusive range of generated codes; always six digits
pub const OTP_MIN: u32 = 100_000;
pub const OTP_MAX: u32 = 999_999;

/// How long an issued code stays valid
pub const OTP_TTL_MINUTES: i64 = 10;

/// An issued one-time code tied to a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpChallenge {
    /// The six-digit code
    pub code: u32,
    /// The user this code resets
    pub user_id: String,
    /// Submissions at or after this instant are rejected
    pub expires_at: DateTime<Utc>,
}

impl OtpChallenge {
    /// Issue a fresh code for a user, valid for [`OTP_TTL_MINUTES`]
    pub fn issue(user_id: String) -> Self {
        let code = rand::rng().random_range(OTP_MIN..=OTP_MAX);
        Self {
            code,
            user_id,
            expires_at: Utc::now() + Duration::minutes(OTP_TTL_MINUTES),
        }
    }

    /// A submission passes only when the code matches and `now` is
    /// strictly before expiry.
    pub fn verify(&self, submitted: u32, now: DateTime<Utc>) -> bool {
        submitted == self.code && now < self.expires_at
    }
}

/// Reset-flow state carried in a session
///
/// `None → Issued → Verified`; issuing a new code overwrites whatever
/// state was there before.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetFlow {
    /// A code has been mailed out and awaits verification
    Issued(OtpChallenge),
    /// The code was verified; the reset step may change this user's password
    Verified { user_id: String },
}

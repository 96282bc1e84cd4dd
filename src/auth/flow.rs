//! The authentication and password reset operations
//!
//! These are the flows behind the HTTP handlers: login, password change,
//! and the three-step OTP reset (issue, verify, reset). Handlers translate
//! the returned errors into flash messages; mail failures propagate.

use chrono::Utc;

use crate::auth::models::User;
use crate::auth::otp::{OtpChallenge, ResetFlow, OTP_TTL_MINUTES};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::auth::session::{Session, SessionIdentity, SessionManager};
use crate::directory::Directory;
use crate::error::{Error, Result};
use crate::mail::{Mailer, OutgoingEmail};

/// Log a user in, creating a fresh session holding their identity
pub async fn login(
    directory: &Directory,
    sessions: &SessionManager,
    username: &str,
    password: &str,
) -> Result<Session> {
    let user = directory
        .find_by_username(username)
        .await
        .ok_or_else(|| Error::UserNotFound(username.to_string()))?;

    if !verify_password(password, &user.password_hash)? {
        return Err(Error::InvalidCredentials);
    }

    let identity = SessionIdentity {
        user_id: user.id.clone(),
        username: user.username.clone(),
        role: user.role,
        cafe: user.cafe.clone(),
    };

    tracing::info!("user '{}' logged in as {}", user.username, user.role);

    Ok(sessions.create_session(Some(identity)).await)
}

/// Change the password of a logged-in user
///
/// Checks run in order: current password, confirmation match, strength
/// policy. The stored hash changes only when all three pass.
pub async fn change_password(
    directory: &Directory,
    user_id: &str,
    current_password: &str,
    new_password: &str,
    confirm_password: &str,
) -> Result<User> {
    let user = directory
        .get_user(user_id)
        .await
        .ok_or(Error::NotAuthenticated)?;

    if !verify_password(current_password, &user.password_hash)? {
        return Err(Error::CurrentPasswordIncorrect);
    }
    if new_password != confirm_password {
        return Err(Error::PasswordMismatch);
    }
    validate_password_strength(new_password, Some(&user.username))?;

    let password_hash = hash_password(new_password)?;
    directory.set_password(&user.id, password_hash).await?;

    tracing::info!("user '{}' changed their password", user.username);

    Ok(user)
}

/// Issue a reset OTP for the account behind an email address
///
/// Stores the challenge in the session (overwriting any earlier reset
/// state) and mails the code. A transport failure propagates to the
/// caller rather than being masked; the stored challenge stays put, so
/// the user can re-issue.
pub async fn issue_reset_otp(
    directory: &Directory,
    sessions: &SessionManager,
    mailer: &dyn Mailer,
    session_id: &str,
    email: &str,
) -> Result<OtpChallenge> {
    let user = directory
        .find_by_email(email)
        .await
        .ok_or_else(|| Error::EmailNotFound(email.to_string()))?;

    let challenge = OtpChallenge::issue(user.id.clone());
    let stored = challenge.clone();
    sessions
        .update_session(session_id, |session| {
            session.reset = Some(ResetFlow::Issued(stored));
        })
        .await;

    mailer
        .send(OutgoingEmail {
            to: user.email.clone(),
            subject: "Password Reset OTP".to_string(),
            body: format!(
                "Your OTP for password reset is: {}. It will expire in {} minutes.",
                challenge.code, OTP_TTL_MINUTES
            ),
        })
        .await?;

    tracing::info!("reset OTP issued for '{}'", user.username);

    Ok(challenge)
}

/// Verify a submitted OTP against the session's issued challenge
///
/// Succeeds only when the code matches AND now is strictly before
/// expiry; the session then moves to the verified state. On failure the
/// issued challenge is left intact, so retries are allowed until expiry.
pub async fn verify_reset_otp(
    sessions: &SessionManager,
    session_id: &str,
    submitted: &str,
) -> Result<String> {
    let session = sessions
        .get_session(session_id)
        .await
        .ok_or(Error::OtpRejected)?;

    let Some(ResetFlow::Issued(challenge)) = session.reset else {
        return Err(Error::OtpRejected);
    };

    let code: u32 = submitted.trim().parse().map_err(|_| Error::OtpRejected)?;
    if !challenge.verify(code, Utc::now()) {
        return Err(Error::OtpRejected);
    }

    let user_id = challenge.user_id.clone();
    let verified = user_id.clone();
    sessions
        .update_session(session_id, |session| {
            session.reset = Some(ResetFlow::Verified { user_id: verified });
        })
        .await;

    Ok(user_id)
}

/// Set a new password after a verified OTP, then clear the reset state
pub async fn reset_password(
    directory: &Directory,
    sessions: &SessionManager,
    session_id: &str,
    new_password: &str,
    confirm_password: &str,
) -> Result<()> {
    let session = sessions
        .get_session(session_id)
        .await
        .ok_or(Error::OtpRejected)?;

    let Some(ResetFlow::Verified { user_id }) = session.reset else {
        return Err(Error::OtpRejected);
    };

    let user = directory
        .get_user(&user_id)
        .await
        .ok_or_else(|| Error::UserNotFound(user_id.clone()))?;

    if new_password != confirm_password {
        return Err(Error::PasswordMismatch);
    }
    validate_password_strength(new_password, Some(&user.username))?;

    let password_hash = hash_password(new_password)?;
    directory.set_password(&user.id, password_hash).await?;

    sessions
        .update_session(session_id, |session| {
            session.reset = None;
        })
        .await;

    tracing::info!("password reset completed for '{}'", user.username);

    Ok(())
}

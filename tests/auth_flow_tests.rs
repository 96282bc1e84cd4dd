//! Authentication and password reset flow tests

use chrono::{Duration, Utc};

use brewdesk::auth::flow;
use brewdesk::auth::models::{Role, User};
use brewdesk::auth::otp::{OtpChallenge, ResetFlow, OTP_TTL_MINUTES};
use brewdesk::auth::password::{hash_password, verify_password};
use brewdesk::auth::session::SessionManager;
use brewdesk::directory::Directory;
use brewdesk::error::Error;
use brewdesk::mail::MemoryMailer;

struct Fixture {
    _guard: tempfile::TempDir,
    directory: Directory,
    sessions: SessionManager,
    mailer: MemoryMailer,
}

fn fixture() -> Fixture {
    let guard = tempfile::tempdir().unwrap();
    let directory = Directory::open(guard.path().join("users.json")).unwrap();
    Fixture {
        _guard: guard,
        directory,
        sessions: SessionManager::new(),
        mailer: MemoryMailer::new(),
    }
}

async fn seed_user(
    directory: &Directory,
    username: &str,
    email: &str,
    password: &str,
    role: Role,
    cafe: Option<&str>,
) -> User {
    let user = User::new(
        username.to_string(),
        email.to_string(),
        "555-0100".to_string(),
        hash_password(password).unwrap(),
        role,
        cafe.map(|c| c.to_string()),
    );
    directory.insert_user(user.clone()).await.unwrap();
    user
}

#[tokio::test]
async fn test_login_populates_session_with_role_and_cafe() {
    let fx = fixture();
    seed_user(
        &fx.directory,
        "alice",
        "alice@example.com",
        "espresso-42",
        Role::ShopOwner,
        Some("Corner Beans"),
    )
    .await;

    let session = flow::login(&fx.directory, &fx.sessions, "alice", "espresso-42")
        .await
        .unwrap();

    let identity = session.identity.unwrap();
    assert_eq!(identity.username, "alice");
    assert_eq!(identity.role, Role::ShopOwner);
    assert_eq!(identity.cafe.as_deref(), Some("Corner Beans"));
    assert_eq!(identity.role.dashboard_path(), "/dashboard/owner");

    // the session is retrievable by its id
    let stored = fx.sessions.get_session(&session.id).await.unwrap();
    assert!(stored.identity.is_some());
}

#[tokio::test]
async fn test_login_without_cafe() {
    let fx = fixture();
    seed_user(
        &fx.directory,
        "carl",
        "carl@example.com",
        "souffle-99",
        Role::Chef,
        None,
    )
    .await;

    let session = flow::login(&fx.directory, &fx.sessions, "carl", "souffle-99")
        .await
        .unwrap();
    let identity = session.identity.unwrap();
    assert_eq!(identity.cafe, None);
    assert_eq!(identity.role.dashboard_path(), "/dashboard/chef");
}

#[tokio::test]
async fn test_login_unknown_user() {
    let fx = fixture();

    let result = flow::login(&fx.directory, &fx.sessions, "nobody", "whatever").await;
    assert!(matches!(result, Err(Error::UserNotFound(_))));
    assert_eq!(fx.sessions.session_count().await, 0);
}

#[tokio::test]
async fn test_login_wrong_password_leaves_no_session() {
    let fx = fixture();
    seed_user(
        &fx.directory,
        "alice",
        "alice@example.com",
        "espresso-42",
        Role::ShopOwner,
        None,
    )
    .await;

    let result = flow::login(&fx.directory, &fx.sessions, "alice", "wrong").await;
    assert!(matches!(result, Err(Error::InvalidCredentials)));
    assert_eq!(fx.sessions.session_count().await, 0);
}

#[tokio::test]
async fn test_logout_clears_session_completely() {
    let fx = fixture();
    seed_user(
        &fx.directory,
        "alice",
        "alice@example.com",
        "espresso-42",
        Role::ShopOwner,
        None,
    )
    .await;

    let session = flow::login(&fx.directory, &fx.sessions, "alice", "espresso-42")
        .await
        .unwrap();
    fx.sessions
        .update_session(&session.id, |s| {
            s.reset = Some(ResetFlow::Verified {
                user_id: "u".to_string(),
            })
        })
        .await;

    fx.sessions.flush_session(&session.id).await;
    assert!(fx.sessions.get_session(&session.id).await.is_none());

    // flushing again is error-free
    fx.sessions.flush_session(&session.id).await;
}

#[tokio::test]
async fn test_change_password_wrong_current_keeps_hash() {
    let fx = fixture();
    let user = seed_user(
        &fx.directory,
        "alice",
        "alice@example.com",
        "espresso-42",
        Role::ShopManager,
        None,
    )
    .await;

    let result = flow::change_password(
        &fx.directory,
        &user.id,
        "not-the-password",
        "latte-art-7",
        "latte-art-7",
    )
    .await;
    assert!(matches!(result, Err(Error::CurrentPasswordIncorrect)));

    let stored = fx.directory.get_user(&user.id).await.unwrap();
    assert_eq!(stored.password_hash, user.password_hash);
}

#[tokio::test]
async fn test_change_password_mismatched_confirmation_keeps_hash() {
    let fx = fixture();
    let user = seed_user(
        &fx.directory,
        "alice",
        "alice@example.com",
        "espresso-42",
        Role::ShopManager,
        None,
    )
    .await;

    let result = flow::change_password(
        &fx.directory,
        &user.id,
        "espresso-42",
        "latte-art-7",
        "latte-art-8",
    )
    .await;
    assert!(matches!(result, Err(Error::PasswordMismatch)));

    let stored = fx.directory.get_user(&user.id).await.unwrap();
    assert_eq!(stored.password_hash, user.password_hash);
}

#[tokio::test]
async fn test_change_password_weak_password_keeps_hash() {
    let fx = fixture();
    let user = seed_user(
        &fx.directory,
        "alice",
        "alice@example.com",
        "espresso-42",
        Role::ShopManager,
        None,
    )
    .await;

    let result =
        flow::change_password(&fx.directory, &user.id, "espresso-42", "1234", "1234").await;
    assert!(matches!(result, Err(Error::WeakPassword(_))));

    let stored = fx.directory.get_user(&user.id).await.unwrap();
    assert_eq!(stored.password_hash, user.password_hash);
}

#[tokio::test]
async fn test_change_password_success_updates_hash() {
    let fx = fixture();
    let user = seed_user(
        &fx.directory,
        "alice",
        "alice@example.com",
        "espresso-42",
        Role::ShopManager,
        None,
    )
    .await;

    let changed = flow::change_password(
        &fx.directory,
        &user.id,
        "espresso-42",
        "latte-art-7",
        "latte-art-7",
    )
    .await
    .unwrap();
    assert_eq!(changed.role, Role::ShopManager);

    let stored = fx.directory.get_user(&user.id).await.unwrap();
    assert_ne!(stored.password_hash, user.password_hash);
    assert!(verify_password("latte-art-7", &stored.password_hash).unwrap());
}

#[tokio::test]
async fn test_forgot_password_unknown_email() {
    let fx = fixture();
    let session = fx.sessions.create_session(None).await;

    let result = flow::issue_reset_otp(
        &fx.directory,
        &fx.sessions,
        &fx.mailer,
        &session.id,
        "ghost@example.com",
    )
    .await;
    assert!(matches!(result, Err(Error::EmailNotFound(_))));
    assert!(fx.mailer.sent().is_empty());
}

#[tokio::test]
async fn test_forgot_password_issues_six_digit_code_with_ten_minute_expiry() {
    let fx = fixture();
    seed_user(
        &fx.directory,
        "alice",
        "alice@example.com",
        "espresso-42",
        Role::ShopOwner,
        None,
    )
    .await;
    let session = fx.sessions.create_session(None).await;

    let before = Utc::now();
    let challenge = flow::issue_reset_otp(
        &fx.directory,
        &fx.sessions,
        &fx.mailer,
        &session.id,
        "alice@example.com",
    )
    .await
    .unwrap();
    let after = Utc::now();

    assert!((100_000..=999_999).contains(&challenge.code));
    assert!(challenge.expires_at >= before + Duration::minutes(OTP_TTL_MINUTES));
    assert!(challenge.expires_at <= after + Duration::minutes(OTP_TTL_MINUTES));

    // stored in the session
    let stored = fx.sessions.get_session(&session.id).await.unwrap();
    assert!(matches!(stored.reset, Some(ResetFlow::Issued(_))));

    // and mailed to the account's address
    let sent = fx.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "alice@example.com");
    assert_eq!(sent[0].subject, "Password Reset OTP");
    assert!(sent[0].body.contains(&challenge.code.to_string()));
    assert!(sent[0].body.contains("10 minutes"));
}

#[tokio::test]
async fn test_reissue_overwrites_previous_challenge() {
    let fx = fixture();
    seed_user(
        &fx.directory,
        "alice",
        "alice@example.com",
        "espresso-42",
        Role::ShopOwner,
        None,
    )
    .await;
    let session = fx.sessions.create_session(None).await;

    let first = flow::issue_reset_otp(
        &fx.directory,
        &fx.sessions,
        &fx.mailer,
        &session.id,
        "alice@example.com",
    )
    .await
    .unwrap();
    let second = flow::issue_reset_otp(
        &fx.directory,
        &fx.sessions,
        &fx.mailer,
        &session.id,
        "alice@example.com",
    )
    .await
    .unwrap();

    let stored = fx.sessions.get_session(&session.id).await.unwrap();
    match stored.reset {
        Some(ResetFlow::Issued(challenge)) => assert_eq!(challenge, second),
        other => panic!("expected issued challenge, got {:?}", other),
    }
    // the first code no longer verifies unless it happens to collide
    if first.code != second.code {
        let result =
            flow::verify_reset_otp(&fx.sessions, &session.id, &first.code.to_string()).await;
        assert!(matches!(result, Err(Error::OtpRejected)));
    }
}

#[tokio::test]
async fn test_verify_otp_accepts_correct_code_and_moves_to_verified() {
    let fx = fixture();
    let user = seed_user(
        &fx.directory,
        "alice",
        "alice@example.com",
        "espresso-42",
        Role::ShopOwner,
        None,
    )
    .await;
    let session = fx.sessions.create_session(None).await;

    let challenge = flow::issue_reset_otp(
        &fx.directory,
        &fx.sessions,
        &fx.mailer,
        &session.id,
        "alice@example.com",
    )
    .await
    .unwrap();

    let user_id = flow::verify_reset_otp(&fx.sessions, &session.id, &challenge.code.to_string())
        .await
        .unwrap();
    assert_eq!(user_id, user.id);

    let stored = fx.sessions.get_session(&session.id).await.unwrap();
    assert!(matches!(stored.reset, Some(ResetFlow::Verified { .. })));
}

#[tokio::test]
async fn test_verify_otp_wrong_code_keeps_challenge_for_retry() {
    let fx = fixture();
    seed_user(
        &fx.directory,
        "alice",
        "alice@example.com",
        "espresso-42",
        Role::ShopOwner,
        None,
    )
    .await;
    let session = fx.sessions.create_session(None).await;

    let challenge = flow::issue_reset_otp(
        &fx.directory,
        &fx.sessions,
        &fx.mailer,
        &session.id,
        "alice@example.com",
    )
    .await
    .unwrap();

    let wrong = if challenge.code == 999_999 {
        100_000
    } else {
        challenge.code + 1
    };
    let result = flow::verify_reset_otp(&fx.sessions, &session.id, &wrong.to_string()).await;
    assert!(matches!(result, Err(Error::OtpRejected)));

    // the issued challenge stays; a retry with the right code passes
    let retry = flow::verify_reset_otp(&fx.sessions, &session.id, &challenge.code.to_string()).await;
    assert!(retry.is_ok());
}

#[tokio::test]
async fn test_verify_otp_expired_code_rejected() {
    let fx = fixture();
    let user = seed_user(
        &fx.directory,
        "alice",
        "alice@example.com",
        "espresso-42",
        Role::ShopOwner,
        None,
    )
    .await;
    let session = fx.sessions.create_session(None).await;

    // plant a challenge that expired a minute ago
    let expired = OtpChallenge {
        code: 123_456,
        user_id: user.id.clone(),
        expires_at: Utc::now() - Duration::minutes(1),
    };
    fx.sessions
        .update_session(&session.id, |s| s.reset = Some(ResetFlow::Issued(expired)))
        .await;

    let result = flow::verify_reset_otp(&fx.sessions, &session.id, "123456").await;
    assert!(matches!(result, Err(Error::OtpRejected)));
}

#[tokio::test]
async fn test_verify_otp_without_issued_state() {
    let fx = fixture();
    let session = fx.sessions.create_session(None).await;

    let result = flow::verify_reset_otp(&fx.sessions, &session.id, "123456").await;
    assert!(matches!(result, Err(Error::OtpRejected)));
}

#[tokio::test]
async fn test_verify_otp_non_numeric_rejected() {
    let fx = fixture();
    let user = seed_user(
        &fx.directory,
        "alice",
        "alice@example.com",
        "espresso-42",
        Role::ShopOwner,
        None,
    )
    .await;
    let session = fx.sessions.create_session(None).await;
    let challenge = OtpChallenge::issue(user.id.clone());
    fx.sessions
        .update_session(&session.id, |s| s.reset = Some(ResetFlow::Issued(challenge)))
        .await;

    let result = flow::verify_reset_otp(&fx.sessions, &session.id, "not-a-code").await;
    assert!(matches!(result, Err(Error::OtpRejected)));
}

#[tokio::test]
async fn test_full_reset_journey_allows_login_with_new_password() {
    let fx = fixture();
    seed_user(
        &fx.directory,
        "alice",
        "alice@example.com",
        "espresso-42",
        Role::ShopOwner,
        None,
    )
    .await;
    let session = fx.sessions.create_session(None).await;

    let challenge = flow::issue_reset_otp(
        &fx.directory,
        &fx.sessions,
        &fx.mailer,
        &session.id,
        "alice@example.com",
    )
    .await
    .unwrap();
    flow::verify_reset_otp(&fx.sessions, &session.id, &challenge.code.to_string())
        .await
        .unwrap();
    flow::reset_password(
        &fx.directory,
        &fx.sessions,
        &session.id,
        "cold-brew-11",
        "cold-brew-11",
    )
    .await
    .unwrap();

    // reset state is cleared
    let stored = fx.sessions.get_session(&session.id).await.unwrap();
    assert!(stored.reset.is_none());

    // old password no longer works, the new one does
    let old = flow::login(&fx.directory, &fx.sessions, "alice", "espresso-42").await;
    assert!(matches!(old, Err(Error::InvalidCredentials)));
    let new = flow::login(&fx.directory, &fx.sessions, "alice", "cold-brew-11").await;
    assert!(new.is_ok());
}

#[tokio::test]
async fn test_reset_password_without_verified_state() {
    let fx = fixture();
    let session = fx.sessions.create_session(None).await;

    let result = flow::reset_password(
        &fx.directory,
        &fx.sessions,
        &session.id,
        "cold-brew-11",
        "cold-brew-11",
    )
    .await;
    assert!(matches!(result, Err(Error::OtpRejected)));
}

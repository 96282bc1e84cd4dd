//! Authentication, sessions, and the password reset flow

pub mod flow;
pub mod middleware;
pub mod models;
pub mod otp;
pub mod password;
pub mod session;

pub use middleware::{clear_session_cookie, session_cookie, session_id_from_headers, SESSION_COOKIE};
pub use models::{Role, User};
pub use otp::{OtpChallenge, ResetFlow, OTP_TTL_MINUTES};
pub use password::{hash_password, validate_password_strength, verify_password};
pub use session::{Flash, Session, SessionIdentity, SessionManager};

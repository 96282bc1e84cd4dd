//! Request handlers
//!
//! Flow errors become flash messages or inline form errors here; only
//! infrastructure failures (including mail transport) propagate as
//! error responses.

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};

use super::server::SharedState;
use crate::auth::flow;
use crate::auth::middleware::{clear_session_cookie, session_cookie, session_id_from_headers};
use crate::auth::models::Role;
use crate::auth::otp::ResetFlow;
use crate::auth::session::{Flash, Session, SessionIdentity};
use crate::error::{Error, Result};
use crate::ui;

// Form types

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    pub category_name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub product_name: String,
    pub description: Option<String>,
    pub price: String,
    pub category_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordForm {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpForm {
    pub otp: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordForm {
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
        }
    }
}

// Response helpers

fn html_response(body: String, cookie: Option<String>) -> Response {
    match cookie {
        Some(cookie) => ([(SET_COOKIE, cookie)], Html(body)).into_response(),
        None => Html(body).into_response(),
    }
}

fn redirect_response(path: &str, cookie: Option<String>) -> Response {
    match cookie {
        Some(cookie) => ([(SET_COOKIE, cookie)], Redirect::to(path)).into_response(),
        None => Redirect::to(path).into_response(),
    }
}

// Session helpers

/// Session for this request's cookie, if it is still alive
async fn current_session(state: &SharedState, headers: &HeaderMap) -> Option<Session> {
    let id = session_id_from_headers(headers)?;
    state.sessions.get_session(&id).await
}

/// Session for this request, creating an anonymous one when needed.
/// The second value is a Set-Cookie to attach when a session was created.
async fn ensure_session(state: &SharedState, headers: &HeaderMap) -> (Session, Option<String>) {
    if let Some(session) = current_session(state, headers).await {
        return (session, None);
    }
    let session = state.sessions.create_session(None).await;
    let cookie = session_cookie(&session.id);
    (session, Some(cookie))
}

/// Push an error flash and send the client back to the login page
async fn login_redirect(state: &SharedState, headers: &HeaderMap, message: &str) -> Response {
    let (session, cookie) = ensure_session(state, headers).await;
    state
        .sessions
        .push_flash(&session.id, Flash::error(message))
        .await;
    redirect_response("/login", cookie)
}

/// Per-view gate: a session must exist, carry an identity, and the
/// identity's role must match the page's required role.
async fn require_role(
    state: &SharedState,
    headers: &HeaderMap,
    required: Role,
) -> std::result::Result<(Session, SessionIdentity), Response> {
    let Some(session) = current_session(state, headers).await else {
        return Err(login_redirect(state, headers, "Please log in again.").await);
    };
    let Some(identity) = session.identity.clone() else {
        return Err(login_redirect(state, headers, "Please log in again.").await);
    };
    if identity.role != required {
        let message = format!("Access denied! You are not a {}.", required.label());
        return Err(login_redirect(state, headers, &message).await);
    }
    Ok((session, identity))
}

/// Gate for pages that need a login but accept any role
async fn require_identity(
    state: &SharedState,
    headers: &HeaderMap,
    message: &str,
) -> std::result::Result<(Session, SessionIdentity), Response> {
    let Some(session) = current_session(state, headers).await else {
        return Err(login_redirect(state, headers, message).await);
    };
    let Some(identity) = session.identity.clone() else {
        return Err(login_redirect(state, headers, message).await);
    };
    Ok((session, identity))
}

// Root

pub async fn root(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    if let Some(session) = current_session(&state, &headers).await {
        if let Some(identity) = session.identity {
            return redirect_response(identity.role.dashboard_path(), None);
        }
    }
    redirect_response("/login", None)
}

// Auth

pub async fn login_page(State(state): State<SharedState>, headers: HeaderMap) -> Result<Response> {
    let (session, cookie) = ensure_session(&state, &headers).await;
    let flashes = state.sessions.take_flashes(&session.id).await;
    let body = ui::render_login(&flashes, None)?;
    Ok(html_response(body, cookie))
}

pub async fn login_submit(
    State(state): State<SharedState>,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    match flow::login(&state.directory, &state.sessions, &form.username, &form.password).await {
        Ok(session) => {
            let Some(identity) = session.identity.clone() else {
                return Err(Error::Other("login produced a session without identity".into()));
            };
            Ok(redirect_response(
                identity.role.dashboard_path(),
                Some(session_cookie(&session.id)),
            ))
        }
        Err(err @ (Error::UserNotFound(_) | Error::InvalidCredentials)) => {
            let body = ui::render_login(&[], Some(&err.to_string()))?;
            Ok(html_response(body, None))
        }
        Err(err) => Err(err),
    }
}

pub async fn logout(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    if let Some(id) = session_id_from_headers(&headers) {
        state.sessions.flush_session(&id).await;
    }
    redirect_response("/login", Some(clear_session_cookie()))
}

// Dashboards

pub async fn dashboard_owner(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Response> {
    let (session, identity) = match require_role(&state, &headers, Role::ShopOwner).await {
        Ok(ok) => ok,
        Err(redirect) => return Ok(redirect),
    };
    let flashes = state.sessions.take_flashes(&session.id).await;
    let body = ui::render_dashboard(&identity, &flashes)?;
    Ok(html_response(body, None))
}

pub async fn dashboard_manager(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Response> {
    let (session, identity) = match require_role(&state, &headers, Role::ShopManager).await {
        Ok(ok) => ok,
        Err(redirect) => return Ok(redirect),
    };
    let flashes = state.sessions.take_flashes(&session.id).await;
    let body = ui::render_dashboard(&identity, &flashes)?;
    Ok(html_response(body, None))
}

pub async fn dashboard_chef(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Response> {
    let (session, identity) = match require_role(&state, &headers, Role::Chef).await {
        Ok(ok) => ok,
        Err(redirect) => return Ok(redirect),
    };
    let flashes = state.sessions.take_flashes(&session.id).await;
    let body = ui::render_dashboard(&identity, &flashes)?;
    Ok(html_response(body, None))
}

// Catalog (shop owner only)

pub async fn add_category_page(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Response> {
    let (session, _identity) = match require_role(&state, &headers, Role::ShopOwner).await {
        Ok(ok) => ok,
        Err(redirect) => return Ok(redirect),
    };
    let flashes = state.sessions.take_flashes(&session.id).await;
    let body = ui::render_add_category(&flashes, None)?;
    Ok(html_response(body, None))
}

pub async fn add_category_submit(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Form(form): Form<CategoryForm>,
) -> Result<Response> {
    let (session, _identity) = match require_role(&state, &headers, Role::ShopOwner).await {
        Ok(ok) => ok,
        Err(redirect) => return Ok(redirect),
    };

    let description = form.description.unwrap_or_default();
    match state.catalog.add_category(&form.category_name, &description).await {
        Ok(category) => {
            state
                .sessions
                .push_flash(
                    &session.id,
                    Flash::success(format!("Category \"{}\" added successfully!", category.name)),
                )
                .await;
            Ok(redirect_response("/dashboard/owner", None))
        }
        Err(Error::Validation(message)) => {
            let flashes = state.sessions.take_flashes(&session.id).await;
            let body = ui::render_add_category(&flashes, Some(&message))?;
            Ok(html_response(body, None))
        }
        Err(err) => Err(err),
    }
}

pub async fn add_product_page(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Response> {
    let (session, _identity) = match require_role(&state, &headers, Role::ShopOwner).await {
        Ok(ok) => ok,
        Err(redirect) => return Ok(redirect),
    };
    let categories = state.catalog.list_categories().await;
    let flashes = state.sessions.take_flashes(&session.id).await;
    let body = ui::render_add_product(&categories, &flashes, None)?;
    Ok(html_response(body, None))
}

pub async fn add_product_submit(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let (session, _identity) = match require_role(&state, &headers, Role::ShopOwner).await {
        Ok(ok) => ok,
        Err(redirect) => return Ok(redirect),
    };

    let Ok(price) = form.price.trim().parse::<f64>() else {
        return rerender_product_form(&state, "Price must be a non-negative number.").await;
    };

    let description = form.description.unwrap_or_default();
    match state
        .catalog
        .add_product(&form.product_name, &description, price, &form.category_id)
        .await
    {
        Ok(product) => {
            state
                .sessions
                .push_flash(
                    &session.id,
                    Flash::success(format!("Product \"{}\" added successfully!", product.name)),
                )
                .await;
            Ok(redirect_response("/dashboard/owner", None))
        }
        Err(err @ (Error::Validation(_) | Error::CategoryNotFound)) => {
            rerender_product_form(&state, &err.to_string()).await
        }
        Err(err) => Err(err),
    }
}

async fn rerender_product_form(state: &SharedState, message: &str) -> Result<Response> {
    let categories = state.catalog.list_categories().await;
    let body = ui::render_add_product(&categories, &[], Some(message))?;
    Ok(html_response(body, None))
}

// Change password

pub async fn change_password_page(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Response> {
    let (session, _identity) = match require_identity(
        &state,
        &headers,
        "You must be logged in to change your password.",
    )
    .await
    {
        Ok(ok) => ok,
        Err(redirect) => return Ok(redirect),
    };
    let flashes = state.sessions.take_flashes(&session.id).await;
    let body = ui::render_change_password(&flashes, None)?;
    Ok(html_response(body, None))
}

pub async fn change_password_submit(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Form(form): Form<ChangePasswordForm>,
) -> Result<Response> {
    let (session, identity) = match require_identity(
        &state,
        &headers,
        "You must be logged in to change your password.",
    )
    .await
    {
        Ok(ok) => ok,
        Err(redirect) => return Ok(redirect),
    };

    match flow::change_password(
        &state.directory,
        &identity.user_id,
        &form.current_password,
        &form.new_password,
        &form.confirm_password,
    )
    .await
    {
        Ok(user) => {
            state
                .sessions
                .push_flash(&session.id, Flash::success("Password changed successfully!"))
                .await;
            // back to the dashboard of the user's actual role
            Ok(redirect_response(user.role.dashboard_path(), None))
        }
        Err(
            err @ (Error::CurrentPasswordIncorrect
            | Error::PasswordMismatch
            | Error::WeakPassword(_)),
        ) => {
            let flashes = state.sessions.take_flashes(&session.id).await;
            let body = ui::render_change_password(&flashes, Some(&err.to_string()))?;
            Ok(html_response(body, None))
        }
        Err(Error::NotAuthenticated) => {
            Ok(login_redirect(&state, &headers, "Please log in again.").await)
        }
        Err(err) => Err(err),
    }
}

// Password reset

pub async fn forgot_password_page(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Response> {
    let (session, cookie) = ensure_session(&state, &headers).await;
    let flashes = state.sessions.take_flashes(&session.id).await;
    let body = ui::render_forgot_password(&flashes, None)?;
    Ok(html_response(body, cookie))
}

pub async fn forgot_password_submit(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Form(form): Form<ForgotPasswordForm>,
) -> Result<Response> {
    let (session, cookie) = ensure_session(&state, &headers).await;

    match flow::issue_reset_otp(
        &state.directory,
        &state.sessions,
        state.mailer.as_ref(),
        &session.id,
        &form.email,
    )
    .await
    {
        Ok(_) => {
            state
                .sessions
                .push_flash(&session.id, Flash::success("OTP sent to your email."))
                .await;
            Ok(redirect_response("/password/otp", cookie))
        }
        Err(err @ Error::EmailNotFound(_)) => {
            let flashes = state.sessions.take_flashes(&session.id).await;
            let body = ui::render_forgot_password(&flashes, Some(&err.to_string()))?;
            Ok(html_response(body, cookie))
        }
        // mail transport failures propagate, never masked
        Err(err) => Err(err),
    }
}

pub async fn verify_otp_page(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Response> {
    let (session, cookie) = ensure_session(&state, &headers).await;
    let flashes = state.sessions.take_flashes(&session.id).await;
    let body = ui::render_verify_otp(&flashes, None)?;
    Ok(html_response(body, cookie))
}

pub async fn verify_otp_submit(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Form(form): Form<VerifyOtpForm>,
) -> Result<Response> {
    let (session, cookie) = ensure_session(&state, &headers).await;

    match flow::verify_reset_otp(&state.sessions, &session.id, &form.otp).await {
        Ok(_) => Ok(redirect_response("/password/reset", cookie)),
        Err(Error::OtpRejected) => {
            state
                .sessions
                .push_flash(&session.id, Flash::error("Invalid OTP or OTP has expired."))
                .await;
            Ok(redirect_response("/password/forgot", cookie))
        }
        Err(err) => Err(err),
    }
}

pub async fn reset_password_page(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Response> {
    let (session, cookie) = ensure_session(&state, &headers).await;

    // only reachable with a verified OTP in hand
    if !matches!(session.reset, Some(ResetFlow::Verified { .. })) {
        state
            .sessions
            .push_flash(&session.id, Flash::error("Verify your OTP first."))
            .await;
        return Ok(redirect_response("/password/forgot", cookie));
    }

    let flashes = state.sessions.take_flashes(&session.id).await;
    let body = ui::render_reset_password(&flashes, None)?;
    Ok(html_response(body, cookie))
}

pub async fn reset_password_submit(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Form(form): Form<ResetPasswordForm>,
) -> Result<Response> {
    let (session, cookie) = ensure_session(&state, &headers).await;

    match flow::reset_password(
        &state.directory,
        &state.sessions,
        &session.id,
        &form.new_password,
        &form.confirm_password,
    )
    .await
    {
        Ok(()) => {
            state
                .sessions
                .push_flash(
                    &session.id,
                    Flash::success("Password reset successfully! Please log in."),
                )
                .await;
            Ok(redirect_response("/login", cookie))
        }
        Err(err @ (Error::PasswordMismatch | Error::WeakPassword(_))) => {
            let flashes = state.sessions.take_flashes(&session.id).await;
            let body = ui::render_reset_password(&flashes, Some(&err.to_string()))?;
            Ok(html_response(body, cookie))
        }
        Err(Error::OtpRejected) => {
            state
                .sessions
                .push_flash(&session.id, Flash::error("Invalid OTP or OTP has expired."))
                .await;
            Ok(redirect_response("/password/forgot", cookie))
        }
        Err(err) => Err(err),
    }
}

// Health check

pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok("healthy"))
}

//! Login, registration and logout.
//!
//! Each flow validates locally, performs at most one exchange and reports a
//! single outcome. The caller owns presentation: it disables the submit
//! control while a flow runs and re-enables it unless the outcome is
//! [`LoginOutcome::Success`].

use std::time::Duration;

use crate::client::ApiClient;
use crate::error::{ApiError, ApiResult, ErrorKind};
use crate::gate::{post_login_target, Page};
use crate::models::UserInfo;
use crate::session::SessionStore;
use crate::storage::KeyValueStore;
use crate::transport::HttpTransport;
use crate::validation::{LoginForm, RegisterForm};

pub const LOGIN_SUCCESS_NOTICE: &str = "Login successful! Redirecting to your dashboard…";
pub const REGISTER_SUCCESS_NOTICE: &str =
    "Registration successful! Please check your email to verify your account.";
pub const RESEND_SUCCESS_NOTICE: &str = "Verification email sent. Please check your inbox.";

#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    /// Session stored. Navigate to `target` after `delay`.
    Success {
        user: UserInfo,
        notice: String,
        target: String,
        delay: Duration,
    },
    /// The account exists but its email is unverified. Offer a resend.
    NeedsVerification { email: String, message: String },
    Failed(ApiError),
}

impl LoginOutcome {
    /// Only a successful login keeps the submit control disabled, through
    /// the redirect delay. Every other outcome hands it back to the user.
    pub fn keeps_submit_disabled(&self) -> bool {
        matches!(self, LoginOutcome::Success { .. })
    }
}

/// Sign in and store the issued session.
///
/// `redirect_to` is the raw `redirectTo` query value, if any.
pub async fn login<T, S>(
    client: &ApiClient<T, S>,
    form: &LoginForm,
    redirect_to: Option<&str>,
    delay: Duration,
) -> LoginOutcome
where
    T: HttpTransport,
    S: KeyValueStore,
{
    let request = match form.validate() {
        Ok(r) => r,
        Err(e) => return LoginOutcome::Failed(e.into()),
    };

    match client.login(&request).await {
        Ok(resp) => {
            if let Err(e) = client.session().set_session(&resp.token, &resp.user) {
                log::error!("login succeeded but session could not be stored: {e}");
                return LoginOutcome::Failed(ApiError::new(
                    ErrorKind::Application,
                    "Signed in, but this browser blocked saving your session. \
                     Enable site storage and try again.",
                ));
            }
            log::info!("signed in as {}", resp.user.username);
            LoginOutcome::Success {
                user: resp.user,
                notice: LOGIN_SUCCESS_NOTICE.to_string(),
                target: post_login_target(redirect_to).to_string(),
                delay,
            }
        }
        Err(e) if e.kind == ErrorKind::VerificationRequired => LoginOutcome::NeedsVerification {
            email: request.email,
            message: e.message,
        },
        Err(e) => LoginOutcome::Failed(e),
    }
}

/// Ask the server to send another verification email.
pub async fn resend_verification<T, S>(client: &ApiClient<T, S>, email: &str) -> ApiResult<String>
where
    T: HttpTransport,
    S: KeyValueStore,
{
    let resp = client.resend_verification(email).await?;
    Ok(resp
        .message
        .unwrap_or_else(|| RESEND_SUCCESS_NOTICE.to_string()))
}

/// Create an account. Does not sign in; the user must verify their email
/// first.
pub async fn register<T, S>(client: &ApiClient<T, S>, form: &RegisterForm) -> ApiResult<String>
where
    T: HttpTransport,
    S: KeyValueStore,
{
    let request = form.validate()?;
    client.register(&request).await?;
    log::info!("registered {}", request.username);
    Ok(REGISTER_SUCCESS_NOTICE.to_string())
}

/// URL the login page is reached with after a logout.
pub fn logout_url() -> String {
    format!("{}?logout=success", Page::Login.path())
}

/// Clear the session and return where to navigate. Storage failures are
/// logged; the redirect happens regardless.
pub fn logout<S: KeyValueStore>(store: &SessionStore<S>) -> String {
    if let Err(e) = store.clear_session() {
        log::warn!("logout could not clear every key: {e}");
    }
    log::info!("signed out");
    logout_url()
}

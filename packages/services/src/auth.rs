// ABOUTME: Sign-in, sign-out, registration and password reset
// ABOUTME: Stores the issued token in the session on login and clears it on logout

use storyloom_client::FormPayload;
use storyloom_core::{
    LoginRequest, PasswordRecovery, PasswordReset, User, UserRegister, USERS_COLLECTION,
};
use tracing::info;

use crate::context::{decode, ServiceContext};
use crate::error::{Context, ServiceError, ServiceResult};

const LOGIN_FAILED: &str = "Login failed";
const LOGOUT_FAILED: &str = "Logout failed";
const REGISTRATION_FAILED: &str = "Registration failed";
const RECOVERY_FAILED: &str = "Password recovery failed";
const RESET_FAILED: &str = "Password reset failed";

#[derive(Clone)]
pub struct AuthService {
    ctx: ServiceContext,
}

impl AuthService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Authenticate with email and password and start a session
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<User> {
        let auth = self
            .ctx
            .records()
            .authenticate(USERS_COLLECTION, &request.email, &request.password)
            .await
            .context(LOGIN_FAILED)?;
        let user: User = decode(LOGIN_FAILED, auth.record)?;
        self.ctx
            .session()
            .sign_in(auth.token, user.clone())
            .context(LOGIN_FAILED)?;
        Ok(user)
    }

    pub fn logout(&self) -> ServiceResult<()> {
        self.ctx.session().sign_out().context(LOGOUT_FAILED)
    }

    /// Create an account. Does not sign in.
    pub async fn register(&self, request: UserRegister) -> ServiceResult<User> {
        if request.password != request.password_confirm {
            return Err(ServiceError::invalid_field(
                REGISTRATION_FAILED,
                "password_confirm",
                "Passwords do not match",
            ));
        }

        let mut payload = FormPayload::new()
            .text("email", request.email.as_str())
            .text("password", request.password.as_str())
            .text("passwordConfirm", request.password_confirm.as_str());
        payload.push_present("name", request.name.as_deref());

        let record = self
            .ctx
            .records()
            .create(USERS_COLLECTION, payload)
            .await
            .context(REGISTRATION_FAILED)?;
        let user: User = decode(REGISTRATION_FAILED, record)?;
        info!("Registered account {}", user.email);
        Ok(user)
    }

    pub async fn recover_password(&self, request: PasswordRecovery) -> ServiceResult<()> {
        self.ctx
            .records()
            .request_password_reset(USERS_COLLECTION, &request.email)
            .await
            .context(RECOVERY_FAILED)
    }

    pub async fn reset_password(&self, request: PasswordReset) -> ServiceResult<()> {
        if request.password != request.password_confirm {
            return Err(ServiceError::invalid_field(
                RESET_FAILED,
                "password_confirm",
                "Passwords do not match",
            ));
        }
        self.ctx
            .records()
            .confirm_password_reset(
                USERS_COLLECTION,
                &request.token,
                &request.password,
                &request.password_confirm,
            )
            .await
            .context(RESET_FAILED)
    }
}

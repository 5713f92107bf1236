// ABOUTME: Operations on the signed-in account
// ABOUTME: Current identity lookup, profile update and account deletion

use storyloom_client::FormPayload;
use storyloom_core::{User, UserUpdateMe, USERS_COLLECTION};
use tracing::{info, warn};

use crate::context::{decode, ServiceContext};
use crate::error::{Context, ServiceError, ServiceResult};

const FETCH_FAILED: &str = "Failed to fetch current user";
const UPDATE_FAILED: &str = "Update failed";
const DELETE_FAILED: &str = "Delete failed";

#[derive(Clone)]
pub struct UserService {
    ctx: ServiceContext,
}

impl UserService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Identity of the session. When only a persisted token is held, it is
    /// refreshed against the backend to recover the identity.
    pub async fn current_user(&self) -> ServiceResult<Option<User>> {
        let session = self.ctx.session();
        if let Some(user) = session.current_user() {
            return Ok(Some(user));
        }
        if !session.is_authenticated() && !session.restore().context(FETCH_FAILED)? {
            return Ok(None);
        }

        let auth = match self.ctx.records().refresh_auth(USERS_COLLECTION).await {
            Ok(auth) => auth,
            Err(err) => {
                if err.is_auth_error() {
                    warn!("Persisted token was rejected, signing out");
                    // sign_out logs its own failure
                    let _ = session.sign_out();
                }
                return Err(ServiceError::from_client(FETCH_FAILED, err));
            }
        };
        let user: User = decode(FETCH_FAILED, auth.record)?;
        session
            .sign_in(auth.token, user.clone())
            .context(FETCH_FAILED)?;
        Ok(Some(user))
    }

    pub async fn update_current_user(&self, update: UserUpdateMe) -> ServiceResult<User> {
        let user_id = self.ctx.require_user(UPDATE_FAILED)?;

        let mut payload = FormPayload::new();
        payload.push_present("name", update.name.as_deref());
        payload.push_present("email", update.email.as_deref());

        let record = self
            .ctx
            .records()
            .update(USERS_COLLECTION, &user_id, payload)
            .await
            .context(UPDATE_FAILED)?;
        let user: User = decode(UPDATE_FAILED, record)?;
        self.ctx.session().set_user(user.clone());
        Ok(user)
    }

    /// Delete the account and end the session. Owned projects cascade on the backend.
    pub async fn delete_current_user(&self) -> ServiceResult<()> {
        let user_id = self.ctx.require_user(DELETE_FAILED)?;
        self.ctx
            .records()
            .delete(USERS_COLLECTION, &user_id)
            .await
            .context(DELETE_FAILED)?;
        info!("Deleted account {}", user_id);
        self.ctx
            .session()
            .sign_out()
            .map_err(|e| ServiceError::from_client(DELETE_FAILED, e))
    }
}

//! Session authentication and the admin authorization gate.
//!
//! Logins happen elsewhere: the storefront's authentication system issues the session cookie, and all this module
//! sees is the `{ user: { id } }` value it carries. The gate re-fetches the user record on every request, so
//! revoking the admin flag takes effect immediately.

use actix_session::Session;
use actix_web::HttpRequest;
use log::*;
use serde::{Deserialize, Serialize};
use storefront_admin_engine::{db_types::User, traits::AdminBackend, OrderAdminApi};

use crate::{
    config::ApiKeyPolicy,
    errors::{AuthError, ServerError},
};

/// The session key the user value is stored under.
pub const SESSION_USER_KEY: &str = "user";
/// Header carrying the shared secret for internal API calls.
pub const API_KEY_HEADER: &str = "sag-api-key";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i64,
}

/// Pulls the logged-in user out of the cookie session. No session, or a session without a user, is an
/// authentication error.
pub fn session_user(session: &Session) -> Result<SessionUser, ServerError> {
    session
        .get::<SessionUser>(SESSION_USER_KEY)
        .map_err(|e| {
            debug!("💻️ Could not read the session cookie. {e}");
            ServerError::from(AuthError::NotLoggedIn)
        })?
        .ok_or_else(|| AuthError::NotLoggedIn.into())
}

/// The admin gate: there must be a session user, the user record must still exist, and it must carry the admin
/// flag. Returns the full user record on success.
pub async fn require_admin<B: AdminBackend>(session: &Session, api: &OrderAdminApi<B>) -> Result<User, ServerError> {
    let session_user = session_user(session)?;
    let user = api
        .fetch_user(session_user.id)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound(format!("User {} not found", session_user.id)))?;
    if !user.is_admin {
        debug!("💻️ User {} attempted to open the dashboard without the admin flag", user.id);
        return Err(ServerError::InsufficientPermissions("user does not have permissions".to_string()));
    }
    Ok(user)
}

/// Checks the shared-secret header on internal API calls. With no secret configured every request passes, which is
/// the storefront's historical behavior for these endpoints.
pub fn check_api_key(req: &HttpRequest, policy: &ApiKeyPolicy) -> Result<(), ServerError> {
    let Some(secret) = &policy.secret else {
        return Ok(());
    };
    let presented = req.headers().get(API_KEY_HEADER).and_then(|v| v.to_str().ok());
    if presented == Some(secret.reveal().as_str()) {
        Ok(())
    } else {
        warn!("💻️ Internal API request rejected: missing or invalid {API_KEY_HEADER} header");
        Err(AuthError::InvalidApiKey.into())
    }
}

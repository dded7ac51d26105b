//! Session login and Mattermost's use of Bearer authentication.

use super::{
    api::{decode, header, MattermostClient},
    error::MattermostError,
    user::{UserId, UserProfile},
};
use serde::Serialize;
use tracing::debug;

/// A newtype wrapper around the session token handed out on login.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(pub String);

/// The authenticated user, needed again when opening direct channels.
pub struct Session {
    pub token: SessionToken,
    pub user_id: UserId,
}

/// Convert a session token to a `Bearer` `Authorization` header value.
///
/// ```
/// let token = SessionToken("abc123".into());
/// assert_eq!(to_auth_header_val(&token), "Bearer abc123");
/// ```
pub fn to_auth_header_val(t: &SessionToken) -> String {
    format!("Bearer {}", t.0)
}

/// <https://api.mattermost.com/#tag/users/operation/Login>
#[derive(Serialize)]
struct LoginRequest<'a> {
    login_id: &'a str,
    password: &'a str,
}

impl MattermostClient {
    /// Log in with a username (or email address) and password. Subsequent
    /// requests made by this client are authenticated as that user.
    pub async fn login(&mut self, login_id: &str, password: &str) -> Result<(), MattermostError> {
        let res = self
            .post("/users/login")
            .json(&LoginRequest { login_id, password })
            .send()
            .await?;

        let token = header(&res, "Token");
        let me: UserProfile = decode(res).await?;
        let token = token.ok_or(MattermostError::MissingHeader("Token"))?;

        debug!("Logged in as user {}", me.id);

        self.session = Some(Session {
            token: SessionToken(token),
            user_id: me.id,
        });

        Ok(())
    }
}

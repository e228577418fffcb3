//! Session restored from the keyring-stored access token.

use browniejar_shared::domain::{UserId, now_utc};
use browniejar_shared::jwt;

use crate::AppError;
use crate::config::ClientConfig;

#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: UserId,
    pub email: Option<String>,
    /// Raw bearer token as issued by the auth plane.
    pub token: String,
    pub expires_unix: i64,
}

impl Session {
    /// Decode a bearer token into a session. Rejects malformed tokens and
    /// tokens that have already expired.
    pub fn from_token(token: &str) -> Result<Self, AppError> {
        let claims = jwt::decode_unverified(token)
            .map_err(|e| AppError::Config(format!("invalid session token: {e}")))?;
        if claims.is_expired(now_utc().unix_timestamp()) {
            return Err(AppError::AuthRequired);
        }
        Ok(Self {
            user_id: UserId::from(claims.sub.as_str()),
            email: claims.email,
            token: token.to_string(),
            expires_unix: claims.exp,
        })
    }

    pub fn is_expired(&self) -> bool {
        self.expires_unix <= now_utc().unix_timestamp()
    }
}

/// Restore the saved session for the configured gateway. A missing keyring
/// entry means the user never signed in (or signed out).
pub fn load(cfg: &ClientConfig) -> Result<Session, AppError> {
    let entry = crate::keyring_entry(&cfg.service_url)?;
    let token = match entry.get_password() {
        Ok(t) => t,
        Err(keyring::Error::NoEntry) => return Err(AppError::AuthRequired),
        Err(e) => return Err(AppError::Keyring(e.to_string())),
    };
    Session::from_token(&token)
}

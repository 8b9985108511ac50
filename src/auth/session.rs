use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::auth::password::PasswordHasher;
use crate::auth::token::{Claims, TokenCodec};
use crate::auth::AuthError;
use crate::config::Config;
use crate::db::is_unique_violation;
use crate::models::User;
use crate::store::UserStore;

/// The credentials handed out by a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Orchestrates registration, login, access-token verification and refresh.
///
/// Holds no per-session state: every token carries what is needed to verify
/// it, and the only shared mutable resource is the user table behind
/// [`UserStore`].
pub struct SessionManager {
    codec: TokenCodec,
    hasher: PasswordHasher,
    users: UserStore,
    access_ttl: Duration,
    refresh_ttl: Duration,
    // Verified against when the username is unknown, so a miss costs the same
    // bcrypt round as a wrong password.
    dummy_digest: String,
}

impl SessionManager {
    pub fn new(
        codec: TokenCodec,
        hasher: PasswordHasher,
        users: UserStore,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Result<Self, AuthError> {
        let dummy_digest = hasher.hash("dummy-password-for-unknown-users")?;
        Ok(Self {
            codec,
            hasher,
            users,
            access_ttl,
            refresh_ttl,
            dummy_digest,
        })
    }

    pub fn from_config(config: &Config, users: UserStore) -> Result<Self, AuthError> {
        Self::new(
            TokenCodec::from_config(config),
            PasswordHasher::new(config.bcrypt_cost),
            users,
            Duration::minutes(config.access_token_ttl_minutes),
            Duration::days(config.refresh_token_ttl_days),
        )
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Creates the account. The storage layer's unique index decides races.
    pub async fn register(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let password_hash = self.hasher.hash(password)?;
        match self.users.create(username, &password_hash).await {
            Ok(user) => {
                log::info!("registered user {} (id {})", user.username, user.id);
                Ok(user)
            }
            Err(e) if is_unique_violation(&e) => {
                log::info!("registration rejected, username {:?} is taken", username);
                Err(AuthError::UserExists)
            }
            Err(e) => Err(AuthError::Storage(e)),
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, AuthError> {
        let user = match self.users.find_by_username(username).await? {
            Some(user) => user,
            None => {
                self.hasher.verify(password, &self.dummy_digest);
                log::warn!("login failed: unknown username {:?}", username);
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !self.hasher.verify(password, &user.password_hash) {
            log::warn!("login failed: wrong password for user id {}", user.id);
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = self.mint_access(user.id)?;
        let refresh_token = self
            .codec
            .encode(&Claims::refresh(user.id, self.refresh_ttl))?;
        log::info!("user id {} logged in", user.id);

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Resolves an access token to its user id. Every failure is the same
    /// `Unauthorized`; the specific cause only goes to the log.
    pub fn verify_access(&self, token: &str) -> Result<i64, AuthError> {
        let claims = self.codec.decode(token).map_err(|e| {
            log::warn!("access token rejected: {}", e);
            AuthError::Unauthorized
        })?;

        if claims.is_refresh() {
            log::warn!("access token rejected: refresh token presented");
            return Err(AuthError::Unauthorized);
        }

        claims.user_id().ok_or_else(|| {
            log::warn!("access token rejected: missing or invalid 'sub' claim");
            AuthError::Unauthorized
        })
    }

    /// What protected routes run: a valid access token whose subject still
    /// exists. A deleted user's token is `Unauthorized` like any other bad token.
    pub async fn authenticate(&self, token: &str) -> Result<i64, AuthError> {
        let user_id = self.verify_access(token)?;
        match self.users.find_by_id(user_id).await? {
            Some(user) => Ok(user.id),
            None => {
                log::warn!("access token rejected: user id {} no longer exists", user_id);
                Err(AuthError::Unauthorized)
            }
        }
    }

    /// Mints a new access token from a refresh token. The refresh token itself
    /// stays valid until it expires.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, AuthError> {
        let claims = self.codec.decode(refresh_token).map_err(|e| {
            log::warn!("refresh token rejected: {}", e);
            AuthError::Unauthorized
        })?;

        if !claims.is_refresh() {
            log::warn!(
                "refresh rejected: token type is {:?}",
                claims.token_type.as_deref()
            );
            return Err(AuthError::WrongTokenType);
        }

        let user_id = claims.user_id().ok_or_else(|| {
            log::warn!("refresh token rejected: missing or invalid 'sub' claim");
            AuthError::Unauthorized
        })?;

        match self.users.find_by_id(user_id).await? {
            Some(user) => self.mint_access(user.id),
            None => {
                log::warn!("refresh rejected: user id {} no longer exists", user_id);
                Err(AuthError::UserNotFound)
            }
        }
    }

    pub async fn current_user(&self, user_id: i64) -> Result<Option<User>, AuthError> {
        Ok(self.users.find_by_id(user_id).await?)
    }

    fn mint_access(&self, user_id: i64) -> Result<String, AuthError> {
        Ok(self.codec.encode(&Claims::access(user_id, self.access_ttl))?)
    }
}

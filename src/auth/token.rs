use chrono::Duration;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;

/// Value of the `type` claim carried by refresh tokens.
pub const REFRESH_TOKEN_TYPE: &str = "refresh";

/// Reasons a token can be refused by [`TokenCodec::decode`], plus issuance failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("token is malformed: {0}")]
    Malformed(String),
    #[error("failed to encode token: {0}")]
    Encode(String),
}

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token: the user's id rendered as a string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Expiration timestamp (seconds since epoch).
    pub exp: u64,
    /// Issued-at timestamp (seconds since epoch).
    #[serde(default)]
    pub iat: u64,
    /// Purpose marker. Only refresh tokens set it.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

impl Claims {
    pub fn access(user_id: i64, ttl: Duration) -> Self {
        let now = TokenCodec::now();
        Self {
            sub: Some(user_id.to_string()),
            exp: expiry(now, ttl),
            iat: now,
            token_type: None,
        }
    }

    pub fn refresh(user_id: i64, ttl: Duration) -> Self {
        Self {
            token_type: Some(REFRESH_TOKEN_TYPE.to_string()),
            ..Self::access(user_id, ttl)
        }
    }

    pub fn is_refresh(&self) -> bool {
        self.token_type.as_deref() == Some(REFRESH_TOKEN_TYPE)
    }

    /// The subject parsed as a user id, if present and numeric.
    pub fn user_id(&self) -> Option<i64> {
        self.sub.as_deref().and_then(|sub| sub.parse().ok())
    }
}

fn expiry(now: u64, ttl: Duration) -> u64 {
    now.saturating_add_signed(ttl.num_seconds())
}

/// Signs and verifies tokens with one shared HMAC secret.
///
/// Every instance that must accept another instance's tokens has to be built
/// from the same secret and algorithm.
pub struct TokenCodec {
    header: Header,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &[u8], algorithm: Algorithm) -> Self {
        let mut validation = Validation::new(algorithm);
        // Expiry is compared strictly; no clock-skew allowance.
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            header: Header::new(algorithm),
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.jwt_secret.as_bytes(), config.jwt_algorithm)
    }

    /// Current time in seconds since epoch. This is the clock `decode` checks
    /// expiry against, so issuance uses it too.
    pub fn now() -> u64 {
        jsonwebtoken::get_current_timestamp()
    }

    pub fn encode(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&self.header, claims, &self.encoding_key)
            .map_err(|e| TokenError::Encode(e.to_string()))
    }

    /// Verifies the signature, then the expiry, then parses the claims.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::InvalidSignature
                }
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed(e.to_string()),
            })
    }
}

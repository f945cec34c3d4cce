use chrono::{Duration, Utc};
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use model::entities::user::{self, Role};
use serde::{Deserialize, Serialize};

/// Claims carried inside every issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Id of the user the token was issued for.
    pub sub: i32,
    pub username: String,
    pub role: Role,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

impl Claims {
    pub fn new(sub: i32, username: String, role: Role, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub,
            username,
            role,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("token could not be signed")]
    Signing(#[source] jsonwebtoken::errors::Error),
    #[error("token expired")]
    Expired,
    #[error("invalid token")]
    Invalid,
}

/// Issues and verifies signed bearer tokens.
///
/// Built once at startup from the configured secret; the keys and the
/// expiry window are explicit state, not process-wide globals. Tokens
/// are valid for one hour from issuance.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self::with_ttl(secret, Duration::hours(1))
    }

    /// Construct with a custom expiry window. Production code uses
    /// [`TokenService::new`]; tests shorten or invert the window to
    /// exercise expiry handling.
    pub fn with_ttl(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Sign a token for the given user.
    pub fn issue(&self, user: &user::Model) -> Result<String, JwtError> {
        let claims = Claims::new(user.id, user.username.clone(), user.role, self.ttl);
        encode(&Header::default(), &claims, &self.encoding).map_err(JwtError::Signing)
    }

    /// Check signature and expiry, returning the decoded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default()).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid,
            }
        })?;
        Ok(data.claims)
    }
}

// Keys must never end up in logs; only the window is printable.
impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

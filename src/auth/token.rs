//! Signed bearer tokens (HS256 JWT) carrying the user id.

use anyhow::Context;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Claims {
    user_id: Uuid,
    iat: i64,
    exp: i64,
}

#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, user_id: Uuid) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            user_id,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        log::debug!("issuing token for user {user_id}");
        let token = encode(&Header::default(), &claims, &self.encoding).context("JWT encode failed")?;
        Ok(token)
    }

    /// Recover the user id; fails on bad signature, malformed payload or expiry.
    pub fn verify(&self, token: &str) -> Result<Uuid> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims.user_id)
            .map_err(|e| {
                log::debug!("rejected token: {e}");
                Error::Unauthenticated("Token is not valid")
            })
    }
}

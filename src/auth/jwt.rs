use std::time::Duration;

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::config::{JwtConfig, MAX_TTL_MINUTES};

/// JWT payload issued on login.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: i32,      // user ID
    pub email: String, // user email
    pub iat: usize,    // issued at
    pub exp: usize,    // expiration time
    pub iss: String,   // issuer
    pub aud: String,   // audience
    pub jti: String,   // unique token id
}

/// Holds JWT signing and verification keys with config data.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub ttl: Duration,
}

impl From<&JwtConfig> for JwtKeys {
    fn from(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            ttl: Duration::from_secs(u64::from(cfg.ttl_minutes.min(MAX_TTL_MINUTES)) * 60),
        }
    }
}

impl JwtKeys {
    pub fn sign(&self, user_id: i32, email: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: user_id,
            email: email.to_owned(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

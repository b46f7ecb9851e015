use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::auth::repo_types::User;

/// Request body for registration and login. Either field may be null.
#[derive(Debug, Deserialize)]
pub struct CredentialRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Response returned after login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Public part of the user returned to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: i32,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<User> for PublicProfile {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::auth::{
    dto::{PublicProfile, TokenResponse},
    error::{AuthError, AuthResult},
    jwt::JwtKeys,
    password::{CredentialHasher, HashError},
    repo::UserStore,
    repo_types::{check_email, is_storable_email},
};

/// Registration and login on top of an injected [`UserStore`].
pub struct AccountService {
    store: Arc<dyn UserStore>,
    hasher: CredentialHasher,
    keys: JwtKeys,
}

impl AccountService {
    pub fn new(store: Arc<dyn UserStore>, hasher: CredentialHasher, keys: JwtKeys) -> Self {
        Self {
            store,
            hasher,
            keys,
        }
    }

    /// Create an account and return its public profile.
    ///
    /// Email column constraints are checked before the password, so a request
    /// missing both reports the email. Uniqueness is left to the store.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        email: Option<String>,
        password: Option<String>,
    ) -> AuthResult<PublicProfile> {
        let email = check_email(email.as_deref())
            .inspect_err(|e| warn!(error = %e, "register rejected"))?
            .to_owned();

        let hash = self
            .hasher
            .hash_blocking(password)
            .await
            .inspect_err(|e| warn!(error = %e, "register rejected"))?;

        let user = self
            .store
            .create_user(&email, &hash)
            .await
            .inspect_err(|e| warn!(error = %e, "create user failed"))?;

        info!(user_id = user.id, email = %user.email, "user registered");
        Ok(user.into())
    }

    /// Check credentials and issue a session token.
    ///
    /// Every credential problem yields [`AuthError::Unauthenticated`]. The hash
    /// step runs even for unknown or missing emails, against the hasher's decoy.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        email: Option<String>,
        password: Option<String>,
    ) -> AuthResult<TokenResponse> {
        // an email the store could never hold cannot belong to a user
        let user = match email.as_deref() {
            Some(email) if is_storable_email(email) => self.store.find_user_by_email(email).await?,
            _ => None,
        };

        let password_missing = password.is_none();
        let digest = user
            .as_ref()
            .map_or_else(|| self.hasher.decoy().to_owned(), |u| u.password_hash.clone());
        let verified = match self.hasher.verify_blocking(password, digest).await {
            Ok(v) => v,
            Err(HashError::MissingArgument) => false,
            Err(e) => return Err(e.into()),
        };

        let user = match user {
            Some(user) if verified => user,
            Some(user) => {
                let reason = if password_missing { "missing password" } else { "wrong password" };
                warn!(user_id = user.id, reason, "login rejected");
                return Err(AuthError::Unauthenticated);
            }
            None => {
                let reason = if email.is_none() { "missing email" } else { "unknown email" };
                warn!(reason, "login rejected");
                return Err(AuthError::Unauthenticated);
            }
        };

        let token = self.keys.sign(user.id, &user.email)?;
        info!(user_id = user.id, "user logged in");
        Ok(TokenResponse { token })
    }
}

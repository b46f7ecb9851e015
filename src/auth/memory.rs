use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::auth::repo::UserStore;
use crate::auth::repo_types::{check_email, PersistenceError, User};

/// In-process [`UserStore`] with the same constraints as the `"Users"` table.
///
/// The lock is held across the uniqueness check and the insert, so concurrent
/// registrations of one email resolve to exactly one row.
#[derive(Default)]
pub struct MemoryUserStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    last_id: i32,
    users: Vec<User>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, PersistenceError> {
        let email = check_email(Some(email))?;

        let mut inner = self.inner.lock().await;
        if inner.users.iter().any(|u| u.email == email) {
            return Err(PersistenceError::UniqueViolation);
        }

        inner.last_id += 1;
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: inner.last_id,
            email: email.to_owned(),
            password_hash: password_hash.to_owned(),
            created_at: now,
            updated_at: now,
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, PersistenceError> {
        let inner = self.inner.lock().await;
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }
}

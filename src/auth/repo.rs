use async_trait::async_trait;
use sqlx::{postgres::PgDatabaseError, PgPool};

use crate::auth::repo_types::{PersistenceError, User};

/// Persistence port for user records.
///
/// Implementations own the uniqueness guarantee on `email`: `create_user` must
/// reject a duplicate atomically rather than relying on a prior lookup.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user and return the stored row.
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, PersistenceError>;

    /// Find a user by exact email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, PersistenceError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, PersistenceError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO "Users" (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(classify)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, PersistenceError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at, updated_at
            FROM "Users"
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }
}

/// Map PostgreSQL constraint errors onto [`PersistenceError`] variants.
fn classify(err: sqlx::Error) -> PersistenceError {
    let mapped = match &err {
        sqlx::Error::Database(db_err) => db_err
            .code()
            .and_then(|code| classify_code(&code, column_of(&**db_err))),
        _ => None,
    };
    mapped.unwrap_or_else(|| PersistenceError::Database(err))
}

fn column_of(db_err: &dyn sqlx::error::DatabaseError) -> Option<&str> {
    db_err
        .try_downcast_ref::<PgDatabaseError>()
        .and_then(|e| e.column())
}

/// SQLSTATE codes: 23502 not_null_violation, 22001 string_data_right_truncation,
/// 23505 unique_violation.
fn classify_code(code: &str, column: Option<&str>) -> Option<PersistenceError> {
    match code {
        "23502" => Some(PersistenceError::NullViolation {
            column: match column {
                Some("password_hash") => "password_hash",
                _ => "email",
            },
        }),
        "22001" => Some(PersistenceError::TooLong {
            max: crate::auth::repo_types::EMAIL_MAX_LEN,
        }),
        "23505" => Some(PersistenceError::UniqueViolation),
        _ => None,
    }
}

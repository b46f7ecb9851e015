use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// Maximum length of `"Users".email`, mirrors `varchar(255)`.
pub const EMAIL_MAX_LEN: usize = 255;

/// User record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i32,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 PHC string, not exposed in JSON
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Constraint violations reported by a [`UserStore`](super::repo::UserStore).
///
/// The `Display` text of each constraint variant is part of the HTTP contract
/// and reproduces the message PostgreSQL raises for the same violation.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("null value in column \"{column}\" of relation \"Users\" violates not-null constraint")]
    NullViolation { column: &'static str },

    #[error("value too long for type character varying({max})")]
    TooLong { max: usize },

    #[error("Validation error")]
    UniqueViolation,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Checks the column constraints on `"Users".email` and returns the value
/// when it would be accepted. Uniqueness is not checked here.
pub fn check_email(email: Option<&str>) -> Result<&str, PersistenceError> {
    let email = email.ok_or(PersistenceError::NullViolation { column: "email" })?;
    if email.chars().count() > EMAIL_MAX_LEN {
        return Err(PersistenceError::TooLong { max: EMAIL_MAX_LEN });
    }
    Ok(email)
}

/// Whether `email` could ever have been stored. PostgreSQL text cannot hold
/// NUL, so such a value is rejected by the server rather than just not found.
pub fn is_storable_email(email: &str) -> bool {
    !email.contains('\0') && check_email(Some(email)).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_email_is_a_not_null_violation() {
        let err = check_email(None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "null value in column \"email\" of relation \"Users\" violates not-null constraint"
        );
    }

    #[test]
    fn email_longer_than_column_is_rejected() {
        let long = format!("{}@mail.com", "a".repeat(250));
        let err = check_email(Some(&long)).unwrap_err();
        assert_eq!(err.to_string(), "value too long for type character varying(255)");
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // 255 two-byte characters still fit in varchar(255)
        let email = "é".repeat(EMAIL_MAX_LEN);
        assert_eq!(check_email(Some(&email)).unwrap(), email);
    }

    #[test]
    fn storable_email_excludes_nul_and_overlong() {
        assert!(is_storable_email("test@mail.com"));
        assert!(!is_storable_email("test@mail.com\0"));
        assert!(!is_storable_email(&"a".repeat(EMAIL_MAX_LEN + 1)));
    }

    #[test]
    fn unique_violation_message() {
        assert_eq!(PersistenceError::UniqueViolation.to_string(), "Validation error");
    }
}

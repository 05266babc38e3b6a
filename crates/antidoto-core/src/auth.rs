//! Email sign-in against the allow-list and the persisted pseudo-session.
//!
//! There is no password flow: an email on the allow-list is the whole
//! credential. The session is an explicit value handed to the operations
//! that need it, never a process-wide singleton; presence of a stored
//! session is the only gate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, CoreError};
use crate::storage::Database;

const SESSION_KEY: &str = "session";

/// A signed-in user. The id is a generated UUID, stable across sessions;
/// rows are never linked by email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
}

/// The current session: user identity plus when it started.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    pub started_at: DateTime<Utc>,
}

impl Session {
    /// Greeting name: the email local part, or "Viajante" when the email
    /// is unusable.
    pub fn display_name(&self) -> &str {
        match self.user.email.split('@').next() {
            Some(name) if !name.is_empty() => name,
            _ => "Viajante",
        }
    }
}

/// Lowercase, trimmed form of the email used for all comparisons.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Sign in by email.
///
/// The email is normalized, checked against the allow-list (unknown
/// emails are rejected with a visible, retryable error), the user row is
/// found or created, and the session is persisted.
pub fn sign_in(db: &Database, email: &str) -> Result<Session, CoreError> {
    let email = normalize_email(email);
    if email.is_empty() || !email.contains('@') {
        return Err(AuthError::InvalidEmail(email).into());
    }
    if !db.is_email_allowed(&email)? {
        return Err(AuthError::NotAllowed.into());
    }

    let user = db.find_or_create_user(&email)?;
    let session = Session {
        user,
        started_at: Utc::now(),
    };
    db.kv_set(SESSION_KEY, &serde_json::to_string(&session)?)?;
    Ok(session)
}

/// The stored session, if one is present.
///
/// A stored value that no longer parses (stale format) reads as no
/// session rather than an error.
pub fn current_session(db: &Database) -> Result<Option<Session>, CoreError> {
    let Some(raw) = db.kv_get(SESSION_KEY)? else {
        return Ok(None);
    };
    Ok(serde_json::from_str(&raw).ok())
}

/// The stored session, or an error for operations that require one.
pub fn require_session(db: &Database) -> Result<Session, CoreError> {
    current_session(db)?.ok_or_else(|| AuthError::NotSignedIn.into())
}

/// Clear the stored session.
pub fn sign_out(db: &Database) -> Result<(), CoreError> {
    db.kv_delete(SESSION_KEY)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_in_requires_allow_list() {
        let db = Database::open_memory().unwrap();
        let err = sign_in(&db, "ana@example.com").unwrap_err();
        assert_eq!(err.to_string(), "Acesso não autorizado. Adquira o Antídoto.");
        assert!(current_session(&db).unwrap().is_none());
    }

    #[test]
    fn sign_in_persists_the_session() {
        let db = Database::open_memory().unwrap();
        db.allow_email("ana@example.com").unwrap();

        let session = sign_in(&db, "ana@example.com").unwrap();
        assert_eq!(session.user.email, "ana@example.com");

        let stored = current_session(&db).unwrap().unwrap();
        assert_eq!(stored.user, session.user);
    }

    #[test]
    fn sign_in_normalizes_the_email() {
        let db = Database::open_memory().unwrap();
        db.allow_email("ana@example.com").unwrap();

        let session = sign_in(&db, "  Ana@Example.COM ").unwrap();
        assert_eq!(session.user.email, "ana@example.com");
    }

    #[test]
    fn rejected_sign_in_is_retryable() {
        let db = Database::open_memory().unwrap();
        assert!(sign_in(&db, "ana@example.com").is_err());

        db.allow_email("ana@example.com").unwrap();
        assert!(sign_in(&db, "ana@example.com").is_ok());
    }

    #[test]
    fn user_id_survives_sign_out() {
        let db = Database::open_memory().unwrap();
        db.allow_email("ana@example.com").unwrap();

        let first = sign_in(&db, "ana@example.com").unwrap();
        sign_out(&db).unwrap();
        assert!(current_session(&db).unwrap().is_none());

        let second = sign_in(&db, "ana@example.com").unwrap();
        assert_eq!(first.user.id, second.user.id);
    }

    #[test]
    fn empty_email_is_invalid() {
        let db = Database::open_memory().unwrap();
        let err = sign_in(&db, "   ").unwrap_err();
        assert!(matches!(err, CoreError::Auth(AuthError::InvalidEmail(_))));
    }

    #[test]
    fn corrupt_stored_session_reads_as_signed_out() {
        let db = Database::open_memory().unwrap();
        db.kv_set("session", "{not json").unwrap();
        assert!(current_session(&db).unwrap().is_none());
    }

    #[test]
    fn display_name_is_the_local_part() {
        let session = Session {
            user: User {
                id: "x".to_string(),
                email: "ana@example.com".to_string(),
            },
            started_at: Utc::now(),
        };
        assert_eq!(session.display_name(), "ana");
    }

    #[test]
    fn require_session_errors_when_signed_out() {
        let db = Database::open_memory().unwrap();
        let err = require_session(&db).unwrap_err();
        assert!(matches!(err, CoreError::Auth(AuthError::NotSignedIn)));
    }
}

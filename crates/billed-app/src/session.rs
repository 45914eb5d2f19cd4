use serde::{Deserialize, Serialize};

use crate::error::SessionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserKind {
    Employee,
}

/// The signed-in user, handed to the containers at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "type")]
    pub kind: UserKind,
    #[serde(default)]
    pub email: String,
}

impl Session {
    pub fn employee(email: impl Into<String>) -> Self {
        Self {
            kind: UserKind::Employee,
            email: email.into(),
        }
    }

    /// Parse the persisted user record, e.g.
    /// `{"type":"Employee","email":"employee@test.tld"}`.
    pub fn from_user_record(record: &str) -> Result<Self, SessionError> {
        let session: Session = serde_json::from_str(record)?;
        if session.email.trim().is_empty() {
            return Err(SessionError::MissingEmail);
        }
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_user_record() {
        let session =
            Session::from_user_record(r#"{"type":"Employee","email":"test@test.com"}"#).unwrap();
        assert_eq!(session, Session::employee("test@test.com"));
    }

    #[test]
    fn rejects_records_without_email() {
        let err = Session::from_user_record(r#"{"type":"Employee"}"#).unwrap_err();
        assert!(matches!(err, SessionError::MissingEmail));

        let err = Session::from_user_record("not json").unwrap_err();
        assert!(matches!(err, SessionError::Malformed(_)));
    }

    #[test]
    fn only_employee_records_open_a_session() {
        let err = Session::from_user_record(r#"{"type":"Admin","email":"admin@test.tld"}"#)
            .unwrap_err();
        assert!(matches!(err, SessionError::Malformed(_)));
    }
}

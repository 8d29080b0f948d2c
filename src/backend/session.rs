//! Session-file identity provider

use super::traits::AuthProvider;
use crate::config::project_dirs;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Environment variable that overrides the stored user id
pub const USER_ID_ENV: &str = "CARD_FORM_USER_ID";

/// Persisted sign-in state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Uuid,
    /// Bearer token for the hosted table, if the backend requires one
    #[serde(default)]
    pub access_token: Option<String>,
}

impl Session {
    fn path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("session.json"))
    }

    /// Read a session file. A missing file means nobody is signed in.
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read session file {}", path.display()))?;
        let session = serde_json::from_str(&content)
            .with_context(|| format!("Malformed session file {}", path.display()))?;
        Ok(Some(session))
    }
}

/// Identity taken from the session file, with an env override
#[derive(Debug, Clone, Default)]
pub struct SessionAuth {
    session: Option<Session>,
}

impl SessionAuth {
    pub fn new(session: Option<Session>) -> Self {
        Self { session }
    }

    /// Load the session from the default location and apply the env override
    pub fn load() -> Result<Self> {
        let session = match Session::path() {
            Some(path) => Session::load_from(&path)?,
            None => None,
        };
        Ok(Self::new(session).with_user_override(std::env::var(USER_ID_ENV).ok()))
    }

    /// Replace the user id with `raw` when it parses as a UUID
    pub fn with_user_override(mut self, raw: Option<String>) -> Self {
        let Some(raw) = raw else {
            return self;
        };
        match Uuid::parse_str(raw.trim()) {
            Ok(user_id) => {
                let access_token = self.session.take().and_then(|s| s.access_token);
                self.session = Some(Session {
                    user_id,
                    access_token,
                });
            }
            Err(e) => tracing::warn!("Ignoring {USER_ID_ENV}: {e}"),
        }
        self
    }

    pub fn access_token(&self) -> Option<&str> {
        self.session.as_ref().and_then(|s| s.access_token.as_deref())
    }
}

impl AuthProvider for SessionAuth {
    fn current_user(&self) -> Option<Uuid> {
        self.session.as_ref().map(|s| s.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("card-form-tui-{}-{name}", Uuid::new_v4()))
    }

    #[test]
    fn test_no_session_means_no_user() {
        let auth = SessionAuth::default();
        assert!(auth.current_user().is_none());
        assert!(auth.access_token().is_none());
    }

    #[test]
    fn test_session_user_is_current() {
        let user_id = Uuid::new_v4();
        let auth = SessionAuth::new(Some(Session {
            user_id,
            access_token: Some("token".to_string()),
        }));
        assert_eq!(auth.current_user(), Some(user_id));
        assert_eq!(auth.access_token(), Some("token"));
    }

    #[test]
    fn test_override_replaces_user_and_keeps_token() {
        let original = Uuid::new_v4();
        let replacement = Uuid::new_v4();
        let auth = SessionAuth::new(Some(Session {
            user_id: original,
            access_token: Some("token".to_string()),
        }))
        .with_user_override(Some(replacement.to_string()));
        assert_eq!(auth.current_user(), Some(replacement));
        assert_eq!(auth.access_token(), Some("token"));
    }

    #[test]
    fn test_override_signs_in_without_session() {
        let user_id = Uuid::new_v4();
        let auth = SessionAuth::default().with_user_override(Some(format!(" {user_id} ")));
        assert_eq!(auth.current_user(), Some(user_id));
    }

    #[test]
    fn test_invalid_override_is_ignored() {
        let auth = SessionAuth::default().with_user_override(Some("not-a-uuid".to_string()));
        assert!(auth.current_user().is_none());
    }

    #[test]
    fn test_load_from_missing_file() {
        let path = temp_path("missing.json");
        assert!(Session::load_from(&path).unwrap().is_none());
    }

    #[test]
    fn test_load_from_file() {
        let path = temp_path("session.json");
        let user_id = Uuid::new_v4();
        fs::write(&path, format!(r#"{{"user_id": "{user_id}"}}"#)).unwrap();

        let session = Session::load_from(&path).unwrap().unwrap();
        assert_eq!(session.user_id, user_id);
        assert!(session.access_token.is_none());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_from_malformed_file() {
        let path = temp_path("bad.json");
        fs::write(&path, "{").unwrap();
        assert!(Session::load_from(&path).is_err());
        fs::remove_file(&path).unwrap();
    }
}

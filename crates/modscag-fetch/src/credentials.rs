//! Archive credentials loaded from a JSON file.

use crate::{FetchError, Result};
use serde_json::{Map, Value};
use std::path::Path;

/// Key holding the archive user name.
const USERNAME_KEY: &str = "username";

/// Key holding the archive password.
const PASSWORD_KEY: &str = "password";

/// Credentials for the snow-data archive.
///
/// The file is any JSON object. When it carries `username` and `password`
/// string entries they are used for HTTP basic auth.
#[derive(Clone, Default)]
pub struct Credentials {
    entries: Map<String, Value>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("keys", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Credentials {
    /// Load credentials from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parse credentials from a JSON document.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        match value {
            Value::Object(entries) => Ok(Self { entries }),
            _ => Err(FetchError::CredentialsNotObject),
        }
    }

    /// Get a string entry.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(Value::as_str)
    }

    /// Number of entries in the mapping.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Basic auth pair, when both user name and password are present.
    pub fn basic_auth(&self) -> Option<(&str, &str)> {
        Some((self.get(USERNAME_KEY)?, self.get(PASSWORD_KEY)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"username": "snow", "password": "secret", "port": 443}}"#).unwrap();

        let creds = Credentials::from_file(file.path()).unwrap();
        assert_eq!(creds.len(), 3);
        assert_eq!(creds.basic_auth(), Some(("snow", "secret")));
        assert_eq!(creds.get("port"), None);
    }

    #[test]
    fn test_missing_password() {
        let creds = Credentials::from_json(r#"{"username": "snow"}"#).unwrap();
        assert_eq!(creds.basic_auth(), None);
    }

    #[test]
    fn test_not_an_object() {
        assert!(matches!(
            Credentials::from_json("[1, 2]"),
            Err(FetchError::CredentialsNotObject)
        ));
        assert!(matches!(
            Credentials::from_json("{"),
            Err(FetchError::CredentialsJson(_))
        ));
    }

    #[test]
    fn test_debug_hides_values() {
        let creds = Credentials::from_json(r#"{"password": "secret"}"#).unwrap();
        let shown = format!("{:?}", creds);
        assert!(shown.contains("password"));
        assert!(!shown.contains("secret"));
    }
}

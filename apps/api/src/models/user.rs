use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A registered user as stored in `users.json`, keyed by username.
///
/// Besides the password, the record holds whatever profile fields the user
/// has saved through `/update_profile`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub password: String,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

#[derive(Debug, Error, PartialEq)]
pub enum ProfileUpdateError {
    #[error("password must be a string")]
    PasswordNotString,
    #[error("password cannot be empty")]
    EmptyPassword,
}

impl UserRecord {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            profile: Map::new(),
        }
    }

    pub fn verify_password(&self, candidate: &str) -> bool {
        self.password == candidate
    }

    /// Merges arbitrary fields into the record in place. A `password` key
    /// replaces the password; every other key overwrites the profile field.
    pub fn merge(&mut self, update: Map<String, Value>) -> Result<(), ProfileUpdateError> {
        if let Some(password) = update.get("password") {
            match password.as_str() {
                Some("") => return Err(ProfileUpdateError::EmptyPassword),
                Some(_) => {}
                None => return Err(ProfileUpdateError::PasswordNotString),
            }
        }

        for (key, value) in update {
            if key == "password" {
                if let Value::String(password) = value {
                    self.password = password;
                }
            } else {
                self.profile.insert(key, value);
            }
        }
        Ok(())
    }

    /// The record as shown back to the client: profile fields only.
    pub fn public_view(&self) -> Value {
        Value::Object(self.profile.clone())
    }

    /// A string-valued profile field, if present and non-blank.
    pub fn profile_str(&self, key: &str) -> Option<&str> {
        self.profile
            .get(key)
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

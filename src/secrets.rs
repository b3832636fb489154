//! Secrets file loading.
//!
//! The secrets file is a small JSON document read once at startup:
//!
//! ```json
//! { "secret": "<salt>", "users": ["<username digest>", "<password digest>"] }
//! ```
//!
//! Both `users` entries are hex SHA-256 digests of the secret concatenated with
//! the plaintext value (see `fava-auth hash`). Any failure here is fatal for the
//! process.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

pub const DEFAULT_SECRETS_PATH: &str = "data/secrets.json";

#[derive(Debug, thiserror::Error)]
pub enum SecretsError {
    #[error("Failed to read secrets file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse secrets file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid secrets file: {0}")]
    Invalid(String),
}

#[derive(Deserialize)]
struct RawSecrets {
    secret: String,
    users: Vec<String>,
}

/// Secret key plus the single admin credential pair.
pub struct Secrets {
    secret: SecretString,
    username_digest: String,
    password_digest: String,
}

impl Secrets {
    /// Read and validate the secrets file at `path`.
    ///
    /// # Errors
    /// Returns an error if the file is missing, unreadable, or malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SecretsError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| SecretsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Parse and validate a secrets document.
    ///
    /// # Errors
    /// Returns an error if the JSON is invalid, the secret is empty, or `users`
    /// is not exactly two non-empty strings.
    pub fn from_json(contents: &str) -> Result<Self, SecretsError> {
        let raw: RawSecrets = serde_json::from_str(contents)?;

        if raw.secret.is_empty() {
            return Err(SecretsError::Invalid("secret cannot be empty".to_string()));
        }

        let [username_digest, password_digest]: [String; 2] =
            raw.users.try_into().map_err(|users: Vec<String>| {
                SecretsError::Invalid(format!(
                    "users must hold exactly 2 entries, got {}",
                    users.len()
                ))
            })?;

        if username_digest.trim().is_empty() || password_digest.trim().is_empty() {
            return Err(SecretsError::Invalid(
                "users entries cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            secret: SecretString::from(raw.secret),
            username_digest: username_digest.trim().to_lowercase(),
            password_digest: password_digest.trim().to_lowercase(),
        })
    }

    pub(crate) fn expose_secret(&self) -> &str {
        self.secret.expose_secret()
    }

    #[must_use]
    pub fn username_digest(&self) -> &str {
        &self.username_digest
    }

    #[must_use]
    pub fn password_digest(&self) -> &str {
        &self.password_digest
    }
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("secret", &"[REDACTED]")
            .field("username_digest", &self.username_digest)
            .field("password_digest", &"[REDACTED]")
            .finish()
    }
}

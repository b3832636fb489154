//! The admin user and its one-entry directory.

use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use subtle::ConstantTimeEq;

use crate::secrets::Secrets;

/// Hex SHA-256 of `secret || value`, the form credentials are stored and compared in.
#[must_use]
pub fn credential_digest(secret: &str, value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(value.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[derive(Clone)]
pub struct AdminUser {
    id: String,
    password_digest: String,
}

impl AdminUser {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    fn password_matches(&self, candidate_digest: &str) -> bool {
        self.password_digest
            .as_bytes()
            .ct_eq(candidate_digest.as_bytes())
            .into()
    }
}

impl std::fmt::Debug for AdminUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminUser")
            .field("id", &self.id)
            .field("password_digest", &"[REDACTED]")
            .finish()
    }
}

/// Users keyed by identifier digest. Always holds exactly one entry.
#[derive(Debug)]
pub struct UserDirectory {
    secret: SecretString,
    users: HashMap<String, AdminUser>,
}

impl UserDirectory {
    #[must_use]
    pub fn from_secrets(secrets: &Secrets) -> Self {
        let user = AdminUser {
            id: secrets.username_digest().to_string(),
            password_digest: secrets.password_digest().to_string(),
        };

        let mut users = HashMap::with_capacity(1);
        users.insert(user.id.clone(), user);

        Self {
            secret: SecretString::from(secrets.expose_secret().to_string()),
            users,
        }
    }

    /// Look up a user by the identifier stored in a session.
    #[must_use]
    pub fn get(&self, user_id: &str) -> Option<&AdminUser> {
        self.users.get(user_id)
    }

    /// Hash the submitted credentials and check them against the stored user.
    ///
    /// Unknown usernames and wrong passwords are indistinguishable to the caller.
    #[must_use]
    pub fn authenticate(&self, username: &str, password: &str) -> Option<&AdminUser> {
        let secret = self.secret.expose_secret();
        let user_id = credential_digest(secret, username);
        let password_digest = credential_digest(secret, password);

        self.users
            .get(&user_id)
            .filter(|user| user.password_matches(&password_digest))
    }
}

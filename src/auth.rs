use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use ulid::Ulid;

use crate::engine::EngineError;
use crate::limits::{MAX_ADMIN_USERS, MAX_EMAIL_LEN};

/// Salted SHA-256 of a password. The plaintext is never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    salt: String,
    digest: String,
}

impl Credential {
    pub fn new(password: &str) -> Self {
        let salt = Ulid::new().to_string();
        let digest = hash(&salt, password);
        Self { salt, digest }
    }

    pub fn verify(&self, password: &str) -> bool {
        digests_match(hash(&self.salt, password).as_bytes(), self.digest.as_bytes())
    }
}

/// Compares every byte regardless of where the first difference is.
fn digests_match(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

fn hash(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: Ulid,
    pub email: String,
    pub credential: Credential,
}

/// What listings show about an administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminUserInfo {
    pub id: Ulid,
    pub email: String,
}

/// Administrator accounts. Emails are unique ignoring case, and the directory
/// never becomes empty through `delete`.
#[derive(Debug, Clone, Default)]
pub struct AdminDirectory {
    users: Vec<AdminUser>,
}

impl AdminDirectory {
    pub fn from_users(users: Vec<AdminUser>) -> Self {
        Self { users }
    }

    /// A directory holding one account, used when nothing is stored yet.
    pub fn bootstrap(email: &str, password: &str) -> Result<Self, EngineError> {
        let mut dir = Self::default();
        dir.create(email, password)?;
        Ok(dir)
    }

    pub fn users(&self) -> &[AdminUser] {
        &self.users
    }

    pub fn list(&self) -> Vec<AdminUserInfo> {
        self.users
            .iter()
            .map(|u| AdminUserInfo {
                id: u.id,
                email: u.email.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    fn email_taken(&self, email: &str, except: Option<Ulid>) -> bool {
        self.users
            .iter()
            .any(|u| Some(u.id) != except && u.email.eq_ignore_ascii_case(email))
    }

    pub fn create(&mut self, email: &str, password: &str) -> Result<AdminUserInfo, EngineError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(EngineError::MissingCredentials);
        }
        if email.len() > MAX_EMAIL_LEN {
            return Err(EngineError::LimitExceeded("email too long"));
        }
        if self.users.len() >= MAX_ADMIN_USERS {
            return Err(EngineError::LimitExceeded("too many admin users"));
        }
        if self.email_taken(email, None) {
            return Err(EngineError::DuplicateKey(email.to_string()));
        }
        let user = AdminUser {
            id: Ulid::new(),
            email: email.to_string(),
            credential: Credential::new(password),
        };
        let info = AdminUserInfo {
            id: user.id,
            email: user.email.clone(),
        };
        self.users.push(user);
        Ok(info)
    }

    /// Change a user's email, and their password when one is given.
    pub fn update(&mut self, id: Ulid, email: &str, password: Option<&str>) -> Result<(), EngineError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(EngineError::MissingCredentials);
        }
        if email.len() > MAX_EMAIL_LEN {
            return Err(EngineError::LimitExceeded("email too long"));
        }
        if self.email_taken(email, Some(id)) {
            return Err(EngineError::DuplicateKey(email.to_string()));
        }
        let user = self
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(EngineError::NotFound(id))?;
        user.email = email.to_string();
        if let Some(pw) = password.filter(|p| !p.is_empty()) {
            user.credential = Credential::new(pw);
        }
        Ok(())
    }

    pub fn delete(&mut self, id: Ulid) -> Result<(), EngineError> {
        if self.users.len() <= 1 {
            return Err(EngineError::InvariantWouldBreak("cannot delete the last admin user"));
        }
        let pos = self
            .users
            .iter()
            .position(|u| u.id == id)
            .ok_or(EngineError::NotFound(id))?;
        self.users.remove(pos);
        Ok(())
    }

    /// Check an email/password pair. The email must match exactly.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<AdminUserInfo, EngineError> {
        if email.trim().is_empty() || password.trim().is_empty() {
            return Err(EngineError::MissingCredentials);
        }
        self.users
            .iter()
            .find(|u| u.email == email && u.credential.verify(password))
            .map(|u| AdminUserInfo {
                id: u.id,
                email: u.email.clone(),
            })
            .ok_or(EngineError::InvalidCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> AdminDirectory {
        AdminDirectory::bootstrap("admin@example.com", "admin").unwrap()
    }

    #[test]
    fn credential_is_salted() {
        let a = Credential::new("secret");
        let b = Credential::new("secret");
        assert_ne!(a, b);
        assert!(a.verify("secret"));
        assert!(!a.verify("Secret"));
    }

    #[test]
    fn digest_comparison() {
        assert!(digests_match(b"abcd", b"abcd"));
        assert!(!digests_match(b"abcd", b"abce"));
        assert!(!digests_match(b"xbcd", b"abcd"));
        assert!(!digests_match(b"abc", b"abcd"));

        let mut truncated = Credential::new("secret");
        truncated.digest.pop();
        assert!(!truncated.verify("secret"));
    }

    #[test]
    fn authenticate_ok_and_bad_password() {
        let dir = directory();
        let info = dir.authenticate("admin@example.com", "admin").unwrap();
        assert_eq!(info.email, "admin@example.com");
        assert!(matches!(
            dir.authenticate("admin@example.com", "nope"),
            Err(EngineError::InvalidCredentials)
        ));
        assert!(matches!(
            dir.authenticate("other@example.com", "admin"),
            Err(EngineError::InvalidCredentials)
        ));
    }

    #[test]
    fn authenticate_requires_both_fields() {
        let dir = directory();
        assert!(matches!(dir.authenticate("", "admin"), Err(EngineError::MissingCredentials)));
        assert!(matches!(
            dir.authenticate("admin@example.com", "  "),
            Err(EngineError::MissingCredentials)
        ));
    }

    #[test]
    fn duplicate_email_ignores_case() {
        let mut dir = directory();
        let result = dir.create("ADMIN@example.com", "x");
        assert!(matches!(result, Err(EngineError::DuplicateKey(_))));
        assert_eq!(dir.len(), 1);
    }

    #[test]
    fn delete_last_admin_rejected() {
        let mut dir = directory();
        let only = dir.users()[0].id;
        let result = dir.delete(only);
        assert!(matches!(result, Err(EngineError::InvariantWouldBreak(_))));
        assert_eq!(dir.len(), 1);
        assert_eq!(dir.users()[0].id, only);
    }

    #[test]
    fn delete_with_two_admins() {
        let mut dir = directory();
        let second = dir.create("ops@example.com", "pw").unwrap();
        dir.delete(second.id).unwrap();
        assert_eq!(dir.len(), 1);
        assert!(matches!(dir.delete(second.id), Err(EngineError::InvariantWouldBreak(_))));
    }

    #[test]
    fn delete_unknown_id() {
        let mut dir = directory();
        dir.create("ops@example.com", "pw").unwrap();
        let missing = Ulid::new();
        assert!(matches!(dir.delete(missing), Err(EngineError::NotFound(id)) if id == missing));
    }

    #[test]
    fn update_keeps_password_when_omitted() {
        let mut dir = directory();
        let id = dir.users()[0].id;
        dir.update(id, "root@example.com", None).unwrap();
        assert!(dir.authenticate("root@example.com", "admin").is_ok());

        dir.update(id, "root@example.com", Some("new-pw")).unwrap();
        assert!(dir.authenticate("root@example.com", "admin").is_err());
        assert!(dir.authenticate("root@example.com", "new-pw").is_ok());
    }

    #[test]
    fn update_to_taken_email_rejected() {
        let mut dir = directory();
        let second = dir.create("ops@example.com", "pw").unwrap();
        let result = dir.update(second.id, "Admin@Example.com", None);
        assert!(matches!(result, Err(EngineError::DuplicateKey(_))));
        // Same user may keep its own email.
        dir.update(second.id, "OPS@example.com", None).unwrap();
    }
}

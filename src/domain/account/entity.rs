//! Account entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account identifier, assigned by the storage layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(i64);

impl AccountId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for AccountId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Candidate account as submitted by a caller
///
/// The password fields are write-only inputs and never reach storage.
#[derive(Clone, Default, Deserialize)]
pub struct AccountForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    /// Only honored when the account is created
    #[serde(default)]
    pub admin: bool,
}

impl AccountForm {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        password_confirmation: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            password_confirmation: password_confirmation.into(),
            admin: false,
        }
    }

    pub fn with_admin(mut self, admin: bool) -> Self {
        self.admin = admin;
        self
    }
}

// Keeps plaintext passwords out of logs.
impl std::fmt::Debug for AccountForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("password_confirmation", &"[REDACTED]")
            .field("admin", &self.admin)
            .finish()
    }
}

/// A validated account with its derived fields, not yet written to storage
#[derive(Debug, Clone)]
pub struct AccountDraft {
    pub name: String,
    pub email: String,
    pub password_digest: String,
    pub remember_token: String,
    pub admin: bool,
}

/// Persisted account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    id: AccountId,
    name: String,
    /// Always lower case
    email: String,
    /// Argon2 password hash - never exposed in serialization
    #[serde(skip_serializing, default)]
    password_digest: String,
    /// Session token - never exposed in serialization
    #[serde(skip_serializing, default)]
    remember_token: String,
    admin: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Account {
    /// Materialize a draft under the id the storage layer assigned
    pub fn from_draft(id: AccountId, draft: AccountDraft) -> Self {
        let now = Utc::now();

        Self {
            id,
            name: draft.name,
            email: draft.email,
            password_digest: draft.password_digest,
            remember_token: draft.remember_token,
            admin: draft.admin,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild an account from stored columns
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: AccountId,
        name: String,
        email: String,
        password_digest: String,
        remember_token: String,
        admin: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            password_digest,
            remember_token,
            admin,
            created_at,
            updated_at,
        }
    }

    // Getters

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_digest(&self) -> &str {
        &self.password_digest
    }

    pub fn remember_token(&self) -> &str {
        &self.remember_token
    }

    pub fn is_admin(&self) -> bool {
        self.admin
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Mutators

    /// Replace the user-editable attributes with a validated draft
    ///
    /// The admin flag only changes through [`Account::toggle_admin`]. The
    /// remember token is kept when one is already set.
    pub fn apply(&mut self, draft: AccountDraft) {
        self.name = draft.name;
        self.email = draft.email;
        self.password_digest = draft.password_digest;
        if self.remember_token.is_empty() {
            self.remember_token = draft.remember_token;
        }
        self.touch();
    }

    pub fn set_remember_token(&mut self, token: impl Into<String>) {
        self.remember_token = token.into();
        self.touch();
    }

    pub fn toggle_admin(&mut self) {
        self.admin = !self.admin;
        self.touch();
    }

    /// Take the admin flag and a set remember token from the stored row
    pub fn keep_stored_flags(&mut self, stored: &Account) {
        self.admin = stored.admin;
        if !stored.remember_token.is_empty() {
            self.remember_token = stored.remember_token.clone();
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(email: &str) -> AccountDraft {
        AccountDraft {
            name: "Example User".to_string(),
            email: email.to_string(),
            password_digest: "digest".to_string(),
            remember_token: "token".to_string(),
            admin: false,
        }
    }

    #[test]
    fn test_from_draft() {
        let account = Account::from_draft(AccountId::new(1), draft("user@example.com"));

        assert_eq!(account.id().value(), 1);
        assert_eq!(account.email(), "user@example.com");
        assert_eq!(account.remember_token(), "token");
        assert!(!account.is_admin());
        assert_eq!(account.created_at(), account.updated_at());
    }

    #[test]
    fn test_toggle_admin() {
        let mut account = Account::from_draft(AccountId::new(1), draft("user@example.com"));

        account.toggle_admin();
        assert!(account.is_admin());

        account.toggle_admin();
        assert!(!account.is_admin());
    }

    #[test]
    fn test_apply_keeps_existing_token() {
        let mut account = Account::from_draft(AccountId::new(1), draft("user@example.com"));
        let mut update = draft("other@example.com");
        update.remember_token = "fresh".to_string();

        account.apply(update);

        assert_eq!(account.email(), "other@example.com");
        assert_eq!(account.remember_token(), "token");
    }

    #[test]
    fn test_apply_keeps_admin_flag() {
        let mut account = Account::from_draft(AccountId::new(1), draft("user@example.com"));
        account.toggle_admin();

        account.apply(draft("user@example.com"));
        assert!(account.is_admin());

        let mut plain = Account::from_draft(AccountId::new(2), draft("plain@example.com"));
        let mut promote = draft("plain@example.com");
        promote.admin = true;
        plain.apply(promote);
        assert!(!plain.is_admin());
    }

    #[test]
    fn test_serialization_excludes_secrets() {
        let mut draft = draft("user@example.com");
        draft.password_digest = "$argon2id$secret-digest".to_string();
        draft.remember_token = "secret-token".to_string();
        let account = Account::from_draft(AccountId::new(3), draft);

        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("secret-digest"));
        assert!(!json.contains("password_digest"));
        assert!(!json.contains("secret-token"));
        assert!(json.contains("\"id\":3"));
    }

    #[test]
    fn test_form_debug_redacts_passwords() {
        let form = AccountForm::new("Example", "user@example.com", "hunter22", "hunter22");
        let debug = format!("{:?}", form);

        assert!(!debug.contains("hunter22"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_form_admin_defaults_false() {
        let form = AccountForm::new("Example", "user@example.com", "foobar", "foobar");
        assert!(!form.admin);
        assert!(form.with_admin(true).admin);
    }
}

//! Account repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Account, AccountDraft, AccountId};
use crate::domain::DomainError;

/// Repository trait for account storage
///
/// Implementations must treat email as case-insensitive and reject a second
/// account with the same email with [`DomainError::Conflict`].
#[async_trait]
pub trait AccountRepository: Send + Sync + Debug {
    /// Get an account by its ID
    async fn get(&self, id: AccountId) -> Result<Option<Account>, DomainError>;

    /// Get an account by email, ignoring case
    async fn get_by_email(&self, email: &str) -> Result<Option<Account>, DomainError>;

    /// Get an account by its remember token (session restore)
    async fn get_by_remember_token(&self, token: &str) -> Result<Option<Account>, DomainError>;

    /// Store a new account; the storage layer assigns the ID
    async fn create(&self, draft: AccountDraft) -> Result<Account, DomainError>;

    /// Write the user-editable attributes of an existing account
    ///
    /// Name, email, password digest and `updated_at` are written. The stored
    /// admin flag and remember token win over the values carried by `account`,
    /// so a stale copy cannot undo a concurrent toggle or token reset. The
    /// token is only taken from `account` when none is stored yet.
    async fn update(&self, account: &Account) -> Result<Account, DomainError>;

    /// Flip the admin flag in place
    async fn toggle_admin(&self, id: AccountId) -> Result<Option<Account>, DomainError>;

    /// Replace the remember token in place
    async fn set_remember_token(
        &self,
        id: AccountId,
        token: &str,
    ) -> Result<Option<Account>, DomainError>;

    /// Delete an account and every post it owns as one unit of work
    async fn delete(&self, id: AccountId) -> Result<bool, DomainError>;

    /// List all accounts ordered by ID
    async fn list(&self) -> Result<Vec<Account>, DomainError>;

    async fn count(&self) -> Result<usize, DomainError>;

    /// Check if an email is taken by any account other than `except`
    async fn email_taken(
        &self,
        email: &str,
        except: Option<AccountId>,
    ) -> Result<bool, DomainError> {
        Ok(self
            .get_by_email(email)
            .await?
            .is_some_and(|account| Some(account.id()) != except))
    }
}

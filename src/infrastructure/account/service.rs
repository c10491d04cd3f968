//! Account service: save pipeline, authentication and feed

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::account::{
    normalize_email, validate_account, Account, AccountDraft, AccountForm, AccountId,
    AccountRepository, AccountValidationError,
};
use crate::domain::post::{Post, PostRepository};
use crate::domain::DomainError;

use super::password::PasswordHasher;
use super::token::{RememberTokenGenerator, TokenGenerator};

/// Account service for registration, authentication and management
///
/// Saving runs `normalize -> validate -> derive (digest, token) -> persist`.
/// Nothing is written unless every rule passes.
#[derive(Debug)]
pub struct AccountService<R, P, H>
where
    R: AccountRepository,
    P: PostRepository,
    H: PasswordHasher,
{
    accounts: Arc<R>,
    posts: Arc<P>,
    hasher: Arc<H>,
    tokens: Arc<dyn TokenGenerator>,
}

impl<R, P, H> AccountService<R, P, H>
where
    R: AccountRepository,
    P: PostRepository,
    H: PasswordHasher,
{
    pub fn new(accounts: Arc<R>, posts: Arc<P>, hasher: Arc<H>) -> Self {
        Self {
            accounts,
            posts,
            hasher,
            tokens: Arc::new(RememberTokenGenerator::new()),
        }
    }

    /// Use a custom remember-token source
    pub fn with_token_generator(mut self, tokens: impl TokenGenerator + 'static) -> Self {
        self.tokens = Arc::new(tokens);
        self
    }

    /// Validate and store a new account
    pub async fn create(&self, form: AccountForm) -> Result<Account, DomainError> {
        info!(email = %form.email, "Creating account");

        let draft = self.prepare(form, None, None).await?;
        let account = self
            .accounts
            .create(draft)
            .await
            .map_err(uniqueness_conflict)?;

        info!(id = %account.id(), "Account created");
        Ok(account)
    }

    /// Re-validate every attribute and store the changes
    ///
    /// The password must be supplied again. The remember token and the admin
    /// flag are kept; `form.admin` is ignored here.
    pub async fn update(&self, id: AccountId, form: AccountForm) -> Result<Account, DomainError> {
        info!(id = %id, "Updating account");

        let mut account = self.require(id).await?;
        let draft = self
            .prepare(form, Some(id), Some(account.remember_token()))
            .await?;

        account.apply(draft);

        self.accounts
            .update(&account)
            .await
            .map_err(uniqueness_conflict)
    }

    /// Check a plaintext password against an account's digest
    ///
    /// Returns `None` on mismatch, including accounts without a digest.
    pub fn authenticate(&self, account: &Account, password: &str) -> Option<Account> {
        if self.hasher.verify(password, account.password_digest()) {
            Some(account.clone())
        } else {
            debug!(id = %account.id(), "Password verification failed");
            None
        }
    }

    /// Sign in with email (any case) and password
    pub async fn authenticate_email(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Account>, DomainError> {
        let Some(account) = self.accounts.get_by_email(email).await? else {
            debug!(email = %email, "No account for email");
            return Ok(None);
        };

        Ok(self.authenticate(&account, password))
    }

    /// Restore a persistent session from its remember token
    pub async fn find_by_remember_token(&self, token: &str) -> Result<Option<Account>, DomainError> {
        if token.is_empty() {
            return Ok(None);
        }

        self.accounts.get_by_remember_token(token).await
    }

    /// Issue a fresh remember token, invalidating existing sessions
    pub async fn reset_remember_token(&self, id: AccountId) -> Result<Account, DomainError> {
        info!(id = %id, "Resetting remember token");

        let token = self.tokens.generate()?;

        self.accounts
            .set_remember_token(id, &token)
            .await?
            .ok_or_else(|| account_not_found(id))
    }

    /// Posts owned by the account, newest first
    pub async fn feed(&self, account: &Account) -> Result<Vec<Post>, DomainError> {
        self.posts.list_by_owner(account.id()).await
    }

    /// Flip the admin flag and persist it
    pub async fn toggle_admin(&self, id: AccountId) -> Result<Account, DomainError> {
        let account = self
            .accounts
            .toggle_admin(id)
            .await?
            .ok_or_else(|| account_not_found(id))?;

        info!(id = %id, admin = account.is_admin(), "Toggled admin flag");
        Ok(account)
    }

    /// Delete an account together with its posts
    pub async fn delete(&self, id: AccountId) -> Result<bool, DomainError> {
        info!(id = %id, "Deleting account");
        self.accounts.delete(id).await
    }

    pub async fn get(&self, id: AccountId) -> Result<Option<Account>, DomainError> {
        self.accounts.get(id).await
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        self.accounts.get_by_email(email).await
    }

    pub async fn list(&self) -> Result<Vec<Account>, DomainError> {
        self.accounts.list().await
    }

    pub async fn count(&self) -> Result<usize, DomainError> {
        self.accounts.count().await
    }

    async fn require(&self, id: AccountId) -> Result<Account, DomainError> {
        self.accounts
            .get(id)
            .await?
            .ok_or_else(|| account_not_found(id))
    }

    /// Normalize, validate and derive the stored fields for a candidate
    async fn prepare(
        &self,
        form: AccountForm,
        except: Option<AccountId>,
        existing_token: Option<&str>,
    ) -> Result<AccountDraft, DomainError> {
        let form = AccountForm {
            email: normalize_email(&form.email),
            ..form
        };

        let mut errors = validate_account(&form).err().unwrap_or_default();

        if !form.email.trim().is_empty() && self.accounts.email_taken(&form.email, except).await? {
            errors.push(AccountValidationError::EmailTaken);
        }

        if !errors.is_empty() {
            warn!(email = %form.email, violations = errors.len(), "Account rejected");
            return Err(DomainError::invalid(errors));
        }

        let password_digest = self.hasher.hash(&form.password)?;
        let remember_token = match existing_token {
            Some(token) if !token.is_empty() => token.to_string(),
            _ => self.tokens.generate()?,
        };

        Ok(AccountDraft {
            name: form.name,
            email: form.email,
            password_digest,
            remember_token,
            admin: form.admin,
        })
    }
}

fn account_not_found(id: AccountId) -> DomainError {
    DomainError::not_found(format!("Account '{}' not found", id))
}

/// A storage-level duplicate is reported like any other rule violation
fn uniqueness_conflict(error: DomainError) -> DomainError {
    match error {
        DomainError::Conflict { message } => {
            warn!("Email uniqueness enforced by storage: {}", message);
            DomainError::invalid(vec![AccountValidationError::EmailTaken])
        }
        other => other,
    }
}

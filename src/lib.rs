//! Micropost accounts
//!
//! The account model behind the micropost sample app:
//! - Attribute validation that reports every violated rule at once
//! - Argon2 password digests and authentication
//! - Random remember tokens for persistent sessions
//! - An admin flag and a newest-first feed of the account's posts
//! - In-memory and PostgreSQL storage with cascading deletes

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use domain::{account::AccountRepository, post::PostRepository, DomainError};
use infrastructure::{
    account::{AccountService, Argon2Hasher, RememberTokenGenerator},
    storage::PostgresStore,
};
use tracing::info;

/// Build an account service over a store that holds both accounts and posts
pub fn create_account_service<S>(store: S, config: &AppConfig) -> AccountService<S, S, Argon2Hasher>
where
    S: AccountRepository + PostRepository,
{
    let store = Arc::new(store);
    let tokens =
        RememberTokenGenerator::new().with_token_bytes(config.security.remember_token_bytes);

    AccountService::new(Arc::clone(&store), store, Arc::new(Argon2Hasher::new()))
        .with_token_generator(tokens)
}

/// Connect to the configured PostgreSQL database
pub async fn connect_store(config: &AppConfig) -> Result<PostgresStore, DomainError> {
    let postgres = config.database.postgres().ok_or_else(|| {
        DomainError::configuration("DATABASE_URL or database.url must be set")
    })?;

    info!("Connecting to PostgreSQL...");
    let store = PostgresStore::connect(&postgres).await?;
    info!("PostgreSQL connection established");

    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::AccountForm;
    use crate::infrastructure::storage::InMemoryStore;

    #[tokio::test]
    async fn test_service_uses_configured_token_length() {
        let mut config = AppConfig::default();
        config.security.remember_token_bytes = 32;

        let service = create_account_service(InMemoryStore::new(), &config);
        let account = service
            .create(AccountForm::new("Example", "user@example.com", "foobar", "foobar"))
            .await
            .unwrap();

        assert_eq!(account.remember_token().len(), 43);
    }
}

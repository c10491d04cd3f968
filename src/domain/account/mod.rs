//! Account domain
//!
//! Domain types and traits for accounts: the persisted entity, the candidate
//! form submitted by callers, validation rules and the repository trait.

mod entity;
mod repository;
mod validation;

pub use entity::{Account, AccountDraft, AccountForm, AccountId};
pub use repository::AccountRepository;
pub use validation::{
    is_valid_email, normalize_email, validate_account, validate_email, validate_name,
    validate_password, AccountValidationError, MAX_NAME_LENGTH, MIN_PASSWORD_LENGTH,
};

#[cfg(test)]
pub use repository::mock::MockAccountRepository;

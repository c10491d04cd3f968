use std::fmt;

use thiserror::Error;

use super::account::AccountValidationError;

/// Every rule an account candidate violated, in rule order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors(Vec<AccountValidationError>);

impl ValidationErrors {
    pub fn new(errors: Vec<AccountValidationError>) -> Self {
        Self(errors)
    }

    pub fn errors(&self) -> &[AccountValidationError] {
        &self.0
    }

    pub fn contains(&self, error: &AccountValidationError) -> bool {
        self.0.contains(error)
    }

    /// Errors reported against a single field
    pub fn for_field<'a>(
        &'a self,
        field: &'a str,
    ) -> impl Iterator<Item = &'a AccountValidationError> + 'a {
        self.0.iter().filter(move |e| e.field() == field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<AccountValidationError>> for ValidationErrors {
    fn from(errors: Vec<AccountValidationError>) -> Self {
        Self(errors)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation failed: {0}")]
    Invalid(ValidationErrors),

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn invalid(errors: impl Into<ValidationErrors>) -> Self {
        Self::Invalid(errors.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Validation errors carried by this error, if it is a validation failure
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Invalid(errors) => Some(errors),
            _ => None,
        }
    }

    /// Whether the caller can recover by correcting input
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("Account '7' not found");
        assert_eq!(error.to_string(), "Not found: Account '7' not found");
    }

    #[test]
    fn test_invalid_error_lists_every_violation() {
        let error = DomainError::invalid(vec![
            AccountValidationError::NameBlank,
            AccountValidationError::PasswordMismatch,
        ]);

        assert!(error.is_invalid());
        assert_eq!(
            error.to_string(),
            "Validation failed: Name can't be blank; Password doesn't match confirmation"
        );
        assert_eq!(error.validation_errors().map(|e| e.len()), Some(2));
    }

    #[test]
    fn test_for_field() {
        let errors = ValidationErrors::new(vec![
            AccountValidationError::EmailInvalid,
            AccountValidationError::NameBlank,
            AccountValidationError::EmailTaken,
        ]);

        assert_eq!(errors.for_field("email").count(), 2);
        assert_eq!(errors.for_field("password").count(), 0);
    }

    #[test]
    fn test_storage_error_is_not_invalid() {
        let error = DomainError::storage("connection refused");
        assert!(!error.is_invalid());
        assert!(error.validation_errors().is_none());
    }
}

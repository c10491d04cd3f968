//! Account validation rules
//!
//! Validation is an ordered list of pure rule functions. Each rule inspects the
//! candidate and returns zero or more errors; [`validate_account`] runs all of
//! them so the caller always sees the complete set of violations.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use super::entity::AccountForm;

pub const MAX_NAME_LENGTH: usize = 50;
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Local part of word characters, `+`, `-` and `.`; domain of dot-separated
/// labels ending in a label of at least two letters. ASCII only: Unicode case
/// folding would let `ſ` and the Kelvin sign match `[a-z]`.
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i-u)^[a-z0-9_+\-.]+@[a-z0-9\-]+(\.[a-z]+)*\.[a-z]{2,}$").unwrap()
});

/// A single violated rule
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    #[error("Name can't be blank")]
    NameBlank,

    #[error("Name is too long (maximum is {0} characters)")]
    NameTooLong(usize),

    #[error("Email can't be blank")]
    EmailBlank,

    #[error("Email is invalid")]
    EmailInvalid,

    #[error("Email has already been taken")]
    EmailTaken,

    #[error("Password confirmation can't be blank")]
    PasswordConfirmationBlank,

    #[error("Password is too short (minimum is {0} characters)")]
    PasswordTooShort(usize),

    #[error("Password doesn't match confirmation")]
    PasswordMismatch,
}

impl AccountValidationError {
    /// The attribute this error is reported against
    pub const fn field(&self) -> &'static str {
        match self {
            Self::NameBlank | Self::NameTooLong(_) => "name",
            Self::EmailBlank | Self::EmailInvalid | Self::EmailTaken => "email",
            Self::PasswordConfirmationBlank => "password_confirmation",
            Self::PasswordTooShort(_) | Self::PasswordMismatch => "password",
        }
    }
}

type Rule = fn(&AccountForm) -> Vec<AccountValidationError>;

const RULES: [Rule; 5] = [
    name_rule,
    email_rule,
    confirmation_presence_rule,
    password_length_rule,
    confirmation_match_rule,
];

/// Validate a candidate against every rule
///
/// Email uniqueness needs the stored population and is checked by the
/// account service, not here.
pub fn validate_account(form: &AccountForm) -> Result<(), Vec<AccountValidationError>> {
    let errors: Vec<AccountValidationError> = RULES.iter().flat_map(|rule| rule(form)).collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a display name
///
/// Rules:
/// - Cannot be blank
/// - Maximum 50 characters
pub fn validate_name(name: &str) -> Result<(), AccountValidationError> {
    if is_blank(name) {
        return Err(AccountValidationError::NameBlank);
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(AccountValidationError::NameTooLong(MAX_NAME_LENGTH));
    }

    Ok(())
}

/// Validate the shape of an email address (case-insensitive)
pub fn validate_email(email: &str) -> Result<(), AccountValidationError> {
    if is_blank(email) {
        return Err(AccountValidationError::EmailBlank);
    }

    if !is_valid_email(email) {
        return Err(AccountValidationError::EmailInvalid);
    }

    Ok(())
}

/// Validate a plaintext password
pub fn validate_password(password: &str) -> Result<(), AccountValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AccountValidationError::PasswordTooShort(MIN_PASSWORD_LENGTH));
    }

    Ok(())
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Lower-case an email address for storage and lookups
pub fn normalize_email(email: &str) -> String {
    email.to_lowercase()
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn name_rule(form: &AccountForm) -> Vec<AccountValidationError> {
    validate_name(&form.name).err().into_iter().collect()
}

fn email_rule(form: &AccountForm) -> Vec<AccountValidationError> {
    validate_email(&form.email).err().into_iter().collect()
}

fn confirmation_presence_rule(form: &AccountForm) -> Vec<AccountValidationError> {
    if is_blank(&form.password_confirmation) {
        vec![AccountValidationError::PasswordConfirmationBlank]
    } else {
        Vec::new()
    }
}

fn password_length_rule(form: &AccountForm) -> Vec<AccountValidationError> {
    validate_password(&form.password).err().into_iter().collect()
}

fn confirmation_match_rule(form: &AccountForm) -> Vec<AccountValidationError> {
    if form.password != form.password_confirmation {
        vec![AccountValidationError::PasswordMismatch]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> AccountForm {
        AccountForm::new("Example User", "user@example.com", "foobar", "foobar")
    }

    #[test]
    fn test_valid_form() {
        assert!(validate_account(&valid_form()).is_ok());
    }

    #[test]
    fn test_blank_name() {
        let mut form = valid_form();
        form.name = String::new();
        assert_eq!(
            validate_account(&form),
            Err(vec![AccountValidationError::NameBlank])
        );

        form.name = "   ".to_string();
        assert_eq!(
            validate_account(&form),
            Err(vec![AccountValidationError::NameBlank])
        );
    }

    #[test]
    fn test_name_length_boundary() {
        assert!(validate_name(&"a".repeat(50)).is_ok());
        assert_eq!(
            validate_name(&"a".repeat(51)),
            Err(AccountValidationError::NameTooLong(50))
        );
        // Characters, not bytes
        assert!(validate_name(&"é".repeat(50)).is_ok());
    }

    #[test]
    fn test_blank_email() {
        let mut form = valid_form();
        form.email = String::new();
        assert_eq!(
            validate_account(&form),
            Err(vec![AccountValidationError::EmailBlank])
        );
    }

    #[test]
    fn test_invalid_emails() {
        let emails = [
            "user@foo,com",
            "user_at_foo.org",
            "example.user@foo",
            "foo@bar_com.org",
            "foo@bar+com.org",
            "user@foo.c",
            "user@@foo.com",
        ];

        for email in emails {
            assert_eq!(
                validate_email(email),
                Err(AccountValidationError::EmailInvalid),
                "{} should be invalid",
                email
            );
        }
    }

    #[test]
    fn test_non_ascii_emails_rejected() {
        for email in ["ſ@foo.com", "user@foo.\u{212a}z", "usér@foo.com", "user@bär.com"] {
            assert!(!is_valid_email(email), "{} should be invalid", email);
        }
        assert!(is_valid_email("USER@FOO.KZ"));
    }

    #[test]
    fn test_valid_emails() {
        let emails = [
            "user@foo.COM",
            "A_US-ER@f.b.org",
            "frst.lst@foo.jp",
            "a+b@baz.cn",
        ];

        for email in emails {
            assert!(validate_email(email).is_ok(), "{} should be valid", email);
        }
    }

    #[test]
    fn test_blank_confirmation() {
        let form = AccountForm::new("Example User", "user@example.com", "foobar", "");
        let errors = validate_account(&form).unwrap_err();

        assert!(errors.contains(&AccountValidationError::PasswordConfirmationBlank));
        assert!(errors.contains(&AccountValidationError::PasswordMismatch));
    }

    #[test]
    fn test_mismatched_confirmation() {
        let form = AccountForm::new("Example User", "user@example.com", "foobar", "mismatch");
        assert_eq!(
            validate_account(&form),
            Err(vec![AccountValidationError::PasswordMismatch])
        );
    }

    #[test]
    fn test_short_password() {
        let form = AccountForm::new("Example User", "user@example.com", "aaaaa", "aaaaa");
        assert_eq!(
            validate_account(&form),
            Err(vec![AccountValidationError::PasswordTooShort(6)])
        );
    }

    #[test]
    fn test_collects_every_violation_in_rule_order() {
        let form = AccountForm::new("", "not-an-email", "abc", "");
        let errors = validate_account(&form).unwrap_err();

        assert_eq!(
            errors,
            vec![
                AccountValidationError::NameBlank,
                AccountValidationError::EmailInvalid,
                AccountValidationError::PasswordConfirmationBlank,
                AccountValidationError::PasswordTooShort(6),
                AccountValidationError::PasswordMismatch,
            ]
        );
    }

    #[test]
    fn test_error_fields() {
        assert_eq!(AccountValidationError::NameTooLong(50).field(), "name");
        assert_eq!(AccountValidationError::EmailTaken.field(), "email");
        assert_eq!(
            AccountValidationError::PasswordConfirmationBlank.field(),
            "password_confirmation"
        );
        assert_eq!(AccountValidationError::PasswordMismatch.field(), "password");
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("Foo@EmaIL.com"), "foo@email.com");
        assert_eq!(normalize_email("foo@email.com"), "foo@email.com");
    }
}

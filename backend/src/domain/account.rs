//! Account identity and profile types.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

use super::Role;

/// Validation errors for account fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountValidationError {
    #[error("account id must be a valid UUID")]
    InvalidId,
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("email must be a valid address")]
    InvalidEmail,
    #[error("email must be at most {max} characters")]
    EmailTooLong { max: usize },
    #[error("full name must not be empty")]
    EmptyFullName,
    #[error("full name must be at most {max} characters")]
    FullNameTooLong { max: usize },
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
}

/// Stable account identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(Uuid);

impl AccountId {
    /// Parse an identifier from its string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let raw = id.as_ref();
        if raw.trim() != raw {
            return Err(AccountValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| AccountValidationError::InvalidId)
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<AccountId> for String {
    fn from(value: AccountId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for AccountId {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Maximum email length accepted.
pub const EMAIL_MAX: usize = 254;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Login email, trimmed and lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Normalise and validate an email address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(AccountValidationError::EmptyEmail);
        }
        if normalised.chars().count() > EMAIL_MAX {
            return Err(AccountValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if !email_regex().is_match(&normalised) {
            return Err(AccountValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }

    /// Borrow the normalised address.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Maximum display name length.
pub const FULL_NAME_MAX: usize = 120;

/// Human readable name shown on profiles, workers and visit authorship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FullName(String);

impl FullName {
    /// Trim and validate a name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(AccountValidationError::EmptyFullName);
        }
        if trimmed.chars().count() > FULL_NAME_MAX {
            return Err(AccountValidationError::FullNameTooLong { max: FULL_NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<FullName> for String {
    fn from(value: FullName) -> Self {
        value.0
    }
}

impl TryFrom<String> for FullName {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Minimum password length accepted for new accounts.
pub const PASSWORD_MIN: usize = 6;

/// Plaintext password held only for the duration of a request.
///
/// The buffer is zeroed on drop and never printed.
#[derive(Clone)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate a password for a new account.
    pub fn new(raw: impl Into<String>) -> Result<Self, AccountValidationError> {
        let value = Zeroizing::new(raw.into());
        if value.chars().count() < PASSWORD_MIN {
            return Err(AccountValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        Ok(Self(value))
    }

    /// Wrap a password supplied at login without applying creation rules.
    pub fn for_login(raw: impl Into<String>) -> Self {
        Self(Zeroizing::new(raw.into()))
    }

    /// Expose the secret to a hashing routine.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Account together with its profile and role assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountProfile {
    pub id: AccountId,
    pub email: Email,
    pub full_name: FullName,
    /// `None` when the role assignment is missing.
    pub role: Option<Role>,
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating a doctor identity.
#[derive(Debug, Clone)]
pub struct NewDoctorAccount {
    pub email: Email,
    pub password: Password,
    pub full_name: FullName,
}

/// Unvalidated doctor-creation input.
///
/// Fields stay raw until the caller's role has been checked, so an
/// unauthorised caller learns nothing about field validation.
#[derive(Debug, Clone, Default)]
pub struct DoctorAccountRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Failure validating a [`DoctorAccountRequest`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DoctorRequestError {
    #[error("Email, password, and full name are required")]
    MissingFields,
    #[error(transparent)]
    Invalid(#[from] AccountValidationError),
}

impl TryFrom<DoctorAccountRequest> for NewDoctorAccount {
    type Error = DoctorRequestError;

    fn try_from(value: DoctorAccountRequest) -> Result<Self, Self::Error> {
        let (Some(email), Some(password), Some(full_name)) = (
            present(value.email),
            present(value.password),
            present(value.full_name),
        ) else {
            return Err(DoctorRequestError::MissingFields);
        };
        Ok(Self {
            email: Email::new(email)?,
            password: Password::new(password)?,
            full_name: FullName::new(full_name)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("  Doctor@Example.ORG ", "doctor@example.org")]
    #[case("a@b", "a@b")]
    fn email_is_normalised(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(Email::new(raw).expect("valid email").as_str(), expected);
    }

    #[rstest]
    #[case("", AccountValidationError::EmptyEmail)]
    #[case("no-at-sign", AccountValidationError::InvalidEmail)]
    #[case("two@@signs", AccountValidationError::InvalidEmail)]
    #[case("spa ce@x.org", AccountValidationError::InvalidEmail)]
    fn email_rejects_malformed(#[case] raw: &str, #[case] expected: AccountValidationError) {
        assert_eq!(Email::new(raw), Err(expected));
    }

    #[rstest]
    fn full_name_is_trimmed() {
        let name = FullName::new("  Dr. Amina Yusuf ").expect("valid name");
        assert_eq!(name.as_str(), "Dr. Amina Yusuf");
    }

    #[rstest]
    fn full_name_rejects_overlong() {
        let raw = "x".repeat(FULL_NAME_MAX + 1);
        assert_eq!(
            FullName::new(raw),
            Err(AccountValidationError::FullNameTooLong { max: FULL_NAME_MAX })
        );
    }

    #[rstest]
    fn password_enforces_minimum_length() {
        assert!(Password::new("12345").is_err());
        assert!(Password::new("123456").is_ok());
    }

    #[rstest]
    fn password_debug_is_redacted() {
        let password = Password::for_login("hunter22");
        assert!(!format!("{password:?}").contains("hunter22"));
    }

    #[rstest]
    #[case(DoctorAccountRequest { email: None, password: Some("secret1".into()), full_name: Some("Dr".into()) })]
    #[case(DoctorAccountRequest { email: Some("d@x.org".into()), password: Some("  ".into()), full_name: Some("Dr".into()) })]
    #[case(DoctorAccountRequest::default())]
    fn doctor_request_requires_all_fields(#[case] request: DoctorAccountRequest) {
        let result = NewDoctorAccount::try_from(request);
        assert!(matches!(result, Err(DoctorRequestError::MissingFields)));
    }

    #[rstest]
    fn doctor_request_validates_fields() {
        let request = DoctorAccountRequest {
            email: Some("D@X.org".into()),
            password: Some("secret1".into()),
            full_name: Some(" Dr. Lee ".into()),
        };
        let account = NewDoctorAccount::try_from(request).expect("valid request");
        assert_eq!(account.email.as_str(), "d@x.org");
        assert_eq!(account.full_name.as_str(), "Dr. Lee");
    }
}

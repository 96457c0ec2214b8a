//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every rejected field produces `400 invalid_request` with
//! `details: { field, code }` so clients can highlight the offending input.

use serde_json::json;

use crate::domain::worker::{AGE_MAX, AGE_MIN};
use crate::domain::{AccountId, AccountValidationError, Age, Error, Gender, WorkerIdentifier};

/// Machine-readable validation failure codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    MissingField,
    InvalidValue,
    OutOfRange,
    InvalidUuid,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidValue => "invalid_value",
            Self::OutOfRange => "out_of_range",
            Self::InvalidUuid => "invalid_uuid",
        }
    }
}

/// Camel-cased request field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) fn field_error(
    field: FieldName,
    code: ValidationCode,
    message: impl Into<String>,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(
        field,
        ValidationCode::MissingField,
        format!("{} is required", field.as_str()),
    )
}

/// Require an optional body field to be present and non-blank.
pub(crate) fn require_text(value: Option<String>, field: FieldName) -> Result<String, Error> {
    value
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| missing_field_error(field))
}

pub(crate) fn parse_account_id(raw: &str, field: FieldName) -> Result<AccountId, Error> {
    AccountId::new(raw).map_err(|_| {
        field_error(
            field,
            ValidationCode::InvalidUuid,
            format!("{} must be a valid UUID", field.as_str()),
        )
    })
}

/// Worker identifiers in a path that cannot exist are reported as unknown.
pub(crate) fn parse_path_identifier(raw: &str) -> Result<WorkerIdentifier, Error> {
    WorkerIdentifier::new(raw)
        .map_err(|_| Error::not_found("Worker not found").with_reason("worker_not_found"))
}

pub(crate) fn parse_age(raw: Option<i64>, field: FieldName) -> Result<Age, Error> {
    let years = raw.ok_or_else(|| missing_field_error(field))?;
    u8::try_from(years)
        .ok()
        .and_then(|years| Age::new(years).ok())
        .ok_or_else(|| {
            field_error(
                field,
                ValidationCode::OutOfRange,
                format!("age must be between {AGE_MIN} and {AGE_MAX}"),
            )
        })
}

pub(crate) fn parse_gender(raw: Option<String>, field: FieldName) -> Result<Gender, Error> {
    let text = require_text(raw, field)?;
    text.trim().to_ascii_lowercase().parse::<Gender>().map_err(|_| {
        field_error(
            field,
            ValidationCode::InvalidValue,
            "gender must be one of male, female or other",
        )
    })
}

/// Map account field failures onto the request field that caused them.
pub(crate) fn account_field_error(error: AccountValidationError) -> Error {
    let field = match error {
        AccountValidationError::EmptyEmail
        | AccountValidationError::InvalidEmail
        | AccountValidationError::EmailTooLong { .. } => "email",
        AccountValidationError::EmptyFullName | AccountValidationError::FullNameTooLong { .. } => {
            "fullName"
        }
        AccountValidationError::PasswordTooShort { .. } => "password",
        AccountValidationError::InvalidId => "id",
    };
    field_error(FieldName::new(field), ValidationCode::InvalidValue, error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    const AGE: FieldName = FieldName::new("age");
    const GENDER: FieldName = FieldName::new("gender");

    fn details(error: &Error) -> (String, String) {
        let details = error.details().expect("details present");
        (
            details["field"].as_str().expect("field").to_owned(),
            details["code"].as_str().expect("code").to_owned(),
        )
    }

    #[rstest]
    #[case(Some(18), true)]
    #[case(Some(100), true)]
    #[case(Some(17), false)]
    #[case(Some(101), false)]
    #[case(Some(-5), false)]
    #[case(Some(300), false)]
    fn ages_are_bounded(#[case] raw: Option<i64>, #[case] accepted: bool) {
        let result = parse_age(raw, AGE);
        assert_eq!(result.is_ok(), accepted);
        if let Err(error) = result {
            assert_eq!(details(&error), ("age".into(), "out_of_range".into()));
            assert_eq!(error.message(), "age must be between 18 and 100");
        }
    }

    #[rstest]
    fn missing_age_is_a_missing_field() {
        let error = parse_age(None, AGE).expect_err("missing");
        assert_eq!(details(&error), ("age".into(), "missing_field".into()));
    }

    #[rstest]
    #[case(" Female ", Gender::Female)]
    #[case("OTHER", Gender::Other)]
    fn gender_is_case_insensitive(#[case] raw: &str, #[case] expected: Gender) {
        assert_eq!(parse_gender(Some(raw.into()), GENDER).expect("valid"), expected);
    }

    #[rstest]
    fn unknown_gender_is_rejected() {
        let error = parse_gender(Some("robot".into()), GENDER).expect_err("invalid");
        assert_eq!(details(&error), ("gender".into(), "invalid_value".into()));
    }

    #[rstest]
    fn short_path_identifiers_are_not_found() {
        let error = parse_path_identifier("ab").expect_err("too short");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    fn account_errors_name_their_field() {
        let error = account_field_error(AccountValidationError::PasswordTooShort { min: 6 });
        assert_eq!(details(&error), ("password".into(), "invalid_value".into()));
    }
}

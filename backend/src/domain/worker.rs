//! Worker records and the identifiers carried by their QR codes.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::{AccountId, FullName};

/// Shortest accepted worker identifier.
pub const WORKER_ID_MIN: usize = 3;
/// Longest accepted worker identifier.
pub const WORKER_ID_MAX: usize = 64;
/// Prefix applied to generated identifiers.
pub const WORKER_ID_PREFIX: &str = "WKR-";

/// Youngest registrable worker.
pub const AGE_MIN: u8 = 18;
/// Oldest registrable worker.
pub const AGE_MAX: u8 = 100;

/// Validation errors for worker fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkerValidationError {
    #[error("worker id must be at least {min} characters")]
    IdTooShort { min: usize },
    #[error("worker id must be at most {max} characters")]
    IdTooLong { max: usize },
    #[error("age must be between {min} and {max}")]
    AgeOutOfRange { min: u8, max: u8 },
    #[error("unknown gender: {0}")]
    UnknownGender(String),
}

/// Opaque worker identifier, unique and immutable once issued.
///
/// The only structural rule is the trimmed length window, so identifiers
/// typed in by hand behave exactly like the ones decoded from a QR code.
///
/// # Examples
/// ```
/// use medicare_backend::domain::WorkerIdentifier;
///
/// assert_eq!(WorkerIdentifier::from_sequence(42).as_str(), "WKR-000042");
/// assert!(WorkerIdentifier::new("ab").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WorkerIdentifier(String);

impl WorkerIdentifier {
    /// Trim and validate an identifier.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, WorkerValidationError> {
        let trimmed = raw.as_ref().trim();
        let length = trimmed.chars().count();
        if length < WORKER_ID_MIN {
            return Err(WorkerValidationError::IdTooShort { min: WORKER_ID_MIN });
        }
        if length > WORKER_ID_MAX {
            return Err(WorkerValidationError::IdTooLong { max: WORKER_ID_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Format a value drawn from the identifier sequence.
    pub fn from_sequence(value: u64) -> Self {
        Self(format!("{WORKER_ID_PREFIX}{value:06}"))
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkerIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<WorkerIdentifier> for String {
    fn from(value: WorkerIdentifier) -> Self {
        value.0
    }
}

impl TryFrom<String> for WorkerIdentifier {
    type Error = WorkerValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Gender recorded at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = WorkerValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "other" => Ok(Self::Other),
            other => Err(WorkerValidationError::UnknownGender(other.to_owned())),
        }
    }
}

/// Age in whole years within the registrable range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Age(u8);

impl Age {
    /// Validate an age.
    pub fn new(years: u8) -> Result<Self, WorkerValidationError> {
        if (AGE_MIN..=AGE_MAX).contains(&years) {
            Ok(Self(years))
        } else {
            Err(WorkerValidationError::AgeOutOfRange {
                min: AGE_MIN,
                max: AGE_MAX,
            })
        }
    }

    /// Age in years.
    pub const fn years(self) -> u8 {
        self.0
    }
}

impl From<Age> for u8 {
    fn from(value: Age) -> Self {
        value.0
    }
}

impl TryFrom<u8> for Age {
    type Error = WorkerValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Validated registration input supplied by an admin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerRegistration {
    pub full_name: FullName,
    pub age: Age,
    pub gender: Gender,
}

/// Registration ready to persist with its issued identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorker {
    pub identifier: WorkerIdentifier,
    pub registration: WorkerRegistration,
    pub registered_by: AccountId,
}

/// Registered worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worker {
    pub id: Uuid,
    pub identifier: WorkerIdentifier,
    pub full_name: FullName,
    pub age: Age,
    pub gender: Gender,
    pub registered_by: Option<AccountId>,
    pub registered_at: DateTime<Utc>,
}

/// Worker listed together with the number of recorded visits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerSummary {
    pub worker: Worker,
    pub visit_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, "WKR-000001")]
    #[case(123, "WKR-000123")]
    #[case(1_234_567, "WKR-1234567")]
    fn sequence_values_are_zero_padded(#[case] value: u64, #[case] expected: &str) {
        assert_eq!(WorkerIdentifier::from_sequence(value).as_str(), expected);
    }

    #[rstest]
    #[case("  WKR-000001  ", "WKR-000001")]
    #[case("abc", "abc")]
    fn identifiers_are_trimmed(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(WorkerIdentifier::new(raw).expect("valid id").as_str(), expected);
    }

    #[rstest]
    #[case("ab", WorkerValidationError::IdTooShort { min: WORKER_ID_MIN })]
    #[case("   ab   ", WorkerValidationError::IdTooShort { min: WORKER_ID_MIN })]
    #[case(&"x".repeat(65), WorkerValidationError::IdTooLong { max: WORKER_ID_MAX })]
    fn identifiers_outside_window_are_rejected(
        #[case] raw: &str,
        #[case] expected: WorkerValidationError,
    ) {
        assert_eq!(WorkerIdentifier::new(raw), Err(expected));
    }

    #[rstest]
    fn identifier_window_is_inclusive() {
        assert!(WorkerIdentifier::new("x".repeat(WORKER_ID_MIN)).is_ok());
        assert!(WorkerIdentifier::new("x".repeat(WORKER_ID_MAX)).is_ok());
    }

    #[rstest]
    #[case(17, false)]
    #[case(18, true)]
    #[case(100, true)]
    #[case(101, false)]
    fn age_range_is_enforced(#[case] years: u8, #[case] accepted: bool) {
        assert_eq!(Age::new(years).is_ok(), accepted);
    }

    #[rstest]
    fn gender_round_trips_through_storage_text() {
        for gender in [Gender::Male, Gender::Female, Gender::Other] {
            assert_eq!(gender.as_str().parse::<Gender>(), Ok(gender));
        }
        assert!("unknown".parse::<Gender>().is_err());
    }
}

//! Typed-in identifier fallback for when no camera is usable.

use crate::domain::WorkerIdentifier;

/// Message shown when a typed identifier is rejected.
pub const INVALID_MANUAL_ENTRY: &str = "Please enter a valid Worker ID.";

/// Identifier entered by hand, held to the same length window as scanned
/// identifiers and nothing stricter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualEntry(WorkerIdentifier);

/// Rejected manual entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Please enter a valid Worker ID.")]
pub struct InvalidManualEntry;

impl ManualEntry {
    /// Trim and length-check raw input.
    ///
    /// # Examples
    /// ```
    /// use medicare_backend::scanning::ManualEntry;
    ///
    /// let entry = ManualEntry::parse("  WKR-000010 ").expect("valid");
    /// assert_eq!(entry.identifier().as_str(), "WKR-000010");
    /// assert!(ManualEntry::parse("ab").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, InvalidManualEntry> {
        WorkerIdentifier::new(raw)
            .map(Self)
            .map_err(|_| InvalidManualEntry)
    }

    pub fn identifier(&self) -> &WorkerIdentifier {
        &self.0
    }

    pub fn into_identifier(self) -> WorkerIdentifier {
        self.0
    }
}

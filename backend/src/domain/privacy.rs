//! Privacy field parsing and redaction.
//!
//! The record store keeps a character's privacy selection as a single
//! `|`-joined string. Splitting that string is the security boundary for
//! non-owner reads, so the parse is deliberately strict and centralised
//! here: split on `|`, discard empty segments, nothing else.

use std::fmt;

use serde_json::{Map, Value};

use crate::domain::snapshot::ProfileSnapshot;

/// Delimiter used by the stored privacy string.
pub const PRIVACY_DELIMITER: char = '|';

/// Validation errors returned by [`PrivacyField::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrivacyValidationError {
    EmptyField,
    ContainsDelimiter,
}

impl fmt::Display for PrivacyValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyField => write!(f, "privacy field must not be empty"),
            Self::ContainsDelimiter => {
                write!(f, "privacy field must not contain '{PRIVACY_DELIMITER}'")
            }
        }
    }
}

impl std::error::Error for PrivacyValidationError {}

/// A single profile field name an owner can hide from non-owners.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrivacyField(String);

impl PrivacyField {
    /// Validate and construct a [`PrivacyField`] from owned input.
    pub fn new(field: impl Into<String>) -> Result<Self, PrivacyValidationError> {
        let field = field.into();
        if field.trim().is_empty() {
            return Err(PrivacyValidationError::EmptyField);
        }
        if field.contains(PRIVACY_DELIMITER) {
            return Err(PrivacyValidationError::ContainsDelimiter);
        }
        Ok(Self(field))
    }
}

impl AsRef<str> for PrivacyField {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PrivacyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Split a stored privacy string into its field names.
///
/// Empty segments are discarded, so `"race||"` and `"race"` are the same
/// selection and an empty or all-delimiter string hides nothing.
pub fn split_privacy(raw: &str) -> Vec<String> {
    raw.split(PRIVACY_DELIMITER)
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Join field names back into the stored form.
pub fn join_privacy<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(&PRIVACY_DELIMITER.to_string())
}

/// Remove owner-private fields from a snapshot for non-owner requesters.
///
/// Owners see the snapshot unchanged. Non-owners get a shallow copy with
/// every key named in `privacy` removed. The input snapshot is never
/// mutated; callers may reuse it.
pub fn redact(snapshot: &ProfileSnapshot, privacy: &[String], is_owner: bool) -> ProfileSnapshot {
    if is_owner {
        return snapshot.clone();
    }

    let fields: Map<String, Value> = snapshot
        .fields()
        .iter()
        .filter(|(key, _)| !privacy.iter().any(|hidden| hidden == *key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    if snapshot.api_token_available() {
        ProfileSnapshot::available(fields)
    } else {
        ProfileSnapshot::unavailable()
    }
}
